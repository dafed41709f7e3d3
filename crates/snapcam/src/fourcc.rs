// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
#![forbid(unsafe_code)]

use core::fmt;

use serde::{Serialize, Serializer};

/// Four-character pixel format code.
///
/// V4L2 packs the four characters little-endian into a `u32` regardless of
/// host byte order (`'Y' | 'U' << 8 | 'Y' << 16 | 'V' << 24` for YUYV).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const YUYV: FourCC = FourCC(*b"YUYV");
    pub const MJPG: FourCC = FourCC(*b"MJPG");
    pub const JPEG: FourCC = FourCC(*b"JPEG");
    pub const GREY: FourCC = FourCC(*b"GREY");

    pub const fn from_u32(val: u32) -> FourCC {
        FourCC(val.to_le_bytes())
    }

    pub const fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// True for the JPEG family, whose frames are complete image files.
    pub fn is_jpeg(self) -> bool {
        self == FourCC::MJPG || self == FourCC::JPEG
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(buf: &[u8; 4]) -> FourCC {
        FourCC(*buf)
    }
}

impl From<u32> for FourCC {
    fn from(val: u32) -> FourCC {
        FourCC::from_u32(val)
    }
}

impl From<FourCC> for u32 {
    fn from(val: FourCC) -> Self {
        val.as_u32()
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match core::str::from_utf8(&self.0) {
            // Drivers pad short codes with spaces ("Y16 ", "GREY")
            Ok(s) => f.write_str(s.trim_end()),
            Err(_) => {
                // Returning fmt::Error would make format!() panic
                for b in self.0 {
                    write!(f, "{}", core::ascii::escape_default(b))?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FourCC")
            .field(&format_args!("{}", self))
            .finish()
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
