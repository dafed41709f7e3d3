// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Kernel ABI for the handful of V4L2 ioctls snapcam issues.
//!
//! Layouts follow `linux/videodev2.h`; see
//! <https://www.kernel.org/doc/html/latest/userspace-api/media/v4l/user-func.html>.

use std::mem;

pub const V4L2_BUF_TYPE_VIDEO_CAPTURE: u32 = 1;

// CONTINUOUS (2) and STEPWISE (3) both fill `frmsize.stepwise`.
pub const V4L2_FRMSIZE_TYPE_DISCRETE: u32 = 1;

const VIDIOC: u8 = b'V';
const VIDIOC_QUERYCAP: u8 = 0;
const VIDIOC_ENUM_FMT: u8 = 2;
const VIDIOC_G_FMT: u8 = 4;
const VIDIOC_ENUM_FRAMESIZES: u8 = 74;
const VIDIOC_ENUM_FRAMEINTERVALS: u8 = 75;

// Fields never read on the Rust side only fill out the kernel layout.

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub struct V4l2Capability {
    pub driver: [u8; 16],
    pub card: [u8; 32],
    pub bus_info: [u8; 32],
    pub version: u32,
    pub capabilities: u32,
    pub device_caps: u32,
    pub reserved: [u32; 3],
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub struct V4l2Fmtdesc {
    pub index: u32,
    pub typ: u32,
    pub flags: u32,
    pub description: [u8; 32],
    pub pixelformat: u32,
    pub mbus_code: u32,
    pub reserved: [u32; 3],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct V4l2FrmsizeDiscrete {
    pub width: u32,
    pub height: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct V4l2FrmsizeStepwise {
    pub min_width: u32,
    pub max_width: u32,
    pub step_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub step_height: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union V4l2Frmsize {
    pub discrete: V4l2FrmsizeDiscrete,
    pub stepwise: V4l2FrmsizeStepwise,
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub struct V4l2Frmsizeenum {
    pub index: u32,
    pub pixel_format: u32,
    pub typ: u32,
    pub frmsize: V4l2Frmsize,
    pub reserved: [u32; 2],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct V4l2Fract {
    pub numerator: u32,
    pub denominator: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub struct V4l2FrmivalStepwise {
    pub min: V4l2Fract,
    pub max: V4l2Fract,
    pub step: V4l2Fract,
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub union V4l2Frmival {
    pub discrete: V4l2Fract,
    pub stepwise: V4l2FrmivalStepwise,
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub struct V4l2Frmivalenum {
    pub index: u32,
    pub pixel_format: u32,
    pub width: u32,
    pub height: u32,
    pub typ: u32,
    pub frmival: V4l2Frmival,
    pub reserved: [u32; 2],
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub struct V4l2PixFormat {
    pub width: u32,
    pub height: u32,
    pub pixelformat: u32,
    pub field: u32,
    pub bytesperline: u32,
    pub sizeimage: u32,
    pub colorspace: u32,
    pub priv_: u32,
    pub flags: u32,
    pub ycbcr_enc: u32,
    pub quantization: u32,
    pub xfer_func: u32,
}

/// `fmt` union of `struct v4l2_format`.
///
/// The kernel union holds `struct v4l2_window`, which carries pointers, so it
/// is pointer aligned. `_align` reproduces that alignment.
#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub union V4l2FormatUnion {
    pub pix: V4l2PixFormat,
    pub raw_data: [u8; 200],
    _align: [*mut libc::c_void; 0],
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
pub struct V4l2Format {
    pub typ: u32,
    pub fmt: V4l2FormatUnion,
}

nix::ioctl_read!(vidioc_querycap, VIDIOC, VIDIOC_QUERYCAP, V4l2Capability);
nix::ioctl_readwrite!(vidioc_enum_fmt, VIDIOC, VIDIOC_ENUM_FMT, V4l2Fmtdesc);
nix::ioctl_readwrite!(vidioc_g_fmt, VIDIOC, VIDIOC_G_FMT, V4l2Format);
nix::ioctl_readwrite!(
    vidioc_enum_framesizes,
    VIDIOC,
    VIDIOC_ENUM_FRAMESIZES,
    V4l2Frmsizeenum
);
nix::ioctl_readwrite!(
    vidioc_enum_frameintervals,
    VIDIOC,
    VIDIOC_ENUM_FRAMEINTERVALS,
    V4l2Frmivalenum
);

/// All-zero value of a kernel ABI struct.
///
/// Only instantiated with the plain-old-data types of this module, for which
/// the all-zero bit pattern is valid.
pub(crate) fn zeroed<T: Copy>() -> T {
    // SAFETY: callers only use the integer/array/union types declared above.
    unsafe { mem::zeroed() }
}

/// Decode a fixed-size, NUL-padded kernel string.
pub(crate) fn c_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sizes_match_kernel() {
        assert_eq!(mem::size_of::<V4l2Capability>(), 104);
        assert_eq!(mem::size_of::<V4l2Fmtdesc>(), 64);
        assert_eq!(mem::size_of::<V4l2Frmsizeenum>(), 44);
        assert_eq!(mem::size_of::<V4l2Frmivalenum>(), 52);
        assert_eq!(mem::size_of::<V4l2PixFormat>(), 48);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(mem::size_of::<V4l2Format>(), 208);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(mem::size_of::<V4l2Format>(), 204);
    }

    #[test]
    fn test_c_str_stops_at_nul() {
        let mut buf = [0u8; 16];
        buf[..8].copy_from_slice(b"uvcvideo");
        assert_eq!(c_str(&buf), "uvcvideo");
    }

    #[test]
    fn test_c_str_unterminated() {
        assert_eq!(c_str(b"abcd"), "abcd");
    }
}
