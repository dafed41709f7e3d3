// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! V4L2 report types
//!
//! This module defines the values produced by device discovery:
//!
//! - [`CapabilityReport`] - Static identity of one device (`VIDIOC_QUERYCAP`)
//! - [`FormatDescriptor`] - One supported pixel format (`VIDIOC_ENUM_FMT`)
//! - [`FrameSize`] - Discrete or stepwise frame size (`VIDIOC_ENUM_FRAMESIZES`)
//! - [`FrameInterval`] - Seconds per frame (`VIDIOC_ENUM_FRAMEINTERVALS`)
//! - [`DeviceReport`] - The nested report for one device node

use std::fmt;
use std::path::PathBuf;

use bitflags::bitflags;
use serde::Serialize;

use super::sys;
use crate::fourcc::FourCC;

bitflags! {
    /// V4L2 capability bits (`V4L2_CAP_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        const VIDEO_CAPTURE = 0x0000_0001;
        const VIDEO_OUTPUT = 0x0000_0002;
        const VIDEO_OVERLAY = 0x0000_0004;
        const VBI_CAPTURE = 0x0000_0010;
        const VBI_OUTPUT = 0x0000_0020;
        const SLICED_VBI_CAPTURE = 0x0000_0040;
        const SLICED_VBI_OUTPUT = 0x0000_0080;
        const RDS_CAPTURE = 0x0000_0100;
        const VIDEO_OUTPUT_OVERLAY = 0x0000_0200;
        const HW_FREQ_SEEK = 0x0000_0400;
        const RDS_OUTPUT = 0x0000_0800;
        const VIDEO_CAPTURE_MPLANE = 0x0000_1000;
        const VIDEO_OUTPUT_MPLANE = 0x0000_2000;
        const VIDEO_M2M_MPLANE = 0x0000_4000;
        const VIDEO_M2M = 0x0000_8000;
        const TUNER = 0x0001_0000;
        const AUDIO = 0x0002_0000;
        const RADIO = 0x0004_0000;
        const MODULATOR = 0x0008_0000;
        const SDR_CAPTURE = 0x0010_0000;
        const EXT_PIX_FORMAT = 0x0020_0000;
        const SDR_OUTPUT = 0x0040_0000;
        const META_CAPTURE = 0x0080_0000;
        const READWRITE = 0x0100_0000;
        const STREAMING = 0x0400_0000;
        const META_OUTPUT = 0x0800_0000;
        const TOUCH = 0x1000_0000;
        const IO_MC = 0x2000_0000;
        const DEVICE_CAPS = 0x8000_0000;
    }
}

impl Capabilities {
    /// Names of the set bits, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.bits())?;
        let names = self.names();
        if !names.is_empty() {
            write!(f, " ({})", names.join(", "))?;
        }
        Ok(())
    }
}

impl Serialize for Capabilities {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

/// Kernel version triple packed into `v4l2_capability::version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Version {
    /// Unpack `KERNEL_VERSION(major, minor, patch)`.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            major: ((packed >> 16) & 0xff) as u8,
            minor: ((packed >> 8) & 0xff) as u8,
            patch: (packed & 0xff) as u8,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Static identity of a V4L2 device
///
/// Snapshot of the `VIDIOC_QUERYCAP` reply. Produced once per device node and
/// never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityReport {
    /// Driver name (e.g. "uvcvideo")
    pub driver: String,
    /// Card/device name (e.g. "Integrated Camera")
    pub card: String,
    /// Bus location (e.g. "usb-0000:00:14.0-8")
    pub bus_info: String,
    /// Driver version
    pub version: Version,
    /// Capabilities of the whole physical device
    pub capabilities: Capabilities,
    /// Capabilities of this node, when the driver reports them
    pub device_caps: Option<Capabilities>,
}

impl CapabilityReport {
    /// Capabilities that apply to this node.
    ///
    /// `device_caps` when `DEVICE_CAPS` is set, the device-wide mask otherwise.
    pub fn effective(&self) -> Capabilities {
        self.device_caps.unwrap_or(self.capabilities)
    }

    /// Whether frames can be captured from this node.
    pub fn is_capture(&self) -> bool {
        self.effective()
            .intersects(Capabilities::VIDEO_CAPTURE | Capabilities::VIDEO_CAPTURE_MPLANE)
    }
}

impl From<&sys::V4l2Capability> for CapabilityReport {
    fn from(raw: &sys::V4l2Capability) -> Self {
        let capabilities = Capabilities::from_bits_retain(raw.capabilities);
        let device_caps = capabilities
            .contains(Capabilities::DEVICE_CAPS)
            .then(|| Capabilities::from_bits_retain(raw.device_caps));

        CapabilityReport {
            driver: sys::c_str(&raw.driver),
            card: sys::c_str(&raw.card),
            bus_info: sys::c_str(&raw.bus_info),
            version: Version::from_packed(raw.version),
            capabilities,
            device_caps,
        }
    }
}

/// One pixel format supported on the capture queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    /// Enumeration index the driver answered at
    pub index: u32,
    /// Human-readable description from the driver
    pub description: String,
    /// Four-character code (e.g. "YUYV", "MJPG")
    pub fourcc: FourCC,
    /// `V4L2_FMT_FLAG_*` bits
    pub flags: u32,
}

impl FormatDescriptor {
    /// `V4L2_FMT_FLAG_COMPRESSED`
    pub fn is_compressed(&self) -> bool {
        self.flags & 0x0001 != 0
    }
}

impl From<&sys::V4l2Fmtdesc> for FormatDescriptor {
    fn from(raw: &sys::V4l2Fmtdesc) -> Self {
        FormatDescriptor {
            index: raw.index,
            description: sys::c_str(&raw.description),
            fourcc: FourCC::from_u32(raw.pixelformat),
            flags: raw.flags,
        }
    }
}

/// Video resolution
///
/// Represents an exact frame size (width × height in pixels).
///
/// # Example
///
/// ```
/// use snapcam::v4l2::Resolution;
///
/// let res = Resolution::new(1920, 1080);
/// assert_eq!(res.to_string(), "1920x1080");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Range of frame sizes with step granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepwiseRange {
    pub min_width: u32,
    pub max_width: u32,
    pub step_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub step_height: u32,
}

impl fmt::Display for StepwiseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} - {}x{} step {}x{}",
            self.min_width,
            self.min_height,
            self.max_width,
            self.max_height,
            self.step_width,
            self.step_height
        )
    }
}

/// One answer of the frame-size query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSize {
    /// Exact width × height
    Discrete(Resolution),
    /// Min/max/step ranges; continuous ranges arrive here with step 1
    Stepwise(StepwiseRange),
}

impl From<&sys::V4l2Frmsizeenum> for FrameSize {
    fn from(raw: &sys::V4l2Frmsizeenum) -> Self {
        // SAFETY: `typ` selects the active union member.
        unsafe {
            match raw.typ {
                sys::V4L2_FRMSIZE_TYPE_DISCRETE => FrameSize::Discrete(Resolution::new(
                    raw.frmsize.discrete.width,
                    raw.frmsize.discrete.height,
                )),
                // CONTINUOUS, STEPWISE
                _ => {
                    let s = raw.frmsize.stepwise;
                    FrameSize::Stepwise(StepwiseRange {
                        min_width: s.min_width,
                        max_width: s.max_width,
                        step_width: s.step_width,
                        min_height: s.min_height,
                        max_height: s.max_height,
                        step_height: s.step_height,
                    })
                }
            }
        }
    }
}

/// Capture interval in seconds per frame, as reported (not reduced)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameInterval {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameInterval {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl fmt::Display for FrameInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl From<&sys::V4l2Frmivalenum> for FrameInterval {
    fn from(raw: &sys::V4l2Frmivalenum) -> Self {
        // For stepwise intervals the discrete slot overlays the minimum,
        // which is echoed as-is.
        // SAFETY: both union members start with a `v4l2_fract`.
        let fract = unsafe { raw.frmival.discrete };
        FrameInterval::new(fract.numerator, fract.denominator)
    }
}

/// Frame size entry of a [`FormatReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SizeReport {
    /// Exact size with the intervals enumerated for it
    Discrete {
        #[serde(flatten)]
        resolution: Resolution,
        intervals: Vec<FrameInterval>,
    },
    /// Size range; intervals are not enumerated for ranges
    Stepwise(StepwiseRange),
}

/// A pixel format with its frame sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    #[serde(flatten)]
    pub descriptor: FormatDescriptor,
    pub sizes: Vec<SizeReport>,
}

/// Full enumeration report for one device node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    /// Device path (e.g. "/dev/video0")
    pub path: PathBuf,
    pub capability: CapabilityReport,
    pub formats: Vec<FormatReport>,
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.capability.card,
            self.capability.driver
        )
    }
}
