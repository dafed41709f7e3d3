// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! snapcam Library for Rust
//!
//! Discovery and diagnostics for Linux video-capture devices. The library
//! walks the V4L2 device nodes exposed under `/dev`, queries each node's
//! capabilities and enumerates the pixel formats, frame sizes and frame
//! intervals it reports.
//!
//! # Quick Start
//!
//! ## Finding Cameras
//!
//! ```no_run
//! use snapcam::v4l2::DeviceEnumerator;
//!
//! for index in DeviceEnumerator::default().find() {
//!     println!("camera at index {}", index);
//! }
//! ```
//!
//! ## Listing Formats
//!
//! ```no_run
//! use snapcam::v4l2::DeviceEnumerator;
//!
//! let inventory = DeviceEnumerator::default().list();
//! for report in inventory.reports() {
//!     println!("{}: {}", report.path.display(), report.capability.card);
//!     for format in &report.formats {
//!         println!("  {} ({})", format.descriptor.fourcc, format.descriptor.description);
//!     }
//! }
//! ```
//!
//! ## Grabbing a Snapshot
//!
//! ```no_run
//! use snapcam::capture::grab_frame;
//!
//! let frame = grab_frame("/dev/video0")?;
//! frame.save("snapshot.jpg")?;
//! # Ok::<(), snapcam::Error>(())
//! ```
//!
//! # Features
//!
//! - Device node scanning with a pluggable directory lister
//! - Capture-capability probing over a bounded index range
//! - Format, frame size and frame interval enumeration via `VIDIOC_ENUM_*`
//! - Single-frame grab through the `read()` I/O method

use std::{error, fmt, io, path::PathBuf};

use crate::fourcc::FourCC;

/// Error type for snapcam operations
#[derive(Debug)]
pub enum Error {
    /// I/O error from underlying system calls
    Io(io::Error),

    /// The device node could not be opened
    Open { path: PathBuf, source: io::Error },

    /// The capability query failed, the node is not a usable V4L2 device
    NotCaptureDevice { path: PathBuf, source: io::Error },

    /// The device directory could not be listed
    ReadDir { path: PathBuf, source: io::Error },

    /// The device does not support the `read()` I/O method
    NoReadSupport(PathBuf),

    /// The driver returned fewer bytes than a full frame needs
    ShortRead { expected: usize, actual: usize },

    /// The current pixel format cannot be converted into an image
    UnsupportedFormat(FourCC),

    /// The reported dimensions cannot describe a frame of this format
    FrameGeometry {
        fourcc: FourCC,
        width: u32,
        height: u32,
    },

    /// Image encoding or decoding failed
    Image(image::ImageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Open { path, source } => {
                write!(f, "cannot open {}: {}", path.display(), source)
            }
            Error::NotCaptureDevice { path, source } => {
                write!(f, "{} is not a V4L2 device: {}", path.display(), source)
            }
            Error::ReadDir { path, source } => {
                write!(f, "cannot read directory {}: {}", path.display(), source)
            }
            Error::NoReadSupport(path) => {
                write!(f, "{} does not support read() capture", path.display())
            }
            Error::ShortRead { expected, actual } => {
                write!(f, "short frame: expected {} bytes, got {}", expected, actual)
            }
            Error::UnsupportedFormat(fourcc) => {
                write!(f, "unsupported pixel format for saving: {}", fourcc)
            }
            Error::FrameGeometry {
                fourcc,
                width,
                height,
            } => write!(f, "invalid {} frame size {}x{}", fourcc, width, height),
            Error::Image(err) => write!(f, "image error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Open { source, .. } => Some(source),
            Error::NotCaptureDevice { source, .. } => Some(source),
            Error::ReadDir { source, .. } => Some(source),
            Error::Image(err) => Some(err),
            Error::NoReadSupport(_)
            | Error::ShortRead { .. }
            | Error::UnsupportedFormat(_)
            | Error::FrameGeometry { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<nix::Error> for Error {
    fn from(err: nix::Error) -> Self {
        Error::Io(io::Error::from(err))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err)
    }
}

/// The v4l2 module provides device discovery and capability enumeration.
pub mod v4l2;

/// The capture module provides the single-frame grab and save path.
pub mod capture;

/// The fourcc module provides portable handling of fourcc codes.
pub mod fourcc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_open_error_display() {
        let err = Error::Open {
            path: PathBuf::from("/dev/video7"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let msg = format!("{}", err);
        assert!(msg.starts_with("cannot open /dev/video7"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_nix_error_maps_to_io() {
        let err = Error::from(nix::Error::EINVAL);
        match err {
            Error::Io(io_err) => assert_eq!(io_err.raw_os_error(), Some(libc::EINVAL)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = Error::UnsupportedFormat(FourCC(*b"NV12"));
        assert_eq!(
            format!("{}", err),
            "unsupported pixel format for saving: NV12"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_frame_geometry_display() {
        let err = Error::FrameGeometry {
            fourcc: FourCC::YUYV,
            width: 3,
            height: 2,
        };
        assert_eq!(format!("{}", err), "invalid YUYV frame size 3x2");
        assert!(err.source().is_none());
    }
}
