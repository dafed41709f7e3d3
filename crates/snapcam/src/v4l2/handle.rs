// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Device handles and the query surface the enumerator runs against.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use super::device::{CapabilityReport, FormatDescriptor, FrameInterval, FrameSize, Resolution};
use super::sys;
use crate::fourcc::FourCC;

/// Queries a capture device answers.
///
/// The `*_at` queries return `None` once `index` runs past the last entry.
/// Any failure reads as end-of-list; the kernel answers `EINVAL` there, and
/// other errors are not told apart.
pub trait CaptureDevice {
    /// Static identity and capability bits (`VIDIOC_QUERYCAP`).
    fn query_caps(&self) -> io::Result<CapabilityReport>;

    /// Capture-queue pixel format at `index` (`VIDIOC_ENUM_FMT`).
    fn format_at(&self, index: u32) -> Option<FormatDescriptor>;

    /// Frame size at `index` for `fourcc` (`VIDIOC_ENUM_FRAMESIZES`).
    fn frame_size_at(&self, fourcc: FourCC, index: u32) -> Option<FrameSize>;

    /// Frame interval at `index` for `fourcc` at `resolution`
    /// (`VIDIOC_ENUM_FRAMEINTERVALS`).
    fn frame_interval_at(
        &self,
        fourcc: FourCC,
        resolution: Resolution,
        index: u32,
    ) -> Option<FrameInterval>;
}

/// Opens device nodes.
///
/// The returned device is owned by the caller and closed when dropped.
pub trait DeviceOpener {
    type Device: CaptureDevice;

    fn open(&self, path: &Path) -> io::Result<Self::Device>;
}

/// Opens real V4L2 nodes as [`DeviceHandle`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct V4l2Opener;

impl DeviceOpener for V4l2Opener {
    type Device = DeviceHandle;

    fn open(&self, path: &Path) -> io::Result<DeviceHandle> {
        DeviceHandle::open(path)
    }
}

/// Open V4L2 device node
///
/// Owns the file descriptor; it is closed exactly once when the handle is
/// dropped.
#[derive(Debug)]
pub struct DeviceHandle {
    file: File,
    path: PathBuf,
}

impl DeviceHandle {
    /// Open `path` read-write and non-blocking, as required for probing.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::open_with(path.as_ref(), libc::O_NONBLOCK)
    }

    /// Open `path` read-write with blocking `read()`.
    pub fn open_blocking<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::open_with(path.as_ref(), 0)
    }

    fn open_with(path: &Path, flags: i32) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(flags)
            .open(path)?;
        log::trace!("opened {} (fd {})", path.display(), file.as_raw_fd());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn file(&self) -> &File {
        &self.file
    }

    fn fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }

    pub(crate) fn capability(&self) -> io::Result<sys::V4l2Capability> {
        let mut caps: sys::V4l2Capability = sys::zeroed();
        // SAFETY: fd is open for the lifetime of self; caps matches the ABI.
        unsafe { sys::vidioc_querycap(self.fd(), &mut caps) }?;
        Ok(caps)
    }

    pub(crate) fn enum_format(&self, index: u32) -> io::Result<sys::V4l2Fmtdesc> {
        let mut desc: sys::V4l2Fmtdesc = sys::zeroed();
        desc.index = index;
        desc.typ = sys::V4L2_BUF_TYPE_VIDEO_CAPTURE;
        // SAFETY: as above.
        unsafe { sys::vidioc_enum_fmt(self.fd(), &mut desc) }?;
        Ok(desc)
    }

    pub(crate) fn enum_frame_size(&self, fourcc: FourCC, index: u32) -> io::Result<sys::V4l2Frmsizeenum> {
        let mut size: sys::V4l2Frmsizeenum = sys::zeroed();
        size.index = index;
        size.pixel_format = fourcc.as_u32();
        // SAFETY: as above.
        unsafe { sys::vidioc_enum_framesizes(self.fd(), &mut size) }?;
        Ok(size)
    }

    pub(crate) fn enum_frame_interval(
        &self,
        fourcc: FourCC,
        resolution: Resolution,
        index: u32,
    ) -> io::Result<sys::V4l2Frmivalenum> {
        let mut ival: sys::V4l2Frmivalenum = sys::zeroed();
        ival.index = index;
        ival.pixel_format = fourcc.as_u32();
        ival.width = resolution.width;
        ival.height = resolution.height;
        // SAFETY: as above.
        unsafe { sys::vidioc_enum_frameintervals(self.fd(), &mut ival) }?;
        Ok(ival)
    }

    /// Current capture format (`VIDIOC_G_FMT`).
    pub(crate) fn capture_format(&self) -> io::Result<sys::V4l2PixFormat> {
        let mut format: sys::V4l2Format = sys::zeroed();
        format.typ = sys::V4L2_BUF_TYPE_VIDEO_CAPTURE;
        // SAFETY: as above.
        unsafe { sys::vidioc_g_fmt(self.fd(), &mut format) }?;
        // SAFETY: the kernel fills `pix` for single-planar capture.
        Ok(unsafe { format.fmt.pix })
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        log::trace!("closing {}", self.path.display());
    }
}

impl CaptureDevice for DeviceHandle {
    fn query_caps(&self) -> io::Result<CapabilityReport> {
        self.capability().map(|raw| CapabilityReport::from(&raw))
    }

    fn format_at(&self, index: u32) -> Option<FormatDescriptor> {
        end_of_list(self.enum_format(index), "format", index).map(|raw| FormatDescriptor::from(&raw))
    }

    fn frame_size_at(&self, fourcc: FourCC, index: u32) -> Option<FrameSize> {
        end_of_list(self.enum_frame_size(fourcc, index), "frame size", index)
            .map(|raw| FrameSize::from(&raw))
    }

    fn frame_interval_at(
        &self,
        fourcc: FourCC,
        resolution: Resolution,
        index: u32,
    ) -> Option<FrameInterval> {
        end_of_list(
            self.enum_frame_interval(fourcc, resolution, index),
            "frame interval",
            index,
        )
        .map(|raw| FrameInterval::from(&raw))
    }
}

fn end_of_list<T>(result: io::Result<T>, what: &str, index: u32) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!("{} enumeration ended at index {}: {}", what, index, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_node() {
        let err = DeviceHandle::open("/nonexistent/video0").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_queries_on_regular_file_fail() {
        // A regular file is not a V4L2 node: every ioctl reports ENOTTY.
        let path = std::env::temp_dir().join(format!("snapcam-handle-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let handle = DeviceHandle::open(&path).unwrap();
        assert!(handle.query_caps().is_err());
        assert_eq!(handle.format_at(0), None);
        assert_eq!(handle.frame_size_at(FourCC::YUYV, 0), None);
        assert_eq!(
            handle.frame_interval_at(FourCC::YUYV, Resolution::new(640, 480), 0),
            None
        );
        drop(handle);

        std::fs::remove_file(&path).unwrap();
    }
}
