// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Single-shot frame grab through the V4L2 `read()` interface.
//!
//! The device is used in whatever format it is currently configured for;
//! no format is negotiated. JPEG payloads are saved as-is, YUYV and GREY
//! frames are converted and encoded with the `image` crate.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

use crate::fourcc::FourCC;
use crate::v4l2::{Capabilities, CaptureDevice, DeviceHandle};
use crate::Error;

/// One captured frame in the device's native format
#[derive(Debug, Clone)]
pub struct Frame {
    pub fourcc: FourCC,
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes, 0 when the driver does not report one
    pub bytes_per_line: u32,
    pub data: Vec<u8>,
}

/// Read a single frame from the capture device at `path`.
///
/// The device must advertise `V4L2_CAP_READWRITE`.
pub fn grab_frame<P: AsRef<Path>>(path: P) -> Result<Frame, Error> {
    let path = path.as_ref();
    let device = DeviceHandle::open_blocking(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let caps = device
        .query_caps()
        .map_err(|source| Error::NotCaptureDevice {
            path: path.to_path_buf(),
            source,
        })?;
    if !caps.effective().contains(Capabilities::READWRITE) {
        return Err(Error::NoReadSupport(path.to_path_buf()));
    }

    let pix = device.capture_format()?;
    let fourcc = FourCC::from_u32(pix.pixelformat);
    log::debug!(
        "{}: reading {} {}x{} ({} bytes)",
        path.display(),
        fourcc,
        pix.width,
        pix.height,
        pix.sizeimage
    );

    let mut data = vec![0u8; pix.sizeimage as usize];
    let len = read_frame(device.file(), &mut data)?;
    data.truncate(len);

    let frame = Frame {
        fourcc,
        width: pix.width,
        height: pix.height,
        bytes_per_line: pix.bytesperline,
        data,
    };

    if let Some(expected) = frame.raw_size() {
        if len < expected {
            return Err(Error::ShortRead {
                expected,
                actual: len,
            });
        }
    }

    Ok(frame)
}

fn read_frame(mut file: &File, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match file.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

impl Frame {
    /// Bytes per pixel of the uncompressed formats this module converts.
    fn bytes_per_pixel(&self) -> Option<u32> {
        match self.fourcc {
            FourCC::YUYV => Some(2),
            FourCC::GREY => Some(1),
            _ => None,
        }
    }

    /// Row stride in bytes, never zero.
    fn stride(&self) -> Option<usize> {
        let min = self.width as usize * self.bytes_per_pixel()? as usize;
        let stride = (self.bytes_per_line as usize).max(min);
        (stride > 0).then_some(stride)
    }

    /// YUYV packs pixels in pairs, so its width must be even.
    fn check_geometry(&self) -> Result<(), Error> {
        let odd_yuyv = self.fourcc == FourCC::YUYV && self.width % 2 != 0;
        if self.width == 0 || self.height == 0 || odd_yuyv {
            return Err(Error::FrameGeometry {
                fourcc: self.fourcc,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Full frame size in bytes, `None` for compressed or unknown formats.
    fn raw_size(&self) -> Option<usize> {
        let stride = self.stride()?;
        Some(stride * self.height as usize)
    }

    /// Decode the frame into an image.
    pub fn to_image(&self) -> Result<DynamicImage, Error> {
        let short = || Error::ShortRead {
            expected: self.raw_size().unwrap_or(0),
            actual: self.data.len(),
        };

        match self.fourcc {
            fourcc if fourcc.is_jpeg() => Ok(image::load_from_memory_with_format(
                &self.data,
                ImageFormat::Jpeg,
            )?),
            FourCC::YUYV => {
                self.check_geometry()?;
                let stride = self.stride().ok_or_else(short)?;
                let rgb = yuyv_to_rgb(&self.data, self.width, self.height, stride);
                RgbImage::from_raw(self.width, self.height, rgb)
                    .map(DynamicImage::ImageRgb8)
                    .ok_or_else(short)
            }
            FourCC::GREY => {
                self.check_geometry()?;
                let stride = self.stride().ok_or_else(short)?;
                let width = self.width as usize;
                let luma: Vec<u8> = self
                    .data
                    .chunks(stride)
                    .take(self.height as usize)
                    .flat_map(|row| row.iter().take(width).copied())
                    .collect();
                GrayImage::from_raw(self.width, self.height, luma)
                    .map(DynamicImage::ImageLuma8)
                    .ok_or_else(short)
            }
            fourcc => Err(Error::UnsupportedFormat(fourcc)),
        }
    }

    /// Save the frame, encoding by the extension of `path`.
    ///
    /// JPEG frames going to a `.jpg`/`.jpeg` file are written unchanged.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let jpeg_target = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
            .unwrap_or(false);

        if self.fourcc.is_jpeg() && jpeg_target {
            std::fs::write(path, &self.data)?;
        } else {
            self.to_image()?.save(path)?;
        }

        log::debug!("saved {} frame to {}", self.fourcc, path.display());
        Ok(())
    }
}

/// Convert packed YUYV 4:2:2 rows to RGB24 using BT.601 limited range.
///
/// `width` is expected to be even; a trailing unpaired pixel is dropped.
/// A zero `stride` yields no pixels.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32, stride: usize) -> Vec<u8> {
    if stride == 0 {
        return Vec::new();
    }

    let row_bytes = width as usize * 2;
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);

    for row in data.chunks(stride).take(height as usize) {
        let Some(row) = row.get(..row_bytes) else {
            break;
        };
        for px in row.chunks_exact(4) {
            let (y0, u, y1, v) = (px[0], px[1], px[2], px[3]);
            rgb.extend_from_slice(&ycbcr_to_rgb(y0, u, v));
            rgb.extend_from_slice(&ycbcr_to_rgb(y1, u, v));
        }
    }

    rgb
}

fn ycbcr_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    let clamp = |x: i32| x.clamp(0, 255) as u8;
    [
        clamp((298 * c + 409 * e + 128) >> 8),
        clamp((298 * c - 100 * d - 208 * e + 128) >> 8),
        clamp((298 * c + 516 * d + 128) >> 8),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("snapcam-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_yuyv_black_and_white() {
        // One black pixel pair, one white pixel pair
        let data = [16, 128, 16, 128, 235, 128, 235, 128];
        let rgb = yuyv_to_rgb(&data, 4, 1, 8);
        assert_eq!(rgb, [0, 0, 0, 0, 0, 0, 255, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_yuyv_skips_row_padding() {
        // 2x2 frame with 2 bytes of padding per row
        let data = [16, 128, 16, 128, 9, 9, 235, 128, 235, 128, 9, 9];
        let rgb = yuyv_to_rgb(&data, 2, 2, 6);
        assert_eq!(rgb.len(), 12);
        assert_eq!(&rgb[..6], &[0, 0, 0, 0, 0, 0]);
        assert_eq!(&rgb[6..], &[255, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_yuyv_zero_stride_yields_nothing() {
        assert!(yuyv_to_rgb(&[16, 128, 16, 128], 2, 1, 0).is_empty());
    }

    #[test]
    fn test_zero_width_grey_frame_is_rejected() {
        let frame = Frame {
            fourcc: FourCC::GREY,
            width: 0,
            height: 0,
            bytes_per_line: 0,
            data: vec![],
        };
        assert!(matches!(
            frame.to_image(),
            Err(Error::FrameGeometry { width: 0, .. })
        ));
    }

    #[test]
    fn test_zero_width_yuyv_frame_is_rejected() {
        let frame = Frame {
            fourcc: FourCC::YUYV,
            width: 0,
            height: 1,
            bytes_per_line: 0,
            data: vec![16, 128, 16, 128],
        };
        assert!(matches!(
            frame.to_image(),
            Err(Error::FrameGeometry { width: 0, height: 1, .. })
        ));
    }

    #[test]
    fn test_odd_width_yuyv_frame_is_rejected() {
        // 3 pixels wide: the last pixel has no chroma partner
        let frame = Frame {
            fourcc: FourCC::YUYV,
            width: 3,
            height: 1,
            bytes_per_line: 8,
            data: vec![16, 128, 16, 128, 16, 128, 16, 128],
        };
        let err = frame.to_image().unwrap_err();
        assert!(matches!(err, Error::FrameGeometry { width: 3, .. }));
        assert_eq!(err.to_string(), "invalid YUYV frame size 3x1");
    }

    #[test]
    fn test_unsupported_format() {
        let frame = Frame {
            fourcc: FourCC(*b"NV12"),
            width: 2,
            height: 2,
            bytes_per_line: 2,
            data: vec![0; 6],
        };
        assert!(matches!(
            frame.to_image(),
            Err(Error::UnsupportedFormat(f)) if f == FourCC(*b"NV12")
        ));
    }

    #[test]
    fn test_truncated_yuyv_frame() {
        let frame = Frame {
            fourcc: FourCC::YUYV,
            width: 4,
            height: 2,
            bytes_per_line: 0,
            data: vec![16; 8],
        };
        assert!(matches!(frame.to_image(), Err(Error::ShortRead { expected: 16, .. })));
    }

    #[test]
    fn test_save_grey_as_png() {
        let frame = Frame {
            fourcc: FourCC::GREY,
            width: 3,
            height: 2,
            bytes_per_line: 4,
            data: vec![1, 2, 3, 0, 4, 5, 6, 0],
        };
        let path = temp_path("grey.png");
        frame.save(&path).unwrap();

        let img = image::open(&path).unwrap().into_luma8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.into_raw(), [1, 2, 3, 4, 5, 6]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_jpeg_passthrough() {
        let payload = vec![0xff, 0xd8, 0x01, 0x02, 0xff, 0xd9];
        let frame = Frame {
            fourcc: FourCC::MJPG,
            width: 640,
            height: 480,
            bytes_per_line: 0,
            data: payload.clone(),
        };
        let path = temp_path("frame.JPG");
        frame.save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), payload);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_grab_missing_device() {
        let err = grab_frame("/nonexistent/video0").unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
