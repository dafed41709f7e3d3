// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::fmt;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// Camera device not found or inaccessible
    CameraNotFound(String),
    /// The device opened but no frame could be read
    CaptureFailed(String),
    /// The frame could not be encoded or written
    SaveFailed(String),
    /// General error from the snapcam library
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::CameraNotFound(msg) => write!(f, "Camera not found: {}", msg),
            CliError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            CliError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            CliError::InvalidArgs(_) => 2,
            CliError::CameraNotFound(_) => 3,
            CliError::CaptureFailed(_) => 4,
            CliError::SaveFailed(_) => 5,
            CliError::General(_) => 1,
        }
    }
}

/// Map snapcam::Error to CliError with appropriate exit codes
impl From<snapcam::Error> for CliError {
    fn from(err: snapcam::Error) -> Self {
        use snapcam::Error;

        match err {
            // Node missing, not permitted, or not a V4L2 device at all
            Error::Open { .. } | Error::NotCaptureDevice { .. } => {
                CliError::CameraNotFound(err.to_string())
            }

            // Device is there but the frame read did not work out
            Error::NoReadSupport(_) | Error::ShortRead { .. } | Error::Io(_) => {
                CliError::CaptureFailed(err.to_string())
            }

            // Frame is there but cannot be turned into an image file
            Error::UnsupportedFormat(_) | Error::FrameGeometry { .. } | Error::Image(_) => {
                CliError::SaveFailed(err.to_string())
            }

            Error::ReadDir { .. } => CliError::General(err.to_string()),
        }
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::InvalidArgs("test".into()).code(), 2);
        assert_eq!(CliError::CameraNotFound("test".into()).code(), 3);
        assert_eq!(CliError::CaptureFailed("test".into()).code(), 4);
        assert_eq!(CliError::SaveFailed("test".into()).code(), 5);
        assert_eq!(CliError::General("test".into()).code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = CliError::CameraNotFound("/dev/video0".to_string());
        assert_eq!(format!("{}", err), "Camera not found: /dev/video0");
    }

    #[test]
    fn test_library_error_mapping() {
        let open = snapcam::Error::Open {
            path: PathBuf::from("/dev/video0"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(matches!(CliError::from(open), CliError::CameraNotFound(_)));

        let no_read = snapcam::Error::NoReadSupport(PathBuf::from("/dev/video0"));
        assert!(matches!(CliError::from(no_read), CliError::CaptureFailed(_)));

        let fmt = snapcam::Error::UnsupportedFormat(snapcam::fourcc::FourCC(*b"NV12"));
        assert!(matches!(CliError::from(fmt), CliError::SaveFailed(_)));

        let geometry = snapcam::Error::FrameGeometry {
            fourcc: snapcam::fourcc::FourCC::YUYV,
            width: 0,
            height: 480,
        };
        assert!(matches!(CliError::from(geometry), CliError::SaveFailed(_)));
    }
}
