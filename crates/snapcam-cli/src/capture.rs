// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Grab one frame and save it as an image file.

use crate::error::CliError;
use clap::Args as ClapArgs;
use serde::Serialize;
use snapcam::capture::grab_frame;
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Output image file; the extension selects the encoding
    #[arg(default_value = "snapshot.jpg")]
    output: PathBuf,

    /// Camera device path or index
    #[arg(short, long, default_value = "/dev/video0")]
    device: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: PathBuf::from("snapshot.jpg"),
            device: "/dev/video0".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CaptureOutput {
    device: PathBuf,
    output: PathBuf,
    format: String,
    width: u32,
    height: u32,
    bytes: usize,
}

/// "2" means /dev/video2, anything else is taken as a path.
fn resolve_device(device: &str) -> PathBuf {
    match device.parse::<u32>() {
        Ok(index) => PathBuf::from(format!("/dev/video{}", index)),
        Err(_) => PathBuf::from(device),
    }
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing capture command: {:?}", args);

    if args.device.is_empty() {
        return Err(CliError::InvalidArgs("--device must not be empty".to_string()));
    }
    let device = resolve_device(&args.device);

    let frame = grab_frame(&device)?;
    if frame.data.is_empty() {
        return Err(CliError::CaptureFailed(format!(
            "no image data received from {}",
            device.display()
        )));
    }

    frame
        .save(&args.output)
        .map_err(|e| CliError::SaveFailed(format!("{}: {}", args.output.display(), e)))?;

    if json {
        let output = CaptureOutput {
            device,
            output: args.output,
            format: frame.fourcc.to_string(),
            width: frame.width,
            height: frame.height,
            bytes: frame.data.len(),
        };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
        println!("{}", json_str);
    } else {
        println!("Saved image to {}", args.output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_device_index() {
        assert_eq!(resolve_device("2"), PathBuf::from("/dev/video2"));
    }

    #[test]
    fn test_resolve_device_path() {
        assert_eq!(resolve_device("/dev/video11"), PathBuf::from("/dev/video11"));
    }

    #[test]
    fn test_missing_device_is_camera_not_found() {
        let args = Args {
            output: std::env::temp_dir().join("snapcam-never-written.jpg"),
            device: "/nonexistent/video0".to_string(),
        };
        assert!(matches!(
            execute(args, false),
            Err(CliError::CameraNotFound(_))
        ));
    }
}
