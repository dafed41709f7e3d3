// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Probe device indices for usable capture devices.

use crate::error::CliError;
use clap::Args as ClapArgs;
use serde::Serialize;
use snapcam::v4l2::{DeviceEnumerator, ScanConfig};
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Probe indices 0 up to (excluding) this value
    #[arg(long, default_value_t = 10)]
    max_index: u32,

    /// Directory holding the video device nodes
    #[arg(long, default_value = "/dev")]
    dev_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct FindOutput {
    devices: Vec<u32>,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing find command: {:?}", args);

    if args.max_index == 0 {
        return Err(CliError::InvalidArgs(
            "--max-index must be at least 1".to_string(),
        ));
    }

    let config = ScanConfig::default()
        .with_dev_dir(args.dev_dir)
        .with_max_index(args.max_index);
    let devices = DeviceEnumerator::new(config).find();

    if json {
        let json_str = serde_json::to_string_pretty(&FindOutput { devices })
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
        println!("{}", json_str);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No devices found");
    }
    for index in devices {
        println!("Found camera at index {}", index);
    }

    Ok(())
}
