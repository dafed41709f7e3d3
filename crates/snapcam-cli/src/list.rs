// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Full capability, format, frame size and frame interval report.

use crate::error::CliError;
use clap::Args as ClapArgs;
use serde::Serialize;
use snapcam::v4l2::{
    DeviceEnumerator, DeviceReport, Inventory, NodeOutcome, ScanConfig, SizeReport,
};
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Directory holding the video device nodes
    #[arg(long, default_value = "/dev")]
    dev_dir: PathBuf,

    /// Report a single device node instead of scanning
    #[arg(short, long)]
    device: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    devices: Vec<&'a DeviceReport>,
    skipped: Vec<SkippedNode>,
}

#[derive(Debug, Serialize)]
struct SkippedNode {
    path: PathBuf,
    error: String,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing list command: {:?}", args);

    let enumerator = DeviceEnumerator::new(ScanConfig::default().with_dev_dir(args.dev_dir));

    let inventory = match args.device {
        // An explicitly named device that fails is an error, not a skip
        Some(path) => Inventory {
            nodes: vec![NodeOutcome::Report(enumerator.query(path)?)],
            scan_error: None,
        },
        None => enumerator.list(),
    };

    if let Some(err) = &inventory.scan_error {
        eprintln!("{}", err);
    }
    for (path, error) in inventory.skipped() {
        eprintln!("Skipping {}: {}", path.display(), error);
    }

    if json {
        let output = ListOutput {
            devices: inventory.reports().collect(),
            skipped: inventory
                .skipped()
                .map(|(path, error)| SkippedNode {
                    path: path.to_path_buf(),
                    error: error.to_string(),
                })
                .collect(),
        };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))?;
        println!("{}", json_str);
        return Ok(());
    }

    let mut count = 0;
    for report in inventory.reports() {
        print_report(report);
        count += 1;
    }
    if count == 0 {
        println!("No devices found");
    }

    Ok(())
}

fn print_report(report: &DeviceReport) {
    let caps = &report.capability;
    println!("{}", report.path.display());
    println!("  Driver:       {}", caps.driver);
    println!("  Card:         {}", caps.card);
    println!("  Bus:          {}", caps.bus_info);
    println!("  Version:      {}", caps.version);
    println!("  Capabilities: {}", caps.capabilities);
    if let Some(device_caps) = caps.device_caps {
        println!("  Device caps:  {}", device_caps);
    }

    if report.formats.is_empty() {
        println!("  No capture formats");
    }
    for format in &report.formats {
        let fmt = &format.descriptor;
        println!(
            "  Format {}: {} ({})",
            fmt.index, fmt.fourcc, fmt.description
        );
        for size in &format.sizes {
            match size {
                SizeReport::Discrete {
                    resolution,
                    intervals,
                } => {
                    println!("    Size: {}", resolution);
                    for interval in intervals {
                        println!("      Interval: {} s", interval);
                    }
                }
                SizeReport::Stepwise(range) => println!("    Size: {}", range),
            }
        }
    }
    println!();
}
