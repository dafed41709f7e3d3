// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::path::Path;

use super::handle::{CaptureDevice, DeviceOpener};
use super::scanner::ScanConfig;

/// Indices in `0..config.max_index` that open as capture devices.
///
/// Each candidate is opened, asked for its capabilities and closed again
/// before the next index is tried; nothing stays reserved. Failures are
/// skipped. The result is ascending and free of duplicates.
pub fn probe<O: DeviceOpener + ?Sized>(opener: &O, config: &ScanConfig) -> Vec<u32> {
    (0..config.max_index)
        .filter(|&index| {
            let found = is_capture_node(opener, &config.node_path(index));
            if found {
                log::debug!("capture device at index {}", index);
            }
            found
        })
        .collect()
}

fn is_capture_node<O: DeviceOpener + ?Sized>(opener: &O, path: &Path) -> bool {
    let device = match opener.open(path) {
        Ok(device) => device,
        Err(err) => {
            log::debug!("probe {}: {}", path.display(), err);
            return false;
        }
    };

    match device.query_caps() {
        Ok(caps) if caps.is_capture() => true,
        Ok(caps) => {
            log::debug!(
                "probe {}: no capture capability ({})",
                path.display(),
                caps.effective()
            );
            false
        }
        Err(err) => {
            log::debug!("probe {}: {}", path.display(), err);
            false
        }
    }
}
