// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! V4L2 Device Enumerator
//!
//! This module provides the [`DeviceEnumerator`] type and the generic
//! enumeration functions it is built on.

use std::path::{Path, PathBuf};

use super::device::{DeviceReport, FormatReport, SizeReport};
use super::handle::{CaptureDevice, DeviceOpener, V4l2Opener};
use super::prober;
use super::scanner::{scan_nodes, FsLister, NodeLister, ScanConfig};
use super::walk::walk_indices;
use super::FrameSize;
use crate::fourcc::FourCC;
use crate::Error;

/// Result of enumerating one device node
#[derive(Debug)]
pub enum NodeOutcome {
    /// The node answered the capability query
    Report(DeviceReport),
    /// The node could not be opened or is not a V4L2 device
    Skipped { path: PathBuf, error: Error },
}

/// Everything [`list_devices`] found
///
/// Holds one outcome per scanned node. `scan_error` is set when the device
/// directory could not be read, in which case `nodes` is empty.
#[derive(Debug, Default)]
pub struct Inventory {
    pub nodes: Vec<NodeOutcome>,
    pub scan_error: Option<Error>,
}

impl Inventory {
    /// Reports of the nodes that answered, in scan order.
    pub fn reports(&self) -> impl Iterator<Item = &DeviceReport> {
        self.nodes.iter().filter_map(|node| match node {
            NodeOutcome::Report(report) => Some(report),
            NodeOutcome::Skipped { .. } => None,
        })
    }

    /// Nodes that were skipped, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.nodes.iter().filter_map(|node| match node {
            NodeOutcome::Report(_) => None,
            NodeOutcome::Skipped { path, error } => Some((path.as_path(), error)),
        })
    }
}

/// Open `path` and build its full report.
///
/// Fails with [`Error::Open`] when the node cannot be opened and with
/// [`Error::NotCaptureDevice`] when the capability query fails. Formats are
/// walked on the capture queue only; every format has its frame sizes
/// enumerated before the next format index is queried. The handle is closed
/// on every return path.
pub fn query_device<O: DeviceOpener + ?Sized>(
    opener: &O,
    path: &Path,
) -> Result<DeviceReport, Error> {
    let device = opener.open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let capability = device
        .query_caps()
        .map_err(|source| Error::NotCaptureDevice {
            path: path.to_path_buf(),
            source,
        })?;

    let formats = walk_indices(|index| device.format_at(index))
        .map(|descriptor| {
            let sizes = enumerate_sizes(&device, descriptor.fourcc);
            FormatReport { descriptor, sizes }
        })
        .collect();

    Ok(DeviceReport {
        path: path.to_path_buf(),
        capability,
        formats,
    })
}

/// Frame sizes of `fourcc`, each discrete size with its frame intervals.
///
/// Stepwise ranges have no exact size to key the interval query on and are
/// reported without intervals.
pub fn enumerate_sizes<D: CaptureDevice + ?Sized>(device: &D, fourcc: FourCC) -> Vec<SizeReport> {
    walk_indices(|index| device.frame_size_at(fourcc, index))
        .map(|size| match size {
            FrameSize::Discrete(resolution) => SizeReport::Discrete {
                resolution,
                intervals: walk_indices(|index| {
                    device.frame_interval_at(fourcc, resolution, index)
                })
                .collect(),
            },
            FrameSize::Stepwise(range) => SizeReport::Stepwise(range),
        })
        .collect()
}

/// Scan for device nodes and report each one.
///
/// Nothing here is fatal: an unreadable directory yields an empty inventory
/// with `scan_error` set, and nodes that fail to open or answer are recorded
/// as [`NodeOutcome::Skipped`] while the scan moves on.
pub fn list_devices<L, O>(lister: &L, opener: &O, config: &ScanConfig) -> Inventory
where
    L: NodeLister + ?Sized,
    O: DeviceOpener + ?Sized,
{
    let paths = match scan_nodes(lister, config) {
        Ok(paths) => paths,
        Err(err) => {
            log::trace!("scan of {} failed", config.dev_dir.display());
            return Inventory {
                nodes: Vec::new(),
                scan_error: Some(err),
            };
        }
    };

    let nodes = paths
        .into_iter()
        .map(|path| match query_device(opener, &path) {
            Ok(report) => {
                log::debug!("{}: {} format(s)", report, report.formats.len());
                NodeOutcome::Report(report)
            }
            Err(error) => {
                log::trace!("{}: query failed, node skipped", path.display());
                NodeOutcome::Skipped { path, error }
            }
        })
        .collect();

    Inventory {
        nodes,
        scan_error: None,
    }
}

/// V4L2 Device Enumerator
///
/// Entry point for discovery on the real system: scans the configured device
/// directory with [`FsLister`] and opens nodes with [`V4l2Opener`].
///
/// # Example: Find Cameras
///
/// ```no_run
/// use snapcam::v4l2::{DeviceEnumerator, ScanConfig};
///
/// let enumerator = DeviceEnumerator::new(ScanConfig::default().with_max_index(4));
/// let indices = enumerator.find();
/// if indices.is_empty() {
///     println!("No devices found");
/// }
/// for index in indices {
///     println!("camera {}", index);
/// }
/// ```
///
/// # Example: List Formats
///
/// ```no_run
/// use snapcam::v4l2::{DeviceEnumerator, SizeReport};
///
/// let inventory = DeviceEnumerator::default().list();
/// for device in inventory.reports() {
///     println!("{} (driver {})", device.path.display(), device.capability.driver);
///     for format in &device.formats {
///         for size in &format.sizes {
///             if let SizeReport::Discrete { resolution, intervals } = size {
///                 println!("  {} {} {:?}", format.descriptor.fourcc, resolution, intervals);
///             }
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeviceEnumerator {
    config: ScanConfig,
}

impl DeviceEnumerator {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Indices of usable capture devices, ascending.
    pub fn find(&self) -> Vec<u32> {
        prober::probe(&V4l2Opener, &self.config)
    }

    /// Full report of every device node in the configured directory.
    pub fn list(&self) -> Inventory {
        list_devices(&FsLister, &V4l2Opener, &self.config)
    }

    /// Report of a single device node.
    pub fn query<P: AsRef<Path>>(&self, path: P) -> Result<DeviceReport, Error> {
        query_device(&V4l2Opener, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v4l2::{
        CapabilityReport, Capabilities, FormatDescriptor, FrameInterval, Resolution,
        StepwiseRange, Version,
    };
    use std::cell::Cell;
    use std::io;

    struct OneFormatDevice<'a> {
        closed: &'a Cell<u32>,
    }

    impl Drop for OneFormatDevice<'_> {
        fn drop(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    impl CaptureDevice for OneFormatDevice<'_> {
        fn query_caps(&self) -> io::Result<CapabilityReport> {
            Ok(CapabilityReport {
                driver: "vivid".into(),
                card: "Virtual".into(),
                bus_info: "platform:vivid-000".into(),
                version: Version::from_packed(0x0006_0100),
                capabilities: Capabilities::VIDEO_CAPTURE,
                device_caps: None,
            })
        }

        fn format_at(&self, index: u32) -> Option<FormatDescriptor> {
            (index == 0).then(|| FormatDescriptor {
                index,
                description: "YUYV 4:2:2".into(),
                fourcc: FourCC::YUYV,
                flags: 0,
            })
        }

        fn frame_size_at(&self, _fourcc: FourCC, index: u32) -> Option<FrameSize> {
            match index {
                0 => Some(FrameSize::Discrete(Resolution::new(640, 480))),
                1 => Some(FrameSize::Stepwise(StepwiseRange {
                    min_width: 16,
                    max_width: 4096,
                    step_width: 2,
                    min_height: 16,
                    max_height: 2160,
                    step_height: 2,
                })),
                _ => None,
            }
        }

        fn frame_interval_at(
            &self,
            _fourcc: FourCC,
            resolution: Resolution,
            index: u32,
        ) -> Option<FrameInterval> {
            assert_eq!(resolution, Resolution::new(640, 480));
            [FrameInterval::new(1, 30), FrameInterval::new(1, 15)]
                .get(index as usize)
                .copied()
        }
    }

    struct Opener<'a> {
        closed: &'a Cell<u32>,
    }

    impl<'a> DeviceOpener for Opener<'a> {
        type Device = OneFormatDevice<'a>;

        fn open(&self, path: &Path) -> io::Result<Self::Device> {
            if path.ends_with("video0") {
                Ok(OneFormatDevice {
                    closed: self.closed,
                })
            } else {
                Err(io::Error::from(io::ErrorKind::NotFound))
            }
        }
    }

    #[test]
    fn test_query_device_builds_nested_report() {
        let closed = Cell::new(0);
        let report = query_device(&Opener { closed: &closed }, Path::new("/dev/video0")).unwrap();

        assert_eq!(report.capability.card, "Virtual");
        assert_eq!(report.formats.len(), 1);
        assert_eq!(
            report.formats[0].sizes,
            [
                SizeReport::Discrete {
                    resolution: Resolution::new(640, 480),
                    intervals: vec![FrameInterval::new(1, 30), FrameInterval::new(1, 15)],
                },
                SizeReport::Stepwise(StepwiseRange {
                    min_width: 16,
                    max_width: 4096,
                    step_width: 2,
                    min_height: 16,
                    max_height: 2160,
                    step_height: 2,
                }),
            ]
        );
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_query_device_open_failure() {
        let closed = Cell::new(0);
        let err = query_device(&Opener { closed: &closed }, Path::new("/dev/video1")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert_eq!(closed.get(), 0);
    }

    #[test]
    fn test_probe_releases_every_handle() {
        let closed = Cell::new(0);
        let found = prober::probe(&Opener { closed: &closed }, &ScanConfig::default());
        assert_eq!(found, [0]);
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_inventory_accessors() {
        let inventory = Inventory {
            nodes: vec![NodeOutcome::Skipped {
                path: PathBuf::from("/dev/video9"),
                error: Error::NoReadSupport(PathBuf::from("/dev/video9")),
            }],
            scan_error: None,
        };
        assert_eq!(inventory.reports().count(), 0);
        let skipped: Vec<_> = inventory.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, Path::new("/dev/video9"));
    }
}
