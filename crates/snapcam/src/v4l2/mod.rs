// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! V4L2 Device Discovery and Enumeration API
//!
//! This module discovers video-capture devices, queries each device's
//! capabilities and enumerates the pixel formats, frame sizes and frame
//! intervals it supports. Every operation is a read-only probe; device state
//! is never changed.
//!
//! # Components
//!
//! - **Scanner**: [`scan_nodes`] lists `/dev` for `video*` nodes
//! - **Prober**: [`probe`] finds the usable capture indices in `0..10`
//! - **Query engine**: [`query_device`] reads `VIDIOC_QUERYCAP` and walks
//!   `VIDIOC_ENUM_FMT` on the capture queue
//! - **Enumerator**: [`enumerate_sizes`] walks `VIDIOC_ENUM_FRAMESIZES` and,
//!   for discrete sizes, `VIDIOC_ENUM_FRAMEINTERVALS`
//!
//! Each driver list is walked from index 0 until the first failing query,
//! which marks the end of the list and is not reported as an error.
//!
//! # Quick Start
//!
//! ```no_run
//! use snapcam::v4l2::DeviceEnumerator;
//!
//! let inventory = DeviceEnumerator::default().list();
//! for device in inventory.reports() {
//!     println!("{}", device);
//! }
//! for (path, error) in inventory.skipped() {
//!     eprintln!("{}: {}", path.display(), error);
//! }
//! ```
//!
//! # Testing Without Hardware
//!
//! The enumeration functions are generic over [`NodeLister`],
//! [`DeviceOpener`] and [`CaptureDevice`], so a fake device tree can stand in
//! for `/dev`.
//!
//! # See Also
//!
//! - [`DeviceEnumerator`] - Main entry point for device discovery
//! - [`DeviceReport`] - Nested report of one device

mod device;
mod enumerator;
mod handle;
mod prober;
mod scanner;
pub(crate) mod sys;
mod walk;

pub use device::{
    Capabilities, CapabilityReport, DeviceReport, FormatDescriptor, FormatReport, FrameInterval,
    FrameSize, Resolution, SizeReport, StepwiseRange, Version,
};
pub use enumerator::{
    enumerate_sizes, list_devices, query_device, DeviceEnumerator, Inventory, NodeOutcome,
};
pub use handle::{CaptureDevice, DeviceHandle, DeviceOpener, V4l2Opener};
pub use prober::probe;
pub use scanner::{scan_nodes, FsLister, NodeLister, ScanConfig};
pub use walk::walk_indices;
