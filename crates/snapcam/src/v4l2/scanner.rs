// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Device node scanning and the scan configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::Error;

/// Where and how far to look for capture devices
///
/// # Example
///
/// ```
/// use snapcam::v4l2::ScanConfig;
///
/// let config = ScanConfig::default().with_dev_dir("/tmp/fake-dev").with_max_index(4);
/// assert_eq!(config.node_path(2).to_str(), Some("/tmp/fake-dev/video2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory holding the device nodes
    pub dev_dir: PathBuf,
    /// Node name prefix of capture devices
    pub prefix: String,
    /// Exclusive upper bound of the probed index range
    pub max_index: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dev_dir: PathBuf::from("/dev"),
            prefix: "video".to_owned(),
            max_index: 10,
        }
    }
}

impl ScanConfig {
    pub fn with_dev_dir<P: Into<PathBuf>>(self, dev_dir: P) -> Self {
        Self {
            dev_dir: dev_dir.into(),
            ..self
        }
    }

    pub fn with_prefix(self, prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            ..self
        }
    }

    pub fn with_max_index(self, max_index: u32) -> Self {
        Self { max_index, ..self }
    }

    /// Node path for device `index` (`/dev/video3`).
    pub fn node_path(&self, index: u32) -> PathBuf {
        self.dev_dir.join(format!("{}{}", self.prefix, index))
    }
}

/// Lists the entry names of a directory.
pub trait NodeLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// Lists the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl NodeLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        // The directory handle is closed when the iterator drops.
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect()
    }
}

/// Candidate device paths in `config.dev_dir`.
///
/// Keeps entries whose name starts with `config.prefix`, in listing order.
pub fn scan_nodes<L: NodeLister + ?Sized>(
    lister: &L,
    config: &ScanConfig,
) -> Result<Vec<PathBuf>, Error> {
    let names = lister.list(&config.dev_dir).map_err(|source| Error::ReadDir {
        path: config.dev_dir.clone(),
        source,
    })?;

    Ok(names
        .into_iter()
        .filter(|name| name.starts_with(&config.prefix))
        .map(|name| config.dev_dir.join(name))
        .collect())
}
