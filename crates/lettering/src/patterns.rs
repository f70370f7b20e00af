//! Pattern image library.
//!
//! Screentones, effects and other reusable art the letterer pastes into
//! pages. Directories are registered and scanned the same way font
//! directories are, but the result is a flat list of image paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontpool::cancel::ScanGeneration;
use fontpool::scan::collect_files;
use fontpool::{ConfigStore, FileSystem, Notifier, Severity};
use serde::{Deserialize, Serialize};

/// Store key the pattern configuration is saved under.
pub const PATTERNS_CONFIG_KEY: &str = "patterns_configuration";

pub const PATTERNS_CONFIG_VERSION: u32 = 1;

/// Extensions recognized as pattern images.
pub const PATTERN_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "svg"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PatternsConfig {
    version: u32,
    directories: Vec<String>,
}

/// Registered pattern directories and the images found under them.
pub struct PatternLibrary {
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn ConfigStore>,
    notifier: Arc<dyn Notifier>,
    scans: ScanGeneration,
    directories: Vec<PathBuf>,
    images: Vec<PathBuf>,
}

impl PatternLibrary {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn ConfigStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            fs,
            store,
            notifier,
            scans: ScanGeneration::new(),
            directories: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Restores persisted directories and scans them. No saved
    /// configuration is a normal startup.
    pub async fn initialize(&mut self) {
        let value = match self.store.get(PATTERNS_CONFIG_KEY).await {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to read patterns configuration: {err}");
                None
            }
        };
        let Some(value) = value else {
            return;
        };
        let config: PatternsConfig = match serde_json::from_value(value) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring malformed patterns configuration: {err}");
                return;
            }
        };
        self.directories = config.directories.iter().map(PathBuf::from).collect();
        self.rescan().await;
    }

    /// Registers a directory and rescans. Duplicates and missing paths are
    /// rejected with a notification.
    pub async fn add_directory(&mut self, path: &Path) -> bool {
        if self.directories.iter().any(|dir| dir == path) {
            self.notifier
                .report("Already have this directory.", Severity::Warning);
            return false;
        }
        if !self.fs.exists(path).await {
            self.notifier
                .report("Directory does not exist.", Severity::Error);
            return false;
        }
        self.directories.push(path.to_path_buf());
        self.rescan().await;
        true
    }

    /// Unregisters the directory at `index` and rescans.
    pub async fn remove_directory(&mut self, index: usize) -> bool {
        if index >= self.directories.len() {
            self.notifier.report("Index out of range.", Severity::Error);
            return false;
        }
        self.directories.remove(index);
        self.rescan().await;
        true
    }

    async fn rescan(&mut self) {
        let token = self.scans.begin();
        self.images =
            collect_files(self.fs.as_ref(), &self.directories, PATTERN_EXTENSIONS, &token).await;
        self.persist().await;
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    async fn persist(&self) {
        let config = PatternsConfig {
            version: PATTERNS_CONFIG_VERSION,
            directories: self
                .directories
                .iter()
                .map(|dir| dir.to_string_lossy().into_owned())
                .collect(),
        };
        let value = match serde_json::to_value(&config) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to serialize patterns configuration: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(PATTERNS_CONFIG_KEY, &value).await {
            log::warn!("failed to persist patterns configuration: {err}");
        }
    }
}
