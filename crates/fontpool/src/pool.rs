//! The font pool: authoritative registry of loaded font families.
//!
//! Bridges the scanner's path index to live font handles, reconciles
//! rescans against prior state so user nicknames survive, and persists
//! configuration after every structural mutation.
//!
//! Registry mutation has a single logical owner (`&mut self`); scans and
//! loads are async I/O fan-outs awaited by the mutating call, so a re-scan
//! always completes before its results are applied.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::cancel::ScanGeneration;
use crate::config::{FamilyRecord, FontsConfig, FONTS_CONFIG_KEY, FONTS_CONFIG_VERSION};
use crate::fs::FileSystem;
use crate::load::{FontEnvironment, FontHandle};
use crate::notify::{Notifier, Severity};
use crate::scan::{FontPathIndex, FontScanner};
use crate::store::ConfigStore;
use crate::style::StyleSlot;

/// A font family in the registry.
///
/// `nickname` is `None` until the user assigns one; the empty string is a
/// valid assigned value distinct from unset. Style slots fill in as loads
/// complete.
#[derive(Debug, Default)]
pub struct FontFamily {
    name: String,
    nickname: Option<String>,
    regular: Option<FontHandle>,
    bold: Option<FontHandle>,
    italic: Option<FontHandle>,
    bold_italic: Option<FontHandle>,
}

impl FontFamily {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn handle(&self, slot: StyleSlot) -> Option<&FontHandle> {
        self.slot(slot).as_ref()
    }

    fn slot(&self, slot: StyleSlot) -> &Option<FontHandle> {
        match slot {
            StyleSlot::Regular => &self.regular,
            StyleSlot::Bold => &self.bold,
            StyleSlot::Italic => &self.italic,
            StyleSlot::BoldItalic => &self.bold_italic,
        }
    }

    fn slot_mut(&mut self, slot: StyleSlot) -> &mut Option<FontHandle> {
        match slot {
            StyleSlot::Regular => &mut self.regular,
            StyleSlot::Bold => &mut self.bold,
            StyleSlot::Italic => &mut self.italic,
            StyleSlot::BoldItalic => &mut self.bold_italic,
        }
    }
}

/// Owns the set of scan directories and the family registry.
pub struct FontPool {
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn ConfigStore>,
    notifier: Arc<dyn Notifier>,
    env: Arc<dyn FontEnvironment>,
    scanner: FontScanner,
    scans: ScanGeneration,
    directories: Vec<PathBuf>,
    families: BTreeMap<String, FontFamily>,
    index: FontPathIndex,
}

impl FontPool {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn ConfigStore>,
        notifier: Arc<dyn Notifier>,
        env: Arc<dyn FontEnvironment>,
    ) -> Self {
        Self {
            scanner: FontScanner::new(Arc::clone(&fs)),
            fs,
            store,
            notifier,
            env,
            scans: ScanGeneration::new(),
            directories: Vec::new(),
            families: BTreeMap::new(),
            index: FontPathIndex::new(),
        }
    }

    /// Restores persisted state.
    ///
    /// No saved configuration is a normal startup: the pool stays empty.
    /// Otherwise the directory set is restored, a full scan runs, and
    /// persisted families still present in the fresh index are re-added
    /// with their nicknames.
    pub async fn initialize(&mut self) {
        let value = match self.store.get(FONTS_CONFIG_KEY).await {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to read fonts configuration: {err}");
                None
            }
        };
        let Some(value) = value else {
            return;
        };
        let config: FontsConfig = match serde_json::from_value(value) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring malformed fonts configuration: {err}");
                return;
            }
        };

        self.directories = config.directories.iter().map(PathBuf::from).collect();
        self.rescan().await;

        for (name, record) in config.fonts {
            if self.insert_family(&name).await {
                if let Some(family) = self.families.get_mut(&name) {
                    family.nickname = record.nickname;
                }
            }
        }
        self.persist().await;
    }

    /// Registers a directory and rescans everything.
    ///
    /// Duplicates and paths missing on disk are rejected with a
    /// notification and leave all state unchanged.
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

    /// Unregisters the directory at `index` and rescans everything.
    pub async fn remove_directory(&mut self, index: usize) -> bool {
        if index >= self.directories.len() {
            self.notifier.report("Index out of range.", Severity::Error);
            return false;
        }
        self.directories.remove(index);
        self.rescan().await;
        true
    }

    /// Rebuilds the path index from scratch and reconciles the registry.
    ///
    /// Families present both before and in the new index are re-added with
    /// their nickname copied over; families that vanished from the index
    /// are dropped and their handles released. Families that are new to
    /// the index wait for an explicit [`FontPool::add_font`].
    async fn rescan(&mut self) {
        let mut snapshot = std::mem::take(&mut self.families);
        for family in snapshot.values_mut() {
            self.release_handles(family);
        }

        let token = self.scans.begin();
        self.index = self.scanner.scan(&self.directories, &token).await;

        for (name, old) in snapshot {
            if self.index.contains_key(&name) && self.insert_family(&name).await {
                if let Some(family) = self.families.get_mut(&name) {
                    family.nickname = old.nickname;
                }
            }
        }
        self.persist().await;
    }

    /// Adds a family from the current path index to the registry and loads
    /// its style slots. Returns false if the index has no such family.
    pub async fn add_font(&mut self, name: &str) -> bool {
        if !self.insert_family(name).await {
            return false;
        }
        self.persist().await;
        true
    }

    async fn insert_family(&mut self, name: &str) -> bool {
        let styles = match self.index.get(name) {
            Some(styles) => styles.clone(),
            None => {
                log::warn!("font not found in scanned directories: {name}");
                return false;
            }
        };

        self.families.insert(name.to_string(), FontFamily::new(name));

        // All four slots load concurrently; each one lands in the registry
        // as soon as it completes.
        let mut loads: FuturesUnordered<_> = StyleSlot::ALL
            .into_iter()
            .map(|slot| {
                let env = Arc::clone(&self.env);
                let logical_name = format!("{name}-{slot}");
                let path = resolve_style_path(&styles, slot);
                async move { (slot, load_one(env, logical_name, path).await) }
            })
            .collect();

        while let Some((slot, handle)) = loads.next().await {
            if let (Some(handle), Some(family)) = (handle, self.families.get_mut(name)) {
                *family.slot_mut(slot) = Some(handle);
            }
        }
        true
    }

    /// Loads (or reloads) a single style slot of a registered family,
    /// releasing the handle it previously held.
    ///
    /// Uses the same resolution as [`FontPool::add_font`]: the regular
    /// slot substitutes the first available style when no regular file
    /// exists, and a slot without a file resolves to the placeholder.
    pub async fn load_style(&mut self, name: &str, slot: StyleSlot) -> bool {
        let styles = match self.index.get(name) {
            Some(styles) if self.families.contains_key(name) => styles.clone(),
            _ => {
                self.notifier
                    .report(&format!("Font not found: {name}"), Severity::Error);
                return false;
            }
        };
        let logical_name = format!("{name}-{slot}");
        let handle = load_one(
            Arc::clone(&self.env),
            logical_name,
            resolve_style_path(&styles, slot),
        )
        .await;
        if let Some(family) = self.families.get_mut(name) {
            if let Some(old) = family.slot_mut(slot).take() {
                self.env.unload_font_resource(&old);
            }
            *family.slot_mut(slot) = handle;
        }
        true
    }

    /// Drops a family from the registry, releasing its handles.
    pub async fn remove_font(&mut self, name: &str) -> bool {
        let Some(mut family) = self.families.remove(name) else {
            log::warn!("font not found in registry: {name}");
            return false;
        };
        self.release_handles(&mut family);
        self.persist().await;
        true
    }

    /// Sets a family's nickname. The empty string is a valid nickname.
    pub async fn edit_nickname(&mut self, name: &str, nickname: &str) -> bool {
        let Some(family) = self.families.get_mut(name) else {
            self.notifier
                .report(&format!("Font not found: {name}"), Severity::Error);
            return false;
        };
        family.nickname = Some(nickname.to_string());
        self.persist().await;
        true
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn families(&self) -> &BTreeMap<String, FontFamily> {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&FontFamily> {
        self.families.get(name)
    }

    /// The index built by the most recent scan.
    pub fn path_index(&self) -> &FontPathIndex {
        &self.index
    }

    /// Releases every handle in the registry.
    pub fn dispose(&mut self) {
        let mut families = std::mem::take(&mut self.families);
        for family in families.values_mut() {
            self.release_handles(family);
        }
    }

    fn release_handles(&self, family: &mut FontFamily) {
        for slot in StyleSlot::ALL {
            if let Some(handle) = family.slot_mut(slot).take() {
                self.env.unload_font_resource(&handle);
            }
        }
    }

    async fn persist(&self) {
        let config = FontsConfig {
            version: FONTS_CONFIG_VERSION,
            directories: self
                .directories
                .iter()
                .map(|dir| dir.to_string_lossy().into_owned())
                .collect(),
            fonts: self
                .families
                .iter()
                .map(|(name, family)| {
                    (
                        name.clone(),
                        FamilyRecord {
                            font: family.name.clone(),
                            nickname: family.nickname.clone(),
                        },
                    )
                })
                .collect(),
        };
        let value = match serde_json::to_value(&config) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to serialize fonts configuration: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(FONTS_CONFIG_KEY, &value).await {
            log::warn!("failed to persist fonts configuration: {err}");
        }
    }
}

/// Picks the file a style slot loads from.
///
/// The regular slot substitutes the first available style in the fixed
/// priority bold, italic, bold-italic when no regular-suffixed file
/// exists, so every indexed family gets some regular handle. Other slots
/// load their own file or resolve to the unavailable placeholder.
fn resolve_style_path(styles: &BTreeMap<StyleSlot, PathBuf>, slot: StyleSlot) -> Option<PathBuf> {
    match slot {
        StyleSlot::Regular => styles
            .get(&StyleSlot::Regular)
            .or_else(|| styles.values().next())
            .cloned(),
        other => styles.get(&other).cloned(),
    }
}

async fn load_one(
    env: Arc<dyn FontEnvironment>,
    logical_name: String,
    path: Option<PathBuf>,
) -> Option<FontHandle> {
    match env.load_font_resource(&logical_name, path.as_deref()).await {
        Ok(handle) => Some(handle),
        Err(err) => {
            log::error!("failed to load font {logical_name}: {err}");
            None
        }
    }
}
