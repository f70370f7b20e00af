//! Recursive directory scanning.
//!
//! The walk fans out concurrently per directory and per subdirectory. An
//! unreadable branch is logged and abandoned without failing the scan;
//! sibling results are kept. Entries are visited in name order and roots
//! are merged in registration order with first-insertion-wins, so the
//! resulting index is deterministic regardless of fan-out timing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::{join_all, BoxFuture};

use crate::cancel::ScanToken;
use crate::fs::{base_name_no_ext, FileSystem};
use crate::style::{classify, StyleSlot};

/// Extensions recognized as font files.
pub const FONT_EXTENSIONS: &[&str] = &["otf", "ttf"];

/// Transient mapping rebuilt on every scan: family -> style -> path.
pub type FontPathIndex = BTreeMap<String, BTreeMap<StyleSlot, PathBuf>>;

/// Walks registered directories and builds the font path index.
#[derive(Clone)]
pub struct FontScanner {
    fs: Arc<dyn FileSystem>,
}

impl FontScanner {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Scans all directories and indexes every font file found.
    ///
    /// When two files collide on the same `(family, style)` key the one
    /// from the earliest directory in registration order wins.
    pub async fn scan(&self, directories: &[PathBuf], token: &ScanToken) -> FontPathIndex {
        let files = collect_files(self.fs.as_ref(), directories, FONT_EXTENSIONS, token).await;
        let mut index = FontPathIndex::new();
        for path in files {
            let Some(base) = base_name_no_ext(&path) else {
                continue;
            };
            let classified = classify(base);
            index
                .entry(classified.family)
                .or_default()
                .entry(classified.slot)
                .or_insert(path);
        }
        index
    }
}

/// Collects every file under `directories` carrying one of `extensions`.
///
/// Roots are walked concurrently but the returned paths preserve
/// registration order between roots and name order within a root.
pub async fn collect_files(
    fs: &dyn FileSystem,
    directories: &[PathBuf],
    extensions: &[&str],
    token: &ScanToken,
) -> Vec<PathBuf> {
    let roots = directories
        .iter()
        .map(|dir| walk(fs, dir.clone(), extensions, token));
    join_all(roots).await.into_iter().flatten().collect()
}

fn walk<'a>(
    fs: &'a dyn FileSystem,
    dir: PathBuf,
    extensions: &'a [&'a str],
    token: &'a ScanToken,
) -> BoxFuture<'a, Vec<PathBuf>> {
    Box::pin(async move {
        if token.is_cancelled() {
            return Vec::new();
        }
        let mut names = match fs.list_dir(&dir).await {
            Ok(names) => names,
            Err(err) => {
                log::warn!("skipping unreadable directory {}: {err}", dir.display());
                return Vec::new();
            }
        };
        names.sort();

        let children = names.into_iter().map(|name| {
            let path = dir.join(&name);
            async move {
                if fs.is_dir(&path).await {
                    walk(fs, path, extensions, token).await
                } else if has_extension(&path, extensions) {
                    vec![path]
                } else {
                    Vec::new()
                }
            }
        });
        join_all(children).await.into_iter().flatten().collect()
    })
}

/// Case-insensitive extension filter.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}
