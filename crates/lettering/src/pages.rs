//! Project page navigation.
//!
//! A project directory holds a `cleaned/` and a `raw/` image per page,
//! a script file, and optional per-page sidecar JSON under `app_files/`.
//! Pages are ordered by the numeric prefix of their file names so
//! `2.png` sorts before `10.png`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use fontpool::scan::has_extension;
use fontpool::FileSystem;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::preference::{GeneralPrefs, Publication};

/// Extensions recognized as page images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Everything the canvas needs to display the current page.
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub cleaned: PathBuf,
    pub raw: PathBuf,
    /// Sidecar data saved by a previous session, if any.
    pub data: Option<Value>,
}

/// An opened project.
#[derive(Debug, Clone)]
pub struct Project {
    style: Publication,
    root: PathBuf,
    cleaned_dir: PathBuf,
    raw_dir: PathBuf,
    text_path: PathBuf,
    app_files_dir: PathBuf,
    pages: Vec<String>,
    current: usize,
}

impl Project {
    /// Opens `root` as a project.
    ///
    /// Fails when the cleaned-images subdirectory (named by preferences)
    /// is missing.
    pub async fn open(
        fs: &dyn FileSystem,
        prefs: &GeneralPrefs,
        root: &Path,
        style: Publication,
    ) -> CoreResult<Self> {
        let cleaned_dir = root.join(&prefs.cleaned_path);
        if !fs.exists(&cleaned_dir).await {
            return Err(CoreError::InvalidInput(format!(
                "does not have the {} directory in {}",
                prefs.cleaned_path,
                root.display()
            )));
        }

        let mut pages: Vec<String> = fs
            .list_dir(&cleaned_dir)
            .await
            .map_err(|err| CoreError::Internal(format!("cannot list page images: {err}")))?
            .into_iter()
            .filter_map(|name| name.into_string().ok())
            .filter(|name| has_extension(Path::new(name), IMAGE_EXTENSIONS))
            .collect();
        pages.sort_by(|a, b| page_order(a, b));

        Ok(Self {
            style,
            cleaned_dir,
            raw_dir: root.join(&prefs.raw_path),
            text_path: root.join(&prefs.text_path),
            app_files_dir: root.join(&prefs.app_files_path),
            root: root.to_path_buf(),
            pages,
            current: 0,
        })
    }

    pub fn style(&self) -> Publication {
        self.style
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn page_name(&self) -> Option<&str> {
        self.pages.get(self.current).map(String::as_str)
    }

    /// Advances one page. False at the last page or in an empty project.
    pub fn next(&mut self) -> bool {
        if self.pages.is_empty() || self.current + 1 >= self.pages.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Steps back one page. False at the first page.
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jumps to `index`. False when out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.pages.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Resolves the current page's image paths and sidecar data.
    pub async fn page_info(&self) -> Option<PageInfo> {
        let name = self.pages.get(self.current)?;
        let sidecar = self.app_files_dir.join(sidecar_name(name));
        let data = match tokio::fs::read(&sidecar).await {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(_) => None,
        };
        Some(PageInfo {
            cleaned: self.cleaned_dir.join(name),
            raw: self.raw_dir.join(name),
            data,
        })
    }
}

/// Numeric-prefix page ordering: `2.png` before `10.png`, names without a
/// numeric prefix first among themselves, lexicographic as the tie-break.
fn page_order(a: &str, b: &str) -> Ordering {
    (numeric_prefix(a), a).cmp(&(numeric_prefix(b), b))
}

fn numeric_prefix(name: &str) -> Option<u64> {
    let digits: &str = name
        .split_once(|c: char| !c.is_ascii_digit())
        .map(|(head, _)| head)
        .unwrap_or(name);
    digits.parse().ok()
}

/// Sidecar files replace everything after the first dot with `.json`.
fn sidecar_name(page: &str) -> String {
    let stem = page.split_once('.').map(|(stem, _)| stem).unwrap_or(page);
    format!("{stem}.json")
}
