//! Font environment: loading and unloading of font resources.
//!
//! Handles are process-local; only family metadata is ever persisted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{FontError, Result};

/// An opaque handle to a style slot's font resource.
///
/// `Unavailable` is the explicit placeholder a slot resolves to when the
/// family has no file for that style. It keeps partial families (for
/// example regular-only) usable without blocking or erroring.
#[derive(Debug, Clone)]
pub enum FontHandle {
    Loaded(Arc<LoadedFont>),
    Unavailable,
}

impl FontHandle {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&LoadedFont> {
        match self {
            Self::Loaded(font) => Some(font),
            Self::Unavailable => None,
        }
    }
}

/// A decoded font resource held in memory.
#[derive(Debug)]
pub struct LoadedFont {
    /// Registration name, `"{family}-{style}"`.
    pub logical_name: String,
    /// File the resource was loaded from.
    pub source: PathBuf,
    /// Raw font bytes.
    pub data: Vec<u8>,
}

/// The rendering environment fonts are loaded into.
#[async_trait]
pub trait FontEnvironment: Send + Sync {
    /// Loads a font resource.
    ///
    /// A missing `source` resolves to [`FontHandle::Unavailable`]; a present
    /// source that cannot be read or decoded is an error.
    async fn load_font_resource(
        &self,
        logical_name: &str,
        source: Option<&Path>,
    ) -> Result<FontHandle>;

    /// Releases a previously loaded resource.
    fn unload_font_resource(&self, handle: &FontHandle);
}

/// Loads fonts by reading their files and validating the sfnt container
/// magic. Good enough for a headless core; a GPU-backed UI would register
/// the bytes with its glyph rasterizer instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFontLoader;

#[async_trait]
impl FontEnvironment for FileFontLoader {
    async fn load_font_resource(
        &self,
        logical_name: &str,
        source: Option<&Path>,
    ) -> Result<FontHandle> {
        let Some(path) = source.filter(|path| !path.as_os_str().is_empty()) else {
            return Ok(FontHandle::Unavailable);
        };
        let data = tokio::fs::read(path).await?;
        if !is_sfnt(&data) {
            return Err(FontError::NotAFont(path.to_path_buf()));
        }
        Ok(FontHandle::Loaded(Arc::new(LoadedFont {
            logical_name: logical_name.to_string(),
            source: path.to_path_buf(),
            data,
        })))
    }

    fn unload_font_resource(&self, handle: &FontHandle) {
        if let Some(font) = handle.loaded() {
            log::debug!("unloading font resource {}", font.logical_name);
        }
    }
}

/// Checks the four-byte sfnt version tag shared by `.ttf` and `.otf` files.
fn is_sfnt(data: &[u8]) -> bool {
    matches!(
        data.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}
