//! User preferences.
//!
//! Persisted as a versioned record; older or partial shapes load with the
//! missing fields filled from defaults.

use std::collections::BTreeMap;

use fontpool::ConfigStore;
use serde::{Deserialize, Serialize};

/// Store key the preferences are saved under.
pub const PREFERENCE_CONFIG_KEY: &str = "preference_configuration";

pub const PREFERENCE_CONFIG_VERSION: u32 = 1;

/// Publication style of the project being typeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Publication {
    Manga,
    Manhwa,
    Manhua,
    Comic,
}

impl Publication {
    pub const ALL: [Self; 4] = [Self::Manga, Self::Manhwa, Self::Manhua, Self::Comic];

    pub fn label(self) -> &'static str {
        match self {
            Self::Manga => "Manga",
            Self::Manhwa => "Manhwa",
            Self::Manhua => "Manhua",
            Self::Comic => "Comic",
        }
    }
}

/// Canvas defaults for one publication style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasStyle {
    pub default_font: Option<String>,
    pub font_size: u32,
    pub color: String,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            default_font: None,
            font_size: 20,
            color: "#000000".to_string(),
        }
    }
}

/// Colors of the text-edge overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEdge {
    pub color_active: String,
    pub color_inactive: String,
}

impl Default for TextEdge {
    fn default() -> Self {
        Self {
            color_active: "#ff000077".to_string(),
            color_inactive: "#00000033".to_string(),
        }
    }
}

/// Color of the padding overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingOverlay {
    pub color_active: String,
}

impl Default for PaddingOverlay {
    fn default() -> Self {
        Self {
            color_active: "#0000ff77".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasPrefs {
    pub styles: BTreeMap<Publication, CanvasStyle>,
    pub text_edge: TextEdge,
    pub padding: PaddingOverlay,
}

impl Default for CanvasPrefs {
    fn default() -> Self {
        Self {
            styles: Publication::ALL
                .into_iter()
                .map(|style| (style, CanvasStyle::default()))
                .collect(),
            text_edge: TextEdge::default(),
            padding: PaddingOverlay::default(),
        }
    }
}

/// Project layout and general settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralPrefs {
    pub dark_mode: bool,
    /// Directory of cleaned page images inside a project.
    pub cleaned_path: String,
    /// Directory of raw page images inside a project.
    pub raw_path: String,
    /// Script file with one line of text per balloon.
    pub text_path: String,
    /// Directory of per-page sidecar data written by the tool.
    pub app_files_path: String,
    pub language: String,
}

impl Default for GeneralPrefs {
    fn default() -> Self {
        Self {
            dark_mode: false,
            cleaned_path: "cleaned".to_string(),
            raw_path: "raw".to_string(),
            text_path: "text.txt".to_string(),
            app_files_path: "app_files".to_string(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preference {
    pub version: u32,
    pub canvas: CanvasPrefs,
    pub general: GeneralPrefs,
}

impl Preference {
    /// Loads preferences, falling back to defaults when nothing was saved
    /// or the saved record cannot be read.
    pub async fn load(store: &dyn ConfigStore) -> Self {
        let value = match store.get(PREFERENCE_CONFIG_KEY).await {
            Ok(Some(value)) => value,
            Ok(None) => return Self::default(),
            Err(err) => {
                log::warn!("failed to read preferences: {err}");
                return Self::default();
            }
        };
        match serde_json::from_value(value) {
            Ok(preference) => preference,
            Err(err) => {
                log::warn!("ignoring malformed preferences: {err}");
                Self::default()
            }
        }
    }

    pub async fn save(&self, store: &dyn ConfigStore) {
        let value = match serde_json::to_value(self) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to serialize preferences: {err}");
                return;
            }
        };
        if let Err(err) = store.set(PREFERENCE_CONFIG_KEY, &value).await {
            log::warn!("failed to persist preferences: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontpool::MemoryConfigStore;
    use serde_json::json;

    #[test]
    fn defaults_cover_all_publication_styles() {
        let prefs = Preference::default();
        for style in Publication::ALL {
            let canvas = &prefs.canvas.styles[&style];
            assert_eq!(canvas.font_size, 20);
            assert_eq!(canvas.color, "#000000");
            assert!(canvas.default_font.is_none());
        }
        assert_eq!(prefs.general.cleaned_path, "cleaned");
        assert_eq!(prefs.general.text_path, "text.txt");
    }

    #[test]
    fn partial_record_fills_defaults() {
        let value = json!({
            "general": { "dark_mode": true, "cleaned_path": "done" }
        });
        let prefs: Preference = serde_json::from_value(value).unwrap();
        assert!(prefs.general.dark_mode);
        assert_eq!(prefs.general.cleaned_path, "done");
        // Untouched fields keep their defaults.
        assert_eq!(prefs.general.raw_path, "raw");
        assert_eq!(prefs.canvas.text_edge.color_active, "#ff000077");
    }

    #[tokio::test]
    async fn load_without_saved_state_is_default() {
        let store = MemoryConfigStore::new();
        let prefs = Preference::load(&store).await;
        assert_eq!(prefs, Preference::default());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let store = MemoryConfigStore::new();
        let mut prefs = Preference::default();
        prefs.version = PREFERENCE_CONFIG_VERSION;
        prefs.general.dark_mode = true;
        prefs
            .canvas
            .styles
            .insert(Publication::Comic, CanvasStyle {
                default_font: Some("Anton".to_string()),
                font_size: 24,
                color: "#222222".to_string(),
            });
        prefs.save(&store).await;

        let loaded = Preference::load(&store).await;
        assert_eq!(loaded, prefs);
    }
}
