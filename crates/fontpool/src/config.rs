//! Persisted font configuration record.
//!
//! Only metadata survives a restart; style-to-handle bindings are
//! process-local and paths are recomputed by scanning, never cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Store key the configuration is saved under.
pub const FONTS_CONFIG_KEY: &str = "fonts_configuration";

/// Record format version. Bump when the shape changes.
pub const FONTS_CONFIG_VERSION: u32 = 1;

/// Serialized shape of the pool's durable state.
///
/// Every field defaults, so older or partial records load cleanly with the
/// missing pieces filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    pub version: u32,
    pub directories: Vec<String>,
    pub fonts: BTreeMap<String, FamilyRecord>,
}

/// Per-family persisted metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyRecord {
    pub font: String,
    pub nickname: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unversioned_record_loads_with_defaults() {
        // Shape written before the version field existed.
        let value = json!({
            "directories": ["/fonts"],
            "fonts": { "NotoSans": { "font": "NotoSans", "nickname": "dialogue" } }
        });
        let config: FontsConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.version, 0);
        assert_eq!(config.directories, vec!["/fonts".to_string()]);
        assert_eq!(config.fonts["NotoSans"].nickname.as_deref(), Some("dialogue"));
    }

    #[test]
    fn partial_family_record_fills_in() {
        let value = json!({ "fonts": { "Anton": {} } });
        let config: FontsConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.fonts["Anton"].font, "");
        assert!(config.fonts["Anton"].nickname.is_none());
    }

    #[test]
    fn null_and_empty_nicknames_stay_distinct() {
        let value = json!({
            "fonts": {
                "A": { "font": "A", "nickname": null },
                "B": { "font": "B", "nickname": "" }
            }
        });
        let config: FontsConfig = serde_json::from_value(value).unwrap();
        assert!(config.fonts["A"].nickname.is_none());
        assert_eq!(config.fonts["B"].nickname.as_deref(), Some(""));
    }

    #[test]
    fn round_trips_through_json() {
        let mut fonts = BTreeMap::new();
        fonts.insert(
            "NotoSans".to_string(),
            FamilyRecord { font: "NotoSans".to_string(), nickname: Some("sfx".to_string()) },
        );
        let config = FontsConfig {
            version: FONTS_CONFIG_VERSION,
            directories: vec!["/fonts/a".to_string(), "/fonts/b".to_string()],
            fonts,
        };
        let value = serde_json::to_value(&config).unwrap();
        let back: FontsConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }
}
