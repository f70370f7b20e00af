//! Filename-based style classification.
//!
//! Grouping is purely syntactic: a font file named `NotoSans-Bold` belongs
//! to the `NotoSans` family with the bold style. No font metadata is read.

use std::fmt;

/// The four style slots a family can carry.
///
/// The variant order is the fallback priority used when a family has no
/// regular-suffixed file: bold, then italic, then bold-italic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleSlot {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl StyleSlot {
    pub const ALL: [Self; 4] = [Self::Regular, Self::Bold, Self::Italic, Self::BoldItalic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::BoldItalic => "bold-italic",
        }
    }
}

impl fmt::Display for StyleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a file base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub family: String,
    pub slot: StyleSlot,
}

/// Style suffixes, longest first so `BoldItalic` wins over `Italic`.
const SUFFIXES: &[&str] = &[
    "bold-italic",
    "bold_italic",
    "bold italic",
    "bolditalic",
    "bold-ital",
    "bold_ital",
    "bold ital",
    "boldital",
    "regular",
    "italic",
    "bold",
    "ital",
    "reg",
];

/// Splits a file base name into a family name and a style slot.
///
/// The suffix match is ASCII-case-insensitive and the suffix may be
/// preceded by `-`, `_`, a space, or nothing at all. A name without a
/// recognized suffix is the regular style of its own family. Always
/// succeeds.
pub fn classify(base_name: &str) -> Classified {
    for suffix in SUFFIXES {
        let Some(prefix) = strip_ascii_suffix(base_name, suffix) else {
            continue;
        };
        let family = prefix
            .strip_suffix(|c: char| matches!(c, '-' | '_' | ' '))
            .unwrap_or(prefix);
        if family.is_empty() {
            // The whole name is a style word; treat it as a family of its own.
            break;
        }
        return Classified {
            family: family.to_string(),
            slot: normalize(suffix),
        };
    }
    Classified {
        family: base_name.to_string(),
        slot: StyleSlot::Regular,
    }
}

/// Strips `suffix` from the end of `name`, ignoring ASCII case.
fn strip_ascii_suffix<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

fn normalize(suffix: &str) -> StyleSlot {
    let bold = suffix.contains("bold");
    let italic = suffix.contains("ital");
    match (bold, italic) {
        (true, true) => StyleSlot::BoldItalic,
        (true, false) => StyleSlot::Bold,
        (false, true) => StyleSlot::Italic,
        (false, false) => StyleSlot::Regular,
    }
}
