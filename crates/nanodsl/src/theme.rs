//! Theme tokens: the configuration surface of the renderers.
//!
//! Themes load from JSON. Every field has a built-in default, so a file only
//! needs the tokens it changes:
//!
//! ```json
//! { "spacing": { "md": 12, "xxl": 48 }, "fontFamily": "Inter, sans-serif" }
//! ```
//!
//! A map given in the file replaces the default map of that name.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Background and text color for an intent or badge color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub foreground: String,
}

impl ColorPair {
    fn new(background: &str, foreground: &str) -> Self {
        Self {
            background: background.to_string(),
            foreground: foreground.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NanoTheme {
    pub font_family: String,
    /// Gap between stack children, in pixels.
    pub spacing: BTreeMap<String, u32>,
    /// Card padding, in pixels.
    pub padding: BTreeMap<String, u32>,
    /// Corner radius, in pixels.
    pub radius: BTreeMap<String, u32>,
    /// CSS `box-shadow` values.
    pub shadows: BTreeMap<String, String>,
    /// Button colors by intent.
    pub intents: BTreeMap<String, ColorPair>,
    /// Badge colors by name.
    pub badge_colors: BTreeMap<String, ColorPair>,
    pub surface_color: String,
    pub border_color: String,
    pub accent_color: String,
    pub muted_color: String,
}

impl Default for NanoTheme {
    fn default() -> Self {
        Self {
            font_family: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif"
                .to_string(),
            spacing: scale(&[("xs", 4), ("sm", 8), ("md", 16), ("lg", 24), ("xl", 32)]),
            padding: scale(&[("xs", 4), ("sm", 8), ("md", 16), ("lg", 24)]),
            radius: scale(&[("none", 0), ("sm", 4), ("md", 8), ("lg", 16), ("full", 9999)]),
            shadows: [
                ("none", "none"),
                ("sm", "0 1px 2px rgba(0,0,0,0.1)"),
                ("md", "0 4px 6px rgba(0,0,0,0.1)"),
                ("lg", "0 10px 15px rgba(0,0,0,0.1)"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            intents: [
                ("primary", ColorPair::new("#6200EE", "white")),
                ("secondary", ColorPair::new("#03DAC6", "black")),
                ("default", ColorPair::new("#E0E0E0", "black")),
                ("error", ColorPair::new("#B00020", "white")),
                ("danger", ColorPair::new("#B00020", "white")),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            badge_colors: [
                ("green", ColorPair::new("#C8E6C9", "#2E7D32")),
                ("red", ColorPair::new("#FFCDD2", "#C62828")),
                ("blue", ColorPair::new("#BBDEFB", "#1565C0")),
                ("default", ColorPair::new("#E0E0E0", "#424242")),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            surface_color: "white".to_string(),
            border_color: "#E0E0E0".to_string(),
            accent_color: "#1976D2".to_string(),
            muted_color: "#666".to_string(),
        }
    }
}

fn scale(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries
        .iter()
        .map(|(name, px)| (name.to_string(), *px))
        .collect()
}

impl NanoTheme {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let theme = Self::from_json_str(&content)?;
        log::debug!("loaded theme from {}", path.as_ref().display());
        Ok(theme)
    }

    pub fn spacing_px(&self, name: &str) -> Option<u32> {
        self.spacing.get(name).copied()
    }

    pub fn padding_px(&self, name: &str) -> Option<u32> {
        self.padding.get(name).copied()
    }

    pub fn radius_px(&self, name: &str) -> Option<u32> {
        self.radius.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_scale() {
        let theme = NanoTheme::default();
        assert_eq!(theme.spacing_px("md"), Some(16));
        assert_eq!(theme.padding_px("lg"), Some(24));
        assert_eq!(theme.radius_px("full"), Some(9999));
        assert_eq!(theme.spacing_px("huge"), None);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let theme = NanoTheme::from_json_str(r#"{"spacing": {"md": 12}, "accentColor": "red"}"#)
            .unwrap();
        assert_eq!(theme.spacing_px("md"), Some(12));
        assert_eq!(theme.spacing_px("lg"), None);
        assert_eq!(theme.accent_color, "red");
        assert_eq!(theme.padding_px("md"), Some(16));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = NanoTheme::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, crate::NanoError::Json(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fontFamily": "Inter"}}"#).unwrap();

        let theme = NanoTheme::from_path(file.path()).unwrap();
        assert_eq!(theme.font_family, "Inter");

        let missing = NanoTheme::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(crate::NanoError::Io(_))));
    }
}
