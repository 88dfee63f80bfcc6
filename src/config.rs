//! Transform configuration.
//!
//! Two layers: [`ConfigFile`] is the lenient serde-facing shape loaded
//! from a YAML or JSON file, where malformed values degrade to defaults
//! instead of failing the run. [`Config`] is the resolved record the
//! transform consumes: concrete types, normalized ignore lists, tint hex
//! already converted to a hue. Resolution happens once per run; the
//! resolved record is read-only after that.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::color::math;
use crate::error::{DuskError, Result};

pub const DEFAULT_MIN_LIGHTNESS: u8 = 15;
pub const DEFAULT_SATURATION_THRESHOLD: u8 = 65;

/// Resolved configuration for one transform run.
#[derive(Debug, Clone)]
pub struct Config {
    /// When false the transform is a no-op and returns its input.
    pub enabled: bool,
    /// Minimum lift applied to inverted lightness (see `darken`).
    pub min_lightness: u8,
    /// Colors whose natural saturation exceeds this are left untouched.
    pub saturation_threshold: u8,
    /// Normalized (`#`-prefixed, lowercase, shorthand-collapsed) hex
    /// codes excluded from inversion.
    pub ignored_hex_codes: HashSet<String>,
    /// Selectors whose whole rule is skipped.
    pub ignored_selectors: HashSet<String>,
    /// Convert box-shadow colors to variables instead of leaving them
    /// as fixed hsl() literals.
    pub invert_shadows: bool,
    /// Leave bare color keywords (`white`, `black`, ...) untouched.
    pub keep_named_colors: bool,
    /// Suppress the `@media (prefers-color-scheme: dark)` block.
    pub deactivate_auto_detect: bool,
    /// Emit variables as bare HSL triples consumed via `hsl(var(...))`.
    pub use_hsl_variables: bool,
    /// Hue applied to achromatic colors in dark mode, if any.
    pub grayscale_tint: Option<f64>,
    /// Saturation added alongside the grayscale tint hue.
    pub grayscale_tint_amount: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            min_lightness: DEFAULT_MIN_LIGHTNESS,
            saturation_threshold: DEFAULT_SATURATION_THRESHOLD,
            ignored_hex_codes: HashSet::new(),
            ignored_selectors: HashSet::new(),
            invert_shadows: false,
            keep_named_colors: false,
            deactivate_auto_detect: false,
            use_hsl_variables: false,
            grayscale_tint: None,
            grayscale_tint_amount: 0,
        }
    }
}

/// File-level configuration as written by the user.
///
/// Every field is optional and tolerant of sloppy input: numbers may be
/// quoted, the ignore list may be a comma-separated string or a proper
/// list, unknown values simply fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigFile {
    enabled: Option<bool>,
    #[serde(deserialize_with = "lenient_int")]
    min_lightness: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    saturation_threshold: Option<i64>,
    ignored_hex_codes: Option<StringList>,
    ignored_selectors: Option<StringList>,
    invert_shadows: Option<bool>,
    /// Legacy name for `invert_shadows` from the first policy generation.
    invert_black_shadows: Option<bool>,
    keep_named_colors: Option<bool>,
    deactivate_auto_detect: Option<bool>,
    use_hsl_variables: Option<bool>,
    grayscale_tint: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    grayscale_tint_amount: Option<i64>,
}

impl ConfigFile {
    /// Load a config file, choosing the format by extension
    /// (`.json` for JSON, anything else parses as YAML).
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| DuskError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config file: {}", e),
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&source).map_err(|e| DuskError::Config {
                message: format!("Invalid JSON in {}: {}", path.display(), e),
                help: None,
            })
        } else {
            serde_yaml::from_str(&source).map_err(|e| DuskError::Config {
                message: format!("Invalid YAML in {}: {}", path.display(), e),
                help: None,
            })
        }
    }

    /// Resolve into the concrete record used by the transform.
    pub fn resolve(&self) -> Config {
        let defaults = Config::default();

        let ignored_hex_codes = self
            .ignored_hex_codes
            .as_ref()
            .map(|list| {
                list.entries()
                    .iter()
                    .filter_map(|code| normalize_hex_code(code))
                    .collect()
            })
            .unwrap_or_default();

        let ignored_selectors = self
            .ignored_selectors
            .as_ref()
            .map(|list| {
                list.entries()
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Config {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            min_lightness: int_in_range(self.min_lightness, defaults.min_lightness),
            saturation_threshold: int_in_range(
                self.saturation_threshold,
                defaults.saturation_threshold,
            ),
            ignored_hex_codes,
            ignored_selectors,
            invert_shadows: self
                .invert_shadows
                .or(self.invert_black_shadows)
                .unwrap_or(defaults.invert_shadows),
            keep_named_colors: self.keep_named_colors.unwrap_or(defaults.keep_named_colors),
            deactivate_auto_detect: self
                .deactivate_auto_detect
                .unwrap_or(defaults.deactivate_auto_detect),
            use_hsl_variables: self
                .use_hsl_variables
                .unwrap_or(defaults.use_hsl_variables),
            grayscale_tint: self
                .grayscale_tint
                .as_deref()
                .and_then(math::hex_to_hsl)
                .map(|hsl| hsl.h),
            grayscale_tint_amount: int_in_range(self.grayscale_tint_amount, 0),
        }
    }
}

/// A value that may be a comma-separated string or a real list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringList {
    List(Vec<String>),
    Joined(String),
}

impl StringList {
    fn entries(&self) -> Vec<String> {
        match self {
            StringList::List(items) => items.clone(),
            StringList::Joined(s) => s.split(',').map(|s| s.to_string()).collect(),
        }
    }
}

/// Normalize an ignored hex entry: lowercase, `#`-prefixed, collapsed to
/// shorthand where possible. Unparsable entries are dropped.
fn normalize_hex_code(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_lowercase();
    if code.is_empty() {
        return None;
    }
    match math::hex_to_rgb(&code) {
        Some((r, g, b)) => Some(math::rgb_to_hex(r, g, b)),
        None => None,
    }
}

/// Accept an integer, float, or numeric string; anything else is `None`.
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Some(v),
        Raw::Float(v) => Some(v as i64),
        Raw::Text(s) => s.trim().parse().ok(),
        Raw::Other(_) => None,
    })
}

/// Clamp a loose integer into a percent-style field, falling back to the
/// default when missing or out of range.
fn int_in_range(value: Option<i64>, default: u8) -> u8 {
    match value {
        Some(v) if (0..=100).contains(&v) => v as u8,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.enabled);
        assert_eq!(config.min_lightness, 15);
        assert_eq!(config.saturation_threshold, 65);
        assert!(!config.use_hsl_variables);
        assert!(config.ignored_hex_codes.is_empty());
    }

    #[test]
    fn test_resolve_empty_file() {
        let file: ConfigFile = serde_yaml::from_str("{}").unwrap();
        let config = file.resolve();
        assert_eq!(config.min_lightness, 15);
        assert_eq!(config.saturation_threshold, 65);
    }

    #[test]
    fn test_resolve_typical_yaml() {
        let file: ConfigFile = serde_yaml::from_str(
            r##"
minLightness: 30
saturationThreshold: 70
useHslVariables: true
ignoredHexCodes: "#FFFFFF, #1a1a2e"
"##,
        )
        .unwrap();
        let config = file.resolve();
        assert_eq!(config.min_lightness, 30);
        assert_eq!(config.saturation_threshold, 70);
        assert!(config.use_hsl_variables);
        // entries are lowercased and collapsed
        assert!(config.ignored_hex_codes.contains("#fff"));
        assert!(config.ignored_hex_codes.contains("#1a1a2e"));
    }

    #[test]
    fn test_ignored_hex_codes_as_list() {
        let file: ConfigFile =
            serde_yaml::from_str("ignoredHexCodes:\n  - '#ABC'\n  - garbage\n").unwrap();
        let config = file.resolve();
        assert!(config.ignored_hex_codes.contains("#abc"));
        assert_eq!(config.ignored_hex_codes.len(), 1);
    }

    #[test]
    fn test_non_numeric_falls_back() {
        let file: ConfigFile = serde_yaml::from_str("minLightness: plenty\n").unwrap();
        assert_eq!(file.resolve().min_lightness, 15);
    }

    #[test]
    fn test_quoted_number_accepted() {
        let file: ConfigFile = serde_yaml::from_str("minLightness: '25'\n").unwrap();
        assert_eq!(file.resolve().min_lightness, 25);
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let file: ConfigFile = serde_yaml::from_str("saturationThreshold: 400\n").unwrap();
        assert_eq!(file.resolve().saturation_threshold, 65);
    }

    #[test]
    fn test_legacy_shadow_flag() {
        let file: ConfigFile = serde_yaml::from_str("invertBlackShadows: true\n").unwrap();
        assert!(file.resolve().invert_shadows);
    }

    #[test]
    fn test_grayscale_tint_resolves_to_hue() {
        let file: ConfigFile = serde_yaml::from_str("grayscaleTint: '#00f'\n").unwrap();
        assert_eq!(file.resolve().grayscale_tint, Some(240.0));

        let file: ConfigFile = serde_yaml::from_str("grayscaleTint: 'nope'\n").unwrap();
        assert_eq!(file.resolve().grayscale_tint, None);
    }

    #[test]
    fn test_json_config() {
        let file: ConfigFile =
            serde_json::from_str(r#"{"minLightness": 20, "deactivateAutoDetect": true}"#).unwrap();
        let config = file.resolve();
        assert_eq!(config.min_lightness, 20);
        assert!(config.deactivate_auto_detect);
    }
}
