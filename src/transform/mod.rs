//! The transform pipeline: parse, walk, emit, serialize.
//!
//! [`transform`] is a pure function over one stylesheet. Every failure
//! mode degrades to returning the input text unchanged; the caller never
//! sees an error from the core.

mod vars;
mod walker;

pub use vars::{VariableEntry, VariableSet};
pub use walker::{Walker, IMMUTABLE_SUFFIX, VARIABLE_PREFIX};

use crate::config::Config;
use crate::css::parse_stylesheet;

/// Rewrite a stylesheet with dark-mode variable blocks.
///
/// Returns the input unchanged when the transform is disabled, the input
/// does not parse, or no invertible colors were found.
pub fn transform(css: &str, config: &Config) -> String {
    if !config.enabled {
        return css.to_string();
    }

    let Ok(mut document) = parse_stylesheet(css) else {
        return css.to_string();
    };

    let mut walker = Walker::new(config);
    walker.walk_document(&mut document);
    let vars = walker.into_vars();

    if vars.is_empty() {
        return css.to_string();
    }

    for item in vars.into_blocks(config.deactivate_auto_detect) {
        document.push(item);
    }
    document.to_css()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_transform_end_to_end() {
        let css = "body { color: #000; }";
        assert_eq!(
            transform(css, &Config::default()),
            "body {\n  color: var(--color-000);\n}\n\
             :root {\n  --color-000: #000;\n}\n\
             :root[data-theme=\"dark\"] {\n  --color-000: #fff;\n}\n\
             @media (prefers-color-scheme: dark) {\n  :root:not([data-theme=\"light\"]) {\n    --color-000: #fff;\n  }\n}\n"
        );
    }

    #[test]
    fn test_disabled_returns_input() {
        let config = Config {
            enabled: false,
            ..Config::default()
        };
        let css = "body { color: #000; }";
        assert_eq!(transform(css, &config), css);
    }

    #[test]
    fn test_unparsable_returns_input() {
        let css = "body { color red }";
        assert_eq!(transform(css, &Config::default()), css);
    }

    #[test]
    fn test_no_invertible_colors_returns_input() {
        // saturated green exceeds the default threshold; nothing else
        let css = "p { color: #0f0; margin: 0 auto; }";
        assert_eq!(transform(css, &Config::default()), css);
    }

    #[test]
    fn test_auto_detect_disabled() {
        let config = Config {
            deactivate_auto_detect: true,
            ..Config::default()
        };
        let out = transform("body { color: #000; }", &config);
        assert!(!out.contains("@media (prefers-color-scheme: dark)"));
        assert!(out.contains(":root {"));
        assert!(out.contains(":root[data-theme=\"dark\"] {"));
    }

    #[test]
    fn test_idempotent() {
        let css = "body { color: #000; background: #f5f5f5; }\n\
                   .overlay { background: rgba(255, 255, 255, 0.75); }\n\
                   .card { box-shadow: 0 1px 2px #000; }\n";
        let config = Config::default();
        let once = transform(css, &config);
        let twice = transform(&once, &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotent_hsl_mode() {
        let config = Config {
            use_hsl_variables: true,
            ..Config::default()
        };
        let css = "p { color: #fff; border-color: rgba(0, 0, 0, 0.8); }";
        let once = transform(css, &config);
        assert_eq!(transform(&once, &config), once);
    }

    #[test]
    fn test_media_rules_are_transformed_too() {
        let css = "@media (min-width: 40em) { p { color: #333; } }";
        let out = transform(css, &Config::default());
        assert!(out.contains("color: var(--color-333)"));
        assert!(out.contains("--color-333: #333;"));
    }

    #[test]
    fn test_variables_appended_after_existing_rules() {
        let out = transform("p { color: #000; }", &Config::default());
        let rule = out.find("p {").unwrap();
        let light = out.find(":root {").unwrap();
        let dark = out.find(":root[data-theme=\"dark\"]").unwrap();
        let media = out.find("@media (prefers-color-scheme: dark)").unwrap();
        assert!(rule < light && light < dark && dark < media);
    }
}
