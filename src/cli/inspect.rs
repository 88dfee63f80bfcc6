//! `dusk inspect` - report what a transform would do, without writing.
//!
//! Lists every color literal found in a stylesheet together with its
//! disposition: the variable it would map to, or the reason it is left
//! alone.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::color::{classify, math, named};
use crate::config::Config;
use crate::css::{parse_stylesheet, AtBody, Component, CssColor, Declaration, Document, Item};
use crate::error::{DuskError, Result};
use crate::output::{display_path, plural, Printer};
use crate::transform::{IMMUTABLE_SUFFIX, VARIABLE_PREFIX};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Stylesheet to inspect
    pub file: PathBuf,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let printer = Printer::new();
    let config = super::load_config(args.config.as_deref())?;

    let source = fs::read_to_string(&args.file).map_err(|e| DuskError::Io {
        path: args.file.clone(),
        message: e.to_string(),
    })?;

    let Ok(document) = parse_stylesheet(&source) else {
        printer.warning(
            "Unparsable",
            &format!("{} would be left unchanged", display_path(&args.file)),
        );
        return Ok(());
    };

    printer.status("Inspecting", &display_path(&args.file));
    let findings = collect(&document, &config);

    let mut variables = 0;
    for finding in &findings {
        if matches!(finding.disposition, Disposition::Variable { .. }) {
            variables += 1;
        }
        println!(
            "{}: {}  {}",
            finding.property,
            printer.cyan(&finding.color),
            describe(&finding.disposition, &printer)
        );
    }

    printer.status(
        "Finished",
        &format!(
            "{}, {} convertible",
            plural(findings.len(), "color", "colors"),
            variables
        ),
    );
    Ok(())
}

/// What the transform would do with one color occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Disposition {
    Variable { name: String, dark: String },
    ShadowLiteral,
    TooSaturated,
    DarkOverlay,
    IgnoredHex,
    IgnoredSelector,
    Immutable,
}

#[derive(Debug)]
struct Finding {
    property: String,
    color: String,
    disposition: Disposition,
}

fn describe(disposition: &Disposition, printer: &Printer) -> String {
    match disposition {
        Disposition::Variable { name, dark } => format!("-> {} (dark: {})", name, dark),
        Disposition::ShadowLiteral => printer.dim("rewritten to a fixed hsl() literal"),
        Disposition::TooSaturated => printer.dim("skipped: saturation above threshold"),
        Disposition::DarkOverlay => printer.dim("skipped: transparent dark overlay"),
        Disposition::IgnoredHex => printer.dim("skipped: ignored hex code"),
        Disposition::IgnoredSelector => printer.dim("skipped: ignored selector"),
        Disposition::Immutable => printer.dim("skipped: immutable property"),
    }
}

fn collect(document: &Document, config: &Config) -> Vec<Finding> {
    let mut findings = Vec::new();
    for item in &document.items {
        collect_item(item, config, &mut findings);
    }
    findings
}

fn collect_item(item: &Item, config: &Config, findings: &mut Vec<Finding>) {
    match item {
        Item::Style(rule) => {
            let ignored = config.ignored_selectors.contains(rule.selectors.as_str());
            for declaration in &rule.declarations {
                collect_declaration(declaration, ignored, config, findings);
            }
        }
        Item::At(at) => match &at.body {
            AtBody::None => {}
            AtBody::Declarations(declarations) => {
                for declaration in declarations {
                    collect_declaration(declaration, false, config, findings);
                }
            }
            AtBody::Rules(items) => {
                for item in items {
                    collect_item(item, config, findings);
                }
            }
        },
    }
}

fn collect_declaration(
    declaration: &Declaration,
    ignored_selector: bool,
    config: &Config,
    findings: &mut Vec<Finding>,
) {
    let property = declaration.property.as_str();
    if property.starts_with(VARIABLE_PREFIX) {
        return;
    }

    let fixed = if ignored_selector {
        Some(Disposition::IgnoredSelector)
    } else if property.ends_with(IMMUTABLE_SUFFIX) {
        Some(Disposition::Immutable)
    } else if property.eq_ignore_ascii_case("box-shadow") && !config.invert_shadows {
        Some(Disposition::ShadowLiteral)
    } else {
        None
    };

    collect_components(&declaration.value, property, fixed.as_ref(), config, findings);
}

fn collect_components(
    components: &[Component],
    property: &str,
    fixed: Option<&Disposition>,
    config: &Config,
    findings: &mut Vec<Finding>,
) {
    for component in components {
        match component {
            Component::Color(color) => findings.push(Finding {
                property: property.to_string(),
                color: color.raw.clone(),
                disposition: match fixed {
                    Some(disposition) => disposition.clone(),
                    None => classify_color(color, config),
                },
            }),
            Component::Ident(name) if !config.keep_named_colors => {
                if let Some(hex) = named::lookup(name) {
                    findings.push(Finding {
                        property: property.to_string(),
                        color: name.clone(),
                        disposition: match fixed {
                            Some(disposition) => disposition.clone(),
                            None => classify_hex(hex, config),
                        },
                    });
                }
            }
            Component::Function { args: children, .. }
            | Component::Paren(children)
            | Component::Square(children) => {
                collect_components(children, property, fixed, config, findings);
            }
            _ => {}
        }
    }
}

/// Mirror of the substitution rules, producing a report entry instead
/// of a rewrite.
fn classify_color(color: &CssColor, config: &Config) -> Disposition {
    if let Some(alpha) = &color.alpha {
        let hsl = color.hsl();
        if classify::is_dark_overlay(&hsl, f64::from(alpha.value)) {
            return Disposition::DarkOverlay;
        }
        let dark = classify::darken(&hsl, config);
        return Disposition::Variable {
            name: format!("--color-rgb-{}-{}-{}", color.r, color.g, color.b),
            dark: dark.triple(),
        };
    }

    let hex = color.hex();
    if config.ignored_hex_codes.contains(&hex) {
        return Disposition::IgnoredHex;
    }
    classify_hex(&hex, config)
}

fn classify_hex(hex: &str, config: &Config) -> Disposition {
    let Some((r, g, b)) = math::hex_to_rgb(hex) else {
        return Disposition::IgnoredHex;
    };
    let hex = math::rgb_to_hex(r, g, b);
    let hsl = math::rgb_to_hsl(r, g, b);

    if classify::exceeds_saturation_threshold(&hsl, config) {
        return Disposition::TooSaturated;
    }

    let dark = classify::darken(&hsl, config);
    let name = format!("--color-{}", hex.trim_start_matches('#'));
    if config.use_hsl_variables {
        Disposition::Variable {
            name,
            dark: dark.triple(),
        }
    } else {
        Disposition::Variable {
            name,
            dark: math::hsl_to_hex(&dark),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn findings(css: &str, config: &Config) -> Vec<Finding> {
        collect(&parse_stylesheet(css).unwrap(), config)
    }

    #[test]
    fn test_reports_variable_mapping() {
        let found = findings("body { color: #000; }", &Config::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].property, "color");
        assert_eq!(found[0].color, "#000");
        assert_eq!(
            found[0].disposition,
            Disposition::Variable {
                name: "--color-000".to_string(),
                dark: "#fff".to_string(),
            }
        );
    }

    #[test]
    fn test_reports_skip_reasons() {
        let config = Config {
            ignored_selectors: [".brand".to_string()].into_iter().collect(),
            ..Config::default()
        };
        let css = ".brand { color: #000; }\n\
                   p { color: #0f0; border-color-immutable: #111; }\n\
                   .scrim { background: rgba(0, 0, 0, 0.4); }\n\
                   .card { box-shadow: 0 1px 2px #000; }\n";
        let found = findings(css, &config);
        let dispositions: Vec<&Disposition> = found.iter().map(|f| &f.disposition).collect();
        assert_eq!(
            dispositions,
            vec![
                &Disposition::IgnoredSelector,
                &Disposition::TooSaturated,
                &Disposition::Immutable,
                &Disposition::DarkOverlay,
                &Disposition::ShadowLiteral,
            ]
        );
    }

    #[test]
    fn test_named_colors_report_shared_variable() {
        let found = findings("p { background: white; }", &Config::default());
        assert_eq!(found[0].color, "white");
        assert_eq!(
            found[0].disposition,
            Disposition::Variable {
                name: "--color-fff".to_string(),
                dark: "#262626".to_string(),
            }
        );
    }

    #[test]
    fn test_generated_namespace_not_reported() {
        let found = findings(":root { --color-000: #000; }", &Config::default());
        assert!(found.is_empty());
    }
}
