//! Stylesheet traversal and color substitution.

use crate::color::{classify, math, named};
use crate::config::Config;
use crate::css::{AtBody, Component, CssColor, Declaration, Document, Item};

use super::vars::VariableSet;

/// Declarations whose property carries this suffix are never rewritten;
/// it is the author's escape hatch for intentionally fixed colors.
pub const IMMUTABLE_SUFFIX: &str = "-immutable";

/// Namespace of the generated variables. Declarations under it are
/// skipped so the transform is idempotent over its own output.
pub const VARIABLE_PREFIX: &str = "--color-";

/// Walks a parsed document, substituting eligible color literals with
/// variable references and collecting the variable entries.
pub struct Walker<'a> {
    config: &'a Config,
    vars: VariableSet,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            vars: VariableSet::new(),
        }
    }

    pub fn into_vars(self) -> VariableSet {
        self.vars
    }

    /// Visit every declaration value in source order, depth-first
    /// through nested at-rules and value functions.
    pub fn walk_document(&mut self, document: &mut Document) {
        for item in &mut document.items {
            self.walk_item(item);
        }
    }

    fn walk_item(&mut self, item: &mut Item) {
        match item {
            Item::Style(rule) => {
                if self.config.ignored_selectors.contains(rule.selectors.as_str()) {
                    return;
                }
                for declaration in &mut rule.declarations {
                    self.walk_declaration(declaration);
                }
            }
            Item::At(at) => match &mut at.body {
                AtBody::None => {}
                AtBody::Declarations(declarations) => {
                    for declaration in declarations {
                        self.walk_declaration(declaration);
                    }
                }
                AtBody::Rules(items) => {
                    for item in items {
                        self.walk_item(item);
                    }
                }
            },
        }
    }

    fn walk_declaration(&mut self, declaration: &mut Declaration) {
        let property = declaration.property.as_str();
        if property.ends_with(IMMUTABLE_SUFFIX) || property.starts_with(VARIABLE_PREFIX) {
            return;
        }
        if property.eq_ignore_ascii_case("box-shadow") && !self.config.invert_shadows {
            // shadows stay theme-fixed, but their colors are rewritten
            // to equivalent hsl()/hsla() literals
            canonicalize_shadow(&mut declaration.value);
            return;
        }
        self.walk_components(&mut declaration.value);
    }

    fn walk_components(&mut self, components: &mut Vec<Component>) {
        for component in components.iter_mut() {
            let replacement = match &*component {
                Component::Color(color) => self.substitute_color(color),
                Component::Ident(name) if !self.config.keep_named_colors => {
                    named::lookup(name).and_then(|hex| self.substitute_hex(hex))
                }
                _ => None,
            };
            if let Some(replacement) = replacement {
                *component = replacement;
                continue;
            }
            if let Component::Function { args: children, .. }
            | Component::Paren(children)
            | Component::Square(children) = component
            {
                self.walk_components(children);
            }
        }
    }

    fn substitute_color(&mut self, color: &CssColor) -> Option<Component> {
        if let Some(alpha) = &color.alpha {
            let hsl = color.hsl();
            if classify::is_dark_overlay(&hsl, f64::from(alpha.value)) {
                return None;
            }

            let name = format!("--color-rgb-{}-{}-{}", color.r, color.g, color.b);
            let dark = classify::darken(&hsl, self.config);
            // alpha-bearing variables are always HSL triples, consumed
            // through hsla() at the point of use
            self.vars.insert(name.clone(), hsl.triple(), dark.triple());
            return Some(Component::Raw(format!("hsla(var({}),{})", name, alpha.css)));
        }

        let hex = color.hex();
        if self.config.ignored_hex_codes.contains(&hex) {
            return None;
        }
        self.substitute_hex(&hex)
    }

    fn substitute_hex(&mut self, hex: &str) -> Option<Component> {
        let (r, g, b) = math::hex_to_rgb(hex)?;
        let hex = math::rgb_to_hex(r, g, b);
        let hsl = math::rgb_to_hsl(r, g, b);

        if classify::exceeds_saturation_threshold(&hsl, self.config) {
            return None;
        }

        let name = format!("--color-{}", hex.trim_start_matches('#'));
        let dark = classify::darken(&hsl, self.config);

        if self.config.use_hsl_variables {
            self.vars.insert(name.clone(), hsl.triple(), dark.triple());
            Some(Component::Raw(format!("hsl(var({}))", name)))
        } else {
            self.vars
                .insert(name.clone(), hex, math::hsl_to_hex(&dark));
            Some(Component::Raw(format!("var({})", name)))
        }
    }
}

/// Rewrite shadow color literals to fixed `hsl()`/`hsla()` literals.
fn canonicalize_shadow(components: &mut Vec<Component>) {
    for component in components.iter_mut() {
        match component {
            Component::Color(color) => {
                let alpha = color.alpha.as_ref().map(|a| a.css.as_str());
                *component = Component::Raw(color.hsl().css_literal(alpha));
            }
            Component::Function { args: children, .. }
            | Component::Paren(children)
            | Component::Square(children) => canonicalize_shadow(children),
            _ => {}
        }
    }
}
