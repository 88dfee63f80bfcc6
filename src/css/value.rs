//! Declaration value tree.
//!
//! Values are parsed into a tagged component tree (color literal, nested
//! function, identifier, anything else verbatim) so substitution can
//! reach colors inside arbitrarily nested value lists without text
//! surgery. Untouched components serialize back to their source text.

use crate::color::math::{self, Hsl};

/// A parsed color literal: `#hex`, `rgb()` or `rgba()`.
#[derive(Debug, Clone, PartialEq)]
pub struct CssColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Present for `rgba()` (and 4-argument `rgb()`) literals.
    pub alpha: Option<Alpha>,
    /// Exact source text, emitted when the color is left untouched.
    pub raw: String,
}

/// An alpha channel: the numeric value for policy checks plus the
/// canonical css text threaded through unchanged on rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Alpha {
    pub value: f32,
    pub css: String,
}

impl CssColor {
    /// Normalized lowercase hex, collapsed to shorthand when possible.
    pub fn hex(&self) -> String {
        math::rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn hsl(&self) -> Hsl {
        math::rgb_to_hsl(self.r, self.g, self.b)
    }
}

/// One component of a declaration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// A color literal eligible for substitution.
    Color(CssColor),
    /// A bare identifier; may resolve through the named-color table.
    Ident(String),
    /// A function such as `linear-gradient(...)` or `var(...)`.
    Function { name: String, args: Vec<Component> },
    /// A parenthesized group.
    Paren(Vec<Component>),
    /// A `[...]` group (grid line names and similar).
    Square(Vec<Component>),
    /// Any other token, kept verbatim (numbers, strings, separators,
    /// whitespace).
    Raw(String),
}

impl Component {
    pub fn write_css(&self, out: &mut String) {
        match self {
            Component::Color(color) => out.push_str(&color.raw),
            Component::Ident(name) => out.push_str(name),
            Component::Function { name, args } => {
                out.push_str(name);
                out.push('(');
                for arg in args {
                    arg.write_css(out);
                }
                out.push(')');
            }
            Component::Paren(children) => {
                out.push('(');
                for child in children {
                    child.write_css(out);
                }
                out.push(')');
            }
            Component::Square(children) => {
                out.push('[');
                for child in children {
                    child.write_css(out);
                }
                out.push(']');
            }
            Component::Raw(text) => out.push_str(text),
        }
    }

    pub fn to_css_string(&self) -> String {
        let mut out = String::new();
        self.write_css(&mut out);
        out
    }

    /// Whitespace-only components separate value parts but carry no
    /// meaning of their own.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Component::Raw(text) if text.trim().is_empty())
    }
}

/// Serialize a component list back to css text.
pub fn components_to_css(components: &[Component]) -> String {
    let mut out = String::new();
    for component in components {
        component.write_css(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_color(raw: &str) -> Component {
        let (r, g, b) = math::hex_to_rgb(raw).unwrap();
        Component::Color(CssColor {
            r,
            g,
            b,
            alpha: None,
            raw: raw.to_string(),
        })
    }

    #[test]
    fn test_color_normalizes_hex() {
        let color = CssColor {
            r: 255,
            g: 0,
            b: 0,
            alpha: None,
            raw: "#FF0000".to_string(),
        };
        assert_eq!(color.hex(), "#f00");
        assert_eq!(color.hsl(), Hsl::new(0.0, 100.0, 50.0));
    }

    #[test]
    fn test_untouched_color_keeps_source_text() {
        assert_eq!(hex_color("#FF0000").to_css_string(), "#FF0000");
    }

    #[test]
    fn test_function_round_trip() {
        let gradient = Component::Function {
            name: "linear-gradient".to_string(),
            args: vec![
                Component::Ident("white".to_string()),
                Component::Raw(",".to_string()),
                Component::Raw(" ".to_string()),
                hex_color("#333"),
            ],
        };
        assert_eq!(
            gradient.to_css_string(),
            "linear-gradient(white, #333)"
        );
    }

    #[test]
    fn test_whitespace_detection() {
        assert!(Component::Raw(" ".to_string()).is_whitespace());
        assert!(!Component::Raw(",".to_string()).is_whitespace());
        assert!(!Component::Ident("red".to_string()).is_whitespace());
    }
}
