//! Stylesheet document tree and serializer.
//!
//! An ordered tree of style rules and at-rules. Selectors and at-rule
//! preludes are kept as raw source text; only declaration values are
//! modeled structurally (see [`super::value`]), since values are the
//! only place substitution happens.

use super::value::Component;

/// A parsed stylesheet.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub items: Vec<Item>,
}

impl Document {
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Serialize the whole document in the canonical pretty format.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            item.write(&mut out, 0);
        }
        out
    }
}

/// One top-level (or nested) stylesheet item.
#[derive(Debug, Clone)]
pub enum Item {
    Style(StyleRule),
    At(AtRule),
}

impl Item {
    fn write(&self, out: &mut String, depth: usize) {
        match self {
            Item::Style(rule) => rule.write(out, depth),
            Item::At(rule) => rule.write(out, depth),
        }
    }
}

/// `selector { declarations }`
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// Raw selector text as it appeared in source.
    pub selectors: String,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    pub fn new(selectors: impl Into<String>) -> Self {
        Self {
            selectors: selectors.into(),
            declarations: Vec::new(),
        }
    }

    fn write(&self, out: &mut String, depth: usize) {
        indent(out, depth);
        out.push_str(&self.selectors);
        out.push_str(" {\n");
        for declaration in &self.declarations {
            declaration.write(out, depth + 1);
        }
        indent(out, depth);
        out.push_str("}\n");
    }
}

/// `property: value;`
#[derive(Debug, Clone)]
pub struct Declaration {
    pub property: String,
    pub value: Vec<Component>,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: Vec<Component>) -> Self {
        Self {
            property: property.into(),
            value,
            important: false,
        }
    }

    fn write(&self, out: &mut String, depth: usize) {
        indent(out, depth);
        out.push_str(&self.property);
        out.push_str(": ");
        for component in &self.value {
            component.write_css(out);
        }
        if self.important {
            out.push_str(" !important");
        }
        out.push_str(";\n");
    }
}

/// `@name prelude;` or `@name prelude { body }`
#[derive(Debug, Clone)]
pub struct AtRule {
    pub name: String,
    pub prelude: String,
    pub body: AtBody,
}

#[derive(Debug, Clone)]
pub enum AtBody {
    /// Block-less rule such as `@import` or `@charset`.
    None,
    /// Declaration body such as `@font-face`.
    Declarations(Vec<Declaration>),
    /// Nested rule list such as `@media` or `@supports`.
    Rules(Vec<Item>),
}

impl AtRule {
    fn write(&self, out: &mut String, depth: usize) {
        indent(out, depth);
        out.push('@');
        out.push_str(&self.name);
        if !self.prelude.is_empty() {
            out.push(' ');
            out.push_str(&self.prelude);
        }
        match &self.body {
            AtBody::None => out.push_str(";\n"),
            AtBody::Declarations(declarations) => {
                out.push_str(" {\n");
                for declaration in declarations {
                    declaration.write(out, depth + 1);
                }
                indent(out, depth);
                out.push_str("}\n");
            }
            AtBody::Rules(items) => {
                out.push_str(" {\n");
                for item in items {
                    item.write(out, depth + 1);
                }
                indent(out, depth);
                out.push_str("}\n");
            }
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serialize_style_rule() {
        let mut rule = StyleRule::new("body");
        rule.declarations.push(Declaration::new(
            "color",
            vec![Component::Raw("#000".to_string())],
        ));
        let doc = Document {
            items: vec![Item::Style(rule)],
        };
        assert_eq!(doc.to_css(), "body {\n  color: #000;\n}\n");
    }

    #[test]
    fn test_serialize_important() {
        let mut declaration =
            Declaration::new("color", vec![Component::Ident("red".to_string())]);
        declaration.important = true;
        let mut rule = StyleRule::new("p");
        rule.declarations.push(declaration);
        let doc = Document {
            items: vec![Item::Style(rule)],
        };
        assert_eq!(doc.to_css(), "p {\n  color: red !important;\n}\n");
    }

    #[test]
    fn test_serialize_media_block() {
        let mut inner = StyleRule::new(":root");
        inner.declarations.push(Declaration::new(
            "--color-000",
            vec![Component::Raw("#fff".to_string())],
        ));
        let media = AtRule {
            name: "media".to_string(),
            prelude: "(prefers-color-scheme: dark)".to_string(),
            body: AtBody::Rules(vec![Item::Style(inner)]),
        };
        let doc = Document {
            items: vec![Item::At(media)],
        };
        assert_eq!(
            doc.to_css(),
            "@media (prefers-color-scheme: dark) {\n  :root {\n    --color-000: #fff;\n  }\n}\n"
        );
    }

    #[test]
    fn test_serialize_blockless_at_rule() {
        let import = AtRule {
            name: "import".to_string(),
            prelude: "url(\"base.css\")".to_string(),
            body: AtBody::None,
        };
        let doc = Document {
            items: vec![Item::At(import)],
        };
        assert_eq!(doc.to_css(), "@import url(\"base.css\");\n");
    }
}
