//! Collected variable entries and the generated root blocks.

use std::collections::HashMap;

use crate::css::{AtBody, AtRule, Component, Declaration, Item, StyleRule};

/// One generated custom property with its light and dark values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableEntry {
    pub name: String,
    pub light: String,
    pub dark: String,
}

/// Variable entries collected during one walk, deduplicated by name in
/// first-occurrence order.
#[derive(Debug, Default)]
pub struct VariableSet {
    entries: Vec<VariableEntry>,
    index: HashMap<String, usize>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a variable. The name is derived deterministically from the
    /// color, so a repeated name always carries identical values and the
    /// first occurrence wins.
    pub fn insert(&mut self, name: String, light: String, dark: String) {
        if self.index.contains_key(&name) {
            return;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(VariableEntry { name, light, dark });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[VariableEntry] {
        &self.entries
    }

    /// Build the generated blocks, in fixed order: light root, dark
    /// root, then (unless auto-detect is off) the dark media query.
    pub fn into_blocks(self, deactivate_auto_detect: bool) -> Vec<Item> {
        if self.entries.is_empty() {
            return Vec::new();
        }

        let mut light_root = StyleRule::new(":root");
        for entry in &self.entries {
            light_root.declarations.push(Declaration::new(
                entry.name.clone(),
                vec![Component::Raw(entry.light.clone())],
            ));
        }

        let mut dark_root = StyleRule::new(":root[data-theme=\"dark\"]");
        for entry in &self.entries {
            dark_root.declarations.push(Declaration::new(
                entry.name.clone(),
                vec![Component::Raw(entry.dark.clone())],
            ));
        }

        let mut blocks = Vec::new();
        if !deactivate_auto_detect {
            let mut auto_root = dark_root.clone();
            auto_root.selectors = ":root:not([data-theme=\"light\"])".to_string();
            blocks.push(Item::At(AtRule {
                name: "media".to_string(),
                prelude: "(prefers-color-scheme: dark)".to_string(),
                body: AtBody::Rules(vec![Item::Style(auto_root)]),
            }));
        }

        let mut items = vec![Item::Style(light_root), Item::Style(dark_root)];
        items.extend(blocks);
        items
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::css::Document;

    use super::*;

    fn sample_set() -> VariableSet {
        let mut vars = VariableSet::new();
        vars.insert(
            "--color-000".to_string(),
            "#000".to_string(),
            "#fff".to_string(),
        );
        vars.insert(
            "--color-f5f5f5".to_string(),
            "#f5f5f5".to_string(),
            "#2e2e2e".to_string(),
        );
        vars
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let mut vars = VariableSet::new();
        vars.insert("--color-000".to_string(), "#000".to_string(), "#fff".to_string());
        vars.insert("--color-fff".to_string(), "#fff".to_string(), "#262626".to_string());
        vars.insert("--color-000".to_string(), "#000".to_string(), "#fff".to_string());
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.entries()[0].name, "--color-000");
    }

    #[test]
    fn test_block_order() {
        let doc = Document {
            items: sample_set().into_blocks(false),
        };
        assert_eq!(
            doc.to_css(),
            ":root {\n  --color-000: #000;\n  --color-f5f5f5: #f5f5f5;\n}\n\
             :root[data-theme=\"dark\"] {\n  --color-000: #fff;\n  --color-f5f5f5: #2e2e2e;\n}\n\
             @media (prefers-color-scheme: dark) {\n  :root:not([data-theme=\"light\"]) {\n    --color-000: #fff;\n    --color-f5f5f5: #2e2e2e;\n  }\n}\n"
        );
    }

    #[test]
    fn test_auto_detect_disabled_drops_media_block() {
        let blocks = sample_set().into_blocks(true);
        assert_eq!(blocks.len(), 2);
        let doc = Document { items: blocks };
        assert!(!doc.to_css().contains("@media"));
    }

    #[test]
    fn test_empty_set_emits_nothing() {
        assert!(VariableSet::new().into_blocks(false).is_empty());
    }
}
