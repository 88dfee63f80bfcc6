//! CSS document model: value tree, document tree, parser, serializer.

mod document;
mod parser;
mod value;

pub use document::{AtBody, AtRule, Declaration, Document, Item, StyleRule};
pub use parser::{parse_stylesheet, ParseFailure};
pub use value::{components_to_css, Alpha, Component, CssColor};
