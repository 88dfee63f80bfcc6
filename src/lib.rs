//! dusk - dark-mode stylesheet generator
//!
//! A library for augmenting compiled stylesheets with generated
//! dark-mode custom properties. Invertible color literals are lifted
//! into `--color-*` variables with light and dark values, and matching
//! `:root` blocks are appended to the stylesheet.

pub mod cli;
pub mod color;
pub mod config;
pub mod css;
pub mod error;
pub mod output;
pub mod transform;

pub use color::Hsl;
pub use config::{Config, ConfigFile};
pub use css::{parse_stylesheet, Document, ParseFailure};
pub use error::{DuskError, Result};
pub use transform::{transform, VariableEntry, VariableSet, Walker};
