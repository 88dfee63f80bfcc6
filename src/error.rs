use miette::Diagnostic;
use thiserror::Error;

/// Main error type for dusk operations
#[derive(Error, Diagnostic, Debug)]
pub enum DuskError {
    #[error("IO error: {0}")]
    #[diagnostic(code(dusk::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(dusk::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(dusk::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Watch error: {message}")]
    #[diagnostic(code(dusk::watch))]
    Watch {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, DuskError>;
