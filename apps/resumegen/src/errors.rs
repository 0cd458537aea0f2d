use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type shared by every subcommand.
///
/// Generators treat all variants as fatal (exit 1); the dev server treats
/// render/parse failures as recoverable and folds them into its error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid role code: {code}. Available roles: {available}")]
    UnknownRole { code: String, available: String },

    #[error("Unknown theme: {id}. Available themes: {available}")]
    UnknownTheme { id: String, available: String },

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Resume source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("PDF extraction error: {0}")]
    Extract(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
