use thiserror::Error;

/// The unified error type for the `windowed_series` crate.
///
/// Only the ambient surfaces (config files, JSON row sets) can fail.
/// Evaluation and the trend statistics never do.
#[derive(Debug, Error)]
pub enum Error {
    /// A series definition is structurally valid TOML but semantically wrong.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// The series definition could not be parsed.
    #[error("TOML parse failed")]
    Toml(#[from] toml::de::Error),

    /// A JSON row set could not be parsed.
    #[error("JSON parse failed")]
    Json(#[from] serde_json::Error),
}

/// Shorthand for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
