//! Error types for orbitplot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Sequence lengths or array dimensions disagree
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Non-positive, non-finite, or missing mass entries
    #[error("invalid mass: {0}")]
    InvalidMass(String),

    /// A scenario or model parameter outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::ShapeMismatch(err.to_string())
    }
}

impl Error {
    pub(crate) fn shape_mismatch(what: &str, expected: usize, found: usize) -> Self {
        Error::ShapeMismatch(format!("{what}: expected {expected}, found {found}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
