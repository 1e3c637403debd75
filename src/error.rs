//! Error types for stlrelief

use std::path::PathBuf;
use thiserror::Error;

/// stlrelief error types
#[derive(Error, Debug)]
pub enum Error {
    /// Output could not be opened for writing, or input for reading
    #[error("Resource unavailable: {}: {source}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Binary STL ended before the declared number of facets
    #[error("Truncated STL file: expected {expected} facets, found {got}")]
    TruncatedFile { expected: u32, got: u32 },

    /// Zero-area triangle; normal could not be computed
    #[error("Degenerate geometry: zero-length normal for triangle {0:?}")]
    DegenerateGeometry([[f32; 3]; 3]),

    /// NaN or infinite component in a facet
    #[error("Encoding range error: facet {facet} has non-finite component {value}")]
    EncodingRange { facet: usize, value: f32 },

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed ASCII STL
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for stlrelief operations
pub type Result<T> = std::result::Result<T, Error>;
