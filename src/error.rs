//! Crate-level error types.
//!
//! Only loading paths return errors: graph parsing, options files, and GPU
//! context creation. Per-interaction queries degrade to empty results.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the arena-atlas crate.
#[derive(Debug)]
pub enum AtlasError {
    /// The graph payload is not valid JSON or has the wrong shape.
    GraphParse(serde_json::Error),
    /// A required top-level array is missing from the graph payload.
    MissingField(&'static str),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// GPU context initialization failure.
    Gpu(RenderContextError),
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GraphParse(e) => write!(f, "graph parse error: {e}"),
            Self::MissingField(field) => {
                write!(f, "graph payload is missing `{field}`")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::GraphParse(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Gpu(e) => Some(e),
            Self::MissingField(_) | Self::OptionsParse(_) => None,
        }
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(e: serde_json::Error) -> Self {
        Self::GraphParse(e)
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<RenderContextError> for AtlasError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}
