//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the vista crate.
#[derive(Debug)]
pub enum VistaError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A rendering surface could not be created or drawn.
    Surface(String),
    /// Two samples were registered under the same (category, sample) key.
    DuplicateSample {
        /// Category the duplicate was registered under.
        category: String,
        /// Sample id that was already present.
        sample: String,
    },
    /// A parameter edit was rejected by the panel.
    Parameter(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for VistaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Surface(msg) => write!(f, "surface error: {msg}"),
            Self::DuplicateSample { category, sample } => {
                write!(f, "sample '{sample}' registered twice in '{category}'")
            }
            Self::Parameter(msg) => write!(f, "parameter error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for VistaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for VistaError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for VistaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
