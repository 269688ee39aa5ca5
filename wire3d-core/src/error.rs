//! Error types shared across the core

use std::path::PathBuf;

use crate::geometry::Edge;
use crate::surface::LineHandle;

/// Errors raised while building shapes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("edge {edge:?} references vertex {index}, but the shape has {vertex_count} vertices")]
    EdgeOutOfRange {
        edge: Edge,
        index: usize,
        vertex_count: usize,
    },
}

/// Errors reported by a display surface
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown line handle: {0:?}")]
    UnknownHandle(LineHandle),

    #[error("surface backend error: {0}")]
    Backend(String),
}

/// Errors raised while loading a render configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
