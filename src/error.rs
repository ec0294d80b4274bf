//! Error types for format resolution and encoding.

use std::io;
use thiserror::Error;

/// Errors produced by format resolution and vertex encoding.
///
/// An empty scene is not an error; encoding it is a successful no-op.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Conflicting format flags. Raised at resolution time, before any
    /// mesh is touched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Meshes in the scene disagree on primitive topology. Raised
    /// before any vertex data is written.
    #[error("model must not consist of multiple primitive types")]
    MixedPrimitiveTypes,

    /// The output stream failed mid-write. The output is left partial;
    /// nothing is rolled back or retried.
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}
