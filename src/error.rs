//! Error types for conversion setup.

use thiserror::Error;

/// Fatal configuration errors.
///
/// Malformed document content is never reported here: unknown node types,
/// odd Markdown and partial tables all degrade to a fallback rendering.
/// Only a registry that cannot drive a conversion at all is an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A handler the conversion pipeline cannot work without is missing.
    #[error("no handler registered for required node type '{node_type}'")]
    MissingHandler { node_type: String },
}
