// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. readview::ReadViewNode)
    clippy::module_name_repetitions
)]

//! # Adfless
//!
//! Conversion between Atlassian Document Format (ADF), Markdown and
//! terminal read-view lines.
//!
//! Every node type is described by one handler in a [`ComponentRegistry`]:
//! - Markdown serialization
//! - Read-view projection
//! - Optional block parsing from Markdown
//!
//! Unknown node types go through a fallback handler, so a document never
//! fails to convert because of its content.
//!
//! ## Modules
//!
//! - [`adf`]: Document model and JSON shape
//! - [`registry`]: Handler records, lookup and render/parse contexts
//! - [`components`]: Built-in handlers for the supported node types
//! - [`markdown`]: Block and inline Markdown parsing, serialization
//! - [`readview`]: Read-view tree and the line flattener
//! - [`convert`]: Checked entry points over a registry
//! - [`cache`]: On-disk cache of converted pages
//! - [`search`]: Finding text in display lines
//! - [`ui`]: Terminal styling of display lines

pub mod adf;
pub mod cache;
pub mod components;
pub mod config;
pub mod convert;
pub mod error;
pub mod ids;
pub mod markdown;
pub mod perf;
pub mod readview;
pub mod registry;
pub mod search;
pub mod ui;

pub use adf::{Document, Mark, Node, NodePath};
pub use convert::Converter;
pub use error::ConvertError;
pub use readview::{DisplayLine, ReadViewNode};
pub use registry::ComponentRegistry;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::adf::{Document, Mark, Node, NodePath};
    pub use crate::convert::Converter;
    pub use crate::ids::{IdSource, SequentialIds, UuidIds};
    pub use crate::readview::{DisplayLine, ReadViewNode};
    pub use crate::registry::{ComponentRegistry, Handler};
}
