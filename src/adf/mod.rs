//! Atlassian document format (ADF) node model.
//!
//! This module handles:
//! - The document tree (`Document`, `Node`, `Mark`)
//! - JSON (de)serialization in the shape the remote store and cache use
//! - Index paths used as non-owning references back into the tree

mod types;

pub use types::{ADF_VERSION, Document, Mark, Node, NodePath};

/// Well-known node type tags.
pub mod node_types {
    pub const DOC: &str = "doc";
    pub const PARAGRAPH: &str = "paragraph";
    pub const TEXT: &str = "text";
    pub const HARD_BREAK: &str = "hardBreak";
    pub const HEADING: &str = "heading";
    pub const CODE_BLOCK: &str = "codeBlock";
    pub const BLOCKQUOTE: &str = "blockquote";
    pub const RULE: &str = "rule";
    pub const BULLET_LIST: &str = "bulletList";
    pub const ORDERED_LIST: &str = "orderedList";
    pub const LIST_ITEM: &str = "listItem";
    pub const TASK_LIST: &str = "taskList";
    pub const TASK_ITEM: &str = "taskItem";
    pub const DECISION_LIST: &str = "decisionList";
    pub const DECISION_ITEM: &str = "decisionItem";
    pub const TABLE: &str = "table";
    pub const TABLE_ROW: &str = "tableRow";
    pub const TABLE_HEADER: &str = "tableHeader";
    pub const TABLE_CELL: &str = "tableCell";
    pub const PANEL: &str = "panel";
    pub const MEDIA_SINGLE: &str = "mediaSingle";
    pub const MEDIA_GROUP: &str = "mediaGroup";
    pub const MEDIA: &str = "media";
    pub const EXPAND: &str = "expand";
    pub const STATUS: &str = "status";
    pub const EMOJI: &str = "emoji";
    pub const MENTION: &str = "mention";
    pub const DATE: &str = "date";
}

/// Well-known mark type tags.
pub mod mark_types {
    pub const STRONG: &str = "strong";
    pub const EM: &str = "em";
    pub const CODE: &str = "code";
    pub const STRIKE: &str = "strike";
    pub const UNDERLINE: &str = "underline";
    pub const LINK: &str = "link";
}
