//! Core document types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node_types;

/// The only ADF version this crate reads or writes.
pub const ADF_VERSION: u32 = 1;

/// An ADF document: the root container of top-level block nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireDocument", into = "WireDocument")]
pub struct Document {
    /// Format version, always [`ADF_VERSION`]
    pub version: u32,
    /// Top-level blocks (empty for an empty document)
    pub content: Vec<Node>,
}

/// On-the-wire shape of a document: `{ type: "doc", version, content }`.
#[derive(Serialize, Deserialize)]
struct WireDocument {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    content: Option<Vec<Node>>,
}

const fn default_version() -> u32 {
    ADF_VERSION
}

impl TryFrom<WireDocument> for Document {
    type Error = String;

    fn try_from(wire: WireDocument) -> Result<Self, Self::Error> {
        if wire.kind != node_types::DOC {
            return Err(format!("expected root type 'doc', found '{}'", wire.kind));
        }
        Ok(Self {
            version: ADF_VERSION,
            content: wire.content.unwrap_or_default(),
        })
    }
}

impl From<Document> for WireDocument {
    fn from(doc: Document) -> Self {
        Self {
            kind: node_types::DOC.to_string(),
            version: doc.version,
            content: Some(doc.content),
        }
    }
}

impl Document {
    /// Create a document from top-level blocks.
    pub const fn new(content: Vec<Node>) -> Self {
        Self {
            version: ADF_VERSION,
            content,
        }
    }

    /// Create an empty document.
    pub const fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Decode a stored or fetched document.
    ///
    /// Any decoding failure yields `None`: callers treat it as "nothing to
    /// show" and refresh from the source instead.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::debug!(%err, "discarding undecodable ADF document");
                None
            }
        }
    }

    /// Encode as indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Build the root `doc` node handed to the registry's document handler.
    pub fn as_root_node(&self) -> Node {
        Node::with_content(node_types::DOC, self.content.clone())
    }

    /// Resolve an index path produced by the read-view projection.
    ///
    /// The empty path has no node of its own (it is the document root).
    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.content.get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

/// A node of the document tree.
///
/// Leaf `text` nodes carry `text` (and possibly `marks`); containers carry
/// `content`. Unknown type tags are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
}

impl Node {
    /// A node with only a type tag.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: None,
            content: None,
            text: None,
            marks: None,
        }
    }

    /// A plain `text` leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(node_types::TEXT)
        }
    }

    /// A container node with the given children.
    pub fn with_content(node_type: impl Into<String>, content: Vec<Self>) -> Self {
        Self {
            content: Some(content),
            ..Self::new(node_type)
        }
    }

    /// Set one attribute, creating the attribute map if needed.
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Replace the mark list. An empty list clears it.
    #[must_use]
    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = if marks.is_empty() { None } else { Some(marks) };
        self
    }

    /// Child nodes, empty for leaves.
    pub fn children(&self) -> &[Self] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Leaf text, empty when absent.
    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn marks(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or_default()
    }

    pub fn is_type(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    pub fn has_mark(&self, mark_type: &str) -> bool {
        self.marks().iter().any(|m| m.mark_type == mark_type)
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(key)
    }

    /// String attribute, `None` when absent or not a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)?.as_str()
    }

    /// Integer attribute. Accepts JSON numbers and numeric strings, since
    /// the remote store is inconsistent about e.g. date timestamps.
    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        match self.attr(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Concatenated text of every `text` leaf below this node.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_plain_text(self, &mut out);
        out
    }
}

fn collect_plain_text(node: &Node, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in node.children() {
        collect_plain_text(child, out);
    }
}

/// An inline annotation on a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
}

impl Mark {
    pub fn new(mark_type: impl Into<String>) -> Self {
        Self {
            mark_type: mark_type.into(),
            attrs: None,
        }
    }

    /// A `link` mark pointing at `href`.
    pub fn link(href: impl Into<String>) -> Self {
        let mut attrs = Map::new();
        attrs.insert("href".to_string(), Value::String(href.into()));
        Self {
            mark_type: super::mark_types::LINK.to_string(),
            attrs: Some(attrs),
        }
    }

    pub fn href(&self) -> Option<&str> {
        self.attrs.as_ref()?.get("href")?.as_str()
    }
}

/// Index path from the document root to a node.
///
/// Read-view nodes and display lines hold one of these instead of a pointer
/// into the tree, so they never keep the document alive or borrowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The path of this node's `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}
