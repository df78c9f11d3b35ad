//! Component registry for per-node-type conversion handlers.
//!
//! Every node type owns one [`Handler`]: a small record of function pointers
//! covering Markdown output, read-view projection and, for block constructs
//! that Markdown can express, Markdown parsing. Lookup never fails; a node
//! without a usable handler goes to the universal fallback.

mod context;
mod fallback;

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub use context::{ParseContext, ParsedBlock, RenderContext};

use crate::adf::{Node, node_types};
use crate::error::ConvertError;
use crate::readview::ReadViewNode;

/// Whether a handler accepts this particular node.
pub type CanRenderFn = fn(&Node) -> bool;
/// Render a node (and its subtree) as Markdown.
pub type MarkdownFn = fn(&Node, &mut RenderContext<'_>) -> String;
/// Project a node (and its subtree) into the display tree.
pub type ReadViewFn = fn(&Node, &mut RenderContext<'_>) -> ReadViewNode;
/// Whether the line at the parse cursor starts this construct.
pub type CanParseFn = fn(&ParseContext<'_>) -> bool;
/// Parse the construct at the cursor without moving it.
pub type ParseFn = fn(&mut ParseContext<'_>) -> Option<ParsedBlock>;

/// Markdown block parsing operations of a handler.
#[derive(Clone, Copy)]
pub struct BlockParser {
    pub can_parse: CanParseFn,
    pub parse: ParseFn,
}

/// Conversion operations for one node type.
#[derive(Clone, Copy)]
pub struct Handler {
    pub node_type: &'static str,
    pub can_render: CanRenderFn,
    pub to_markdown: MarkdownFn,
    pub to_read_view: ReadViewFn,
    pub block: Option<BlockParser>,
}

impl Handler {
    /// A render-only handler that accepts every node of its type.
    pub const fn new(node_type: &'static str, to_markdown: MarkdownFn, to_read_view: ReadViewFn) -> Self {
        Self {
            node_type,
            can_render: accept_any,
            to_markdown,
            to_read_view,
            block: None,
        }
    }

    #[must_use]
    pub const fn with_can_render(mut self, can_render: CanRenderFn) -> Self {
        self.can_render = can_render;
        self
    }

    #[must_use]
    pub const fn with_block_parser(mut self, can_parse: CanParseFn, parse: ParseFn) -> Self {
        self.block = Some(BlockParser { can_parse, parse });
        self
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("node_type", &self.node_type)
            .field("parses_blocks", &self.block.is_some())
            .finish_non_exhaustive()
    }
}

const fn accept_any(_: &Node) -> bool {
    true
}

/// Block constructs in the order the Markdown parser tries them.
///
/// Task lists come before bullet lists because `- [ ] x` is also a valid
/// bullet line. Paragraph is the unconditional fallback and stays last.
pub const DEFAULT_BLOCK_ORDER: [&str; 9] = [
    node_types::CODE_BLOCK,
    node_types::HEADING,
    node_types::RULE,
    node_types::BLOCKQUOTE,
    node_types::TASK_LIST,
    node_types::BULLET_LIST,
    node_types::ORDERED_LIST,
    node_types::TABLE,
    node_types::PARAGRAPH,
];

static SHARED: Lazy<ComponentRegistry> = Lazy::new(ComponentRegistry::with_defaults);

/// Registry of node type handlers.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    handlers: HashMap<String, Handler>,
    block_order: Vec<String>,
    fallback: Handler,
}

impl ComponentRegistry {
    /// Create a registry with no handlers; everything renders via fallback.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            block_order: DEFAULT_BLOCK_ORDER.iter().map(ToString::to_string).collect(),
            fallback: fallback::handler(),
        }
    }

    /// Create a registry with every built-in handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::components::register_defaults(&mut registry);
        registry
    }

    /// The process-wide default registry, built on first use.
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Register a handler.
    ///
    /// If a handler for the same type already exists, it will be replaced.
    pub fn register(&mut self, handler: Handler) {
        self.handlers.insert(handler.node_type.to_string(), handler);
    }

    /// Get the handler registered for a type, if any.
    pub fn get(&self, node_type: &str) -> Option<&Handler> {
        self.handlers.get(node_type)
    }

    /// Get a handler that must exist for conversion to work at all.
    pub fn require(&self, node_type: &str) -> Result<&Handler, ConvertError> {
        self.get(node_type).ok_or_else(|| ConvertError::MissingHandler {
            node_type: node_type.to_string(),
        })
    }

    pub fn has(&self, node_type: &str) -> bool {
        self.handlers.contains_key(node_type)
    }

    /// Handler for a node: its own type's handler if that accepts the node,
    /// otherwise the universal fallback.
    pub fn handler_for(&self, node: &Node) -> &Handler {
        match self.handlers.get(&node.node_type) {
            Some(handler) if (handler.can_render)(node) => handler,
            Some(_) => {
                tracing::debug!(node_type = %node.node_type, "handler rejected node, using fallback");
                &self.fallback
            }
            None => {
                tracing::debug!(node_type = %node.node_type, "no handler registered, using fallback");
                &self.fallback
            }
        }
    }

    pub const fn fallback(&self) -> &Handler {
        &self.fallback
    }

    /// List all registered type names (sorted).
    pub fn node_types(&self) -> Vec<String> {
        let mut names: Vec<_> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn block_order(&self) -> &[String] {
        &self.block_order
    }

    /// Replace the block parsing priority order.
    pub fn set_block_order<I, S>(&mut self, order: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_order = order.into_iter().map(Into::into).collect();
    }

    /// Block parsers in priority order, skipping types without one.
    pub fn block_parsers(&self) -> impl Iterator<Item = (&str, BlockParser)> + '_ {
        self.block_order.iter().filter_map(|name| {
            let handler = self.handlers.get(name)?;
            Some((handler.node_type, handler.block?))
        })
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_builtin_types() {
        let registry = ComponentRegistry::with_defaults();
        for ty in [
            "doc",
            "paragraph",
            "text",
            "heading",
            "bulletList",
            "orderedList",
            "listItem",
            "codeBlock",
            "blockquote",
            "rule",
            "hardBreak",
            "panel",
            "decisionList",
            "decisionItem",
            "taskList",
            "taskItem",
            "table",
            "tableRow",
            "tableCell",
            "tableHeader",
            "mediaSingle",
            "mediaGroup",
            "media",
            "expand",
            "status",
            "emoji",
            "mention",
            "date",
        ] {
            assert!(registry.has(ty), "missing handler for {ty}");
        }
    }

    #[test]
    fn test_unknown_type_gets_fallback() {
        let registry = ComponentRegistry::with_defaults();
        let handler = registry.handler_for(&Node::new("layoutSection"));
        assert_eq!(handler.node_type, registry.fallback().node_type);
    }

    #[test]
    fn test_rejected_node_gets_fallback() {
        let registry = ComponentRegistry::with_defaults();
        // A text node without text is not something the text handler accepts.
        let handler = registry.handler_for(&Node::new("text"));
        assert_eq!(handler.node_type, registry.fallback().node_type);
    }

    #[test]
    fn test_require_reports_missing_type() {
        let registry = ComponentRegistry::new();
        assert!(matches!(
            registry.require("doc"),
            Err(ConvertError::MissingHandler { node_type }) if node_type == "doc"
        ));
    }

    #[test]
    fn test_register_replaces_existing_handler() {
        fn shout(_: &Node, _: &mut RenderContext<'_>) -> String {
            "RULE".to_string()
        }
        let mut registry = ComponentRegistry::with_defaults();
        let rule = *registry.get("rule").unwrap();
        registry.register(Handler { to_markdown: shout, ..rule });
        let mut ctx = RenderContext::new(&registry);
        assert_eq!(ctx.markdown(&Node::new("rule")), "RULE");
    }

    #[test]
    fn test_block_parsers_follow_priority_order() {
        let registry = ComponentRegistry::with_defaults();
        let order: Vec<&str> = registry.block_parsers().map(|(name, _)| name).collect();
        assert_eq!(
            order,
            vec![
                "codeBlock",
                "heading",
                "rule",
                "blockquote",
                "taskList",
                "bulletList",
                "orderedList",
                "table",
                "paragraph"
            ]
        );
    }

    #[test]
    fn test_node_types_sorted() {
        let registry = ComponentRegistry::with_defaults();
        let types = registry.node_types();
        let mut sorted = types.clone();
        sorted.sort();
        assert_eq!(types, sorted);
    }
}
