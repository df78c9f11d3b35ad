//! Per-conversion state threaded through handler calls.
//!
//! A context is created for one top-level call, mutated only inside that
//! call's recursion and dropped at the end. Nothing here is global.

use crate::adf::{Node, NodePath};
use crate::ids::IdSource;
use crate::readview::{DisplayLine, ReadViewNode, flatten};

use super::ComponentRegistry;

/// State for Markdown rendering and read-view projection.
pub struct RenderContext<'a> {
    registry: &'a ComponentRegistry,
    /// Number of enclosing lists
    pub list_depth: usize,
    /// Number for the next ordered list item, taken by that item
    pub ordered_index: Option<u64>,
    /// Inside a code block: text is emitted verbatim
    pub in_code_block: bool,
    /// Rendering inline content of a paragraph, heading or cell
    pub in_inline: bool,
    path: NodePath,
}

impl<'a> RenderContext<'a> {
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self {
            registry,
            list_depth: 0,
            ordered_index: None,
            in_code_block: false,
            in_inline: false,
            path: NodePath::root(),
        }
    }

    pub const fn registry(&self) -> &'a ComponentRegistry {
        self.registry
    }

    /// Path of the node currently being projected.
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Render one node through its handler.
    pub fn markdown(&mut self, node: &Node) -> String {
        let handler = *self.registry.handler_for(node);
        (handler.to_markdown)(node, self)
    }

    /// Render and concatenate all children of `node`.
    pub fn markdown_children(&mut self, node: &Node) -> String {
        let mut out = String::new();
        for child in node.children() {
            out.push_str(&self.markdown(child));
        }
        out
    }

    /// Render the children of `node` as inline content.
    pub fn inline_markdown(&mut self, node: &Node) -> String {
        let saved = std::mem::replace(&mut self.in_inline, true);
        let out = self.markdown_children(node);
        self.in_inline = saved;
        out
    }

    /// Project one node through its handler, tagging the result with the
    /// current path unless the handler already set a source.
    pub fn project(&mut self, node: &Node) -> ReadViewNode {
        let handler = *self.registry.handler_for(node);
        let mut view = (handler.to_read_view)(node, self);
        if view.source.is_none() {
            view.source = Some(self.path.clone());
        }
        view
    }

    /// Project the child at position `index` of the current node.
    pub fn project_child(&mut self, child: &Node, index: usize) -> ReadViewNode {
        self.path.push(index);
        let view = self.project(child);
        self.path.pop();
        view
    }

    /// Project every child of `node`, extending the path per child.
    pub fn project_children(&mut self, node: &Node) -> Vec<ReadViewNode> {
        node.children()
            .iter()
            .enumerate()
            .map(|(index, child)| self.project_child(child, index))
            .collect()
    }

    /// Concatenated display text of the inline children of `node`.
    pub fn inline_text(&mut self, node: &Node) -> String {
        self.inline_view(node).content
    }

    /// The inline children of `node` as one text node. It keeps their
    /// style when every non-empty child has the same one.
    pub fn inline_view(&mut self, node: &Node) -> ReadViewNode {
        let saved = std::mem::replace(&mut self.in_inline, true);
        let children = self.project_children(node);
        self.in_inline = saved;

        let text: String = children.iter().map(|child| child.content.as_str()).collect();
        let mut styles = children
            .iter()
            .filter(|child| !child.content.is_empty())
            .map(|child| child.style);
        let shared = match styles.next() {
            Some(Some(first)) => styles.all(|other| other == Some(first)).then_some(first),
            _ => None,
        };
        let view = ReadViewNode::text(text);
        match shared {
            Some(style) => view.with_style(style),
            None => view,
        }
    }

    /// Project the block children of `node` and flatten them to lines, with
    /// a blank line between blocks and none at the end. Framed containers
    /// (quotes, panels, expands) prefix each of these lines.
    pub fn project_lines(&mut self, node: &Node) -> Vec<DisplayLine> {
        let children = self
            .project_children(node)
            .into_iter()
            .map(ReadViewNode::spaced)
            .collect();
        let mut lines = flatten(&ReadViewNode::container("", children));
        while lines.last().is_some_and(DisplayLine::is_empty) {
            lines.pop();
        }
        lines
    }

    /// Run `f` one list level deeper. The ordered counter of the enclosing
    /// list is restored afterwards.
    pub fn in_list<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.list_depth += 1;
        let saved = self.ordered_index.take();
        let out = f(self);
        self.ordered_index = saved;
        self.list_depth -= 1;
        out
    }

    /// Leading indentation for an item at the current list depth.
    pub fn list_indent(&self) -> String {
        "  ".repeat(self.list_depth.saturating_sub(1))
    }

    /// Run `f` with code block mode enabled.
    pub fn in_code_block<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.in_code_block, true);
        let out = f(self);
        self.in_code_block = saved;
        out
    }
}

/// A block parsed at the cursor and the number of lines it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBlock {
    pub node: Node,
    pub consumed: usize,
}

impl ParsedBlock {
    pub const fn new(node: Node, consumed: usize) -> Self {
        Self { node, consumed }
    }
}

/// Cursor over the input lines of one Markdown parse.
pub struct ParseContext<'a> {
    lines: Vec<String>,
    position: usize,
    registry: &'a ComponentRegistry,
    ids: &'a mut dyn IdSource,
}

impl<'a> ParseContext<'a> {
    /// Start a parse of `source`. `\r\n` line endings are accepted.
    pub fn new(source: &str, registry: &'a ComponentRegistry, ids: &'a mut dyn IdSource) -> Self {
        Self::from_lines(source.lines().map(ToString::to_string).collect(), registry, ids)
    }

    pub fn from_lines(
        lines: Vec<String>,
        registry: &'a ComponentRegistry,
        ids: &'a mut dyn IdSource,
    ) -> Self {
        Self {
            lines,
            position: 0,
            registry,
            ids,
        }
    }

    pub const fn registry(&self) -> &'a ComponentRegistry {
        self.registry
    }

    pub const fn position(&self) -> usize {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.lines.len()
    }

    /// The line at the cursor.
    pub fn current(&self) -> Option<&str> {
        self.line(0)
    }

    /// The line `offset` lines after the cursor.
    pub fn line(&self, offset: usize) -> Option<&str> {
        self.lines.get(self.position + offset).map(String::as_str)
    }

    /// All lines from the cursor on.
    pub fn remaining(&self) -> &[String] {
        self.lines.get(self.position..).unwrap_or_default()
    }

    pub(crate) fn advance(&mut self, lines: usize) {
        self.position = (self.position + lines).min(self.lines.len());
    }

    /// A fresh identifier for a synthesized node.
    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    /// Parse `lines` as an independent block stream sharing this parse's
    /// registry and identifier source.
    pub fn parse_nested(&mut self, lines: Vec<String>) -> Vec<Node> {
        let mut nested = ParseContext::from_lines(lines, self.registry, &mut *self.ids);
        crate::markdown::parse_blocks(&mut nested)
    }

    /// Parse a span of inline Markdown.
    pub fn parse_inline(&self, text: &str) -> Vec<Node> {
        crate::markdown::parse_inline(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    #[test]
    fn test_parse_context_cursor() {
        let registry = ComponentRegistry::with_defaults();
        let mut ids = SequentialIds::default();
        let mut ctx = ParseContext::new("a\r\nb\nc", &registry, &mut ids);
        assert_eq!(ctx.current(), Some("a"));
        assert_eq!(ctx.line(1), Some("b"));
        ctx.advance(2);
        assert_eq!(ctx.remaining(), &["c".to_string()]);
        ctx.advance(5);
        assert!(ctx.is_done());
        assert_eq!(ctx.current(), None);
    }

    #[test]
    fn test_nested_parse_shares_id_source() {
        let registry = ComponentRegistry::with_defaults();
        let mut ids = SequentialIds::new("t");
        let mut ctx = ParseContext::new("", &registry, &mut ids);
        assert_eq!(ctx.next_id(), "t-1");
        let nodes = ctx.parse_nested(vec!["- [ ] inner".to_string()]);
        assert_eq!(nodes[0].attr_str("localId"), Some("t-2"));
        assert_eq!(ctx.next_id(), "t-4");
    }

    #[test]
    fn test_in_list_restores_counter() {
        let registry = ComponentRegistry::with_defaults();
        let mut ctx = RenderContext::new(&registry);
        ctx.ordered_index = Some(3);
        let depth = ctx.in_list(|inner| {
            assert_eq!(inner.ordered_index, None);
            inner.list_depth
        });
        assert_eq!(depth, 1);
        assert_eq!(ctx.list_depth, 0);
        assert_eq!(ctx.ordered_index, Some(3));
    }

    #[test]
    fn test_project_children_records_paths() {
        let registry = ComponentRegistry::with_defaults();
        let mut ctx = RenderContext::new(&registry);
        let node = Node::with_content("paragraph", vec![Node::text("a"), Node::text("b")]);
        let views = ctx.project_children(&node);
        assert_eq!(views[1].source, Some(NodePath::from(vec![1])));
        assert_eq!(ctx.path(), &NodePath::root());
    }
}
