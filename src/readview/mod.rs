//! Read-view projection of a document.
//!
//! This module handles:
//! - Projecting the ADF tree into a styled display tree (via the registry)
//! - Flattening the display tree into the line sequence the editor view
//!   addresses by line number

mod flatten;

pub use flatten::{DisplayLine, flatten};

use crate::adf::{Document, NodePath, node_types};
use crate::error::ConvertError;
use crate::registry::{ComponentRegistry, RenderContext};

/// RGB color for read-view styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ViewColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLUE: Self = Self::new(0x00, 0x52, 0xcc);
    pub const PURPLE: Self = Self::new(0x65, 0x54, 0xc0);
    pub const YELLOW: Self = Self::new(0xff, 0xab, 0x00);
    pub const RED: Self = Self::new(0xde, 0x35, 0x0b);
    pub const GREEN: Self = Self::new(0x00, 0x87, 0x5a);
    pub const GRAY: Self = Self::new(0x6b, 0x77, 0x8c);
    pub const TEAL: Self = Self::new(0x00, 0xa3, 0xbf);
}

/// Relative size of a line, for views that can render larger text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeHint {
    #[default]
    Normal,
    /// Heading with level (1-6)
    Heading(u8),
}

/// Style descriptor of a read-view node or display line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStyle {
    pub fg: Option<ViewColor>,
    pub bg: Option<ViewColor>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub dim: bool,
    pub strikethrough: bool,
    pub size: SizeHint,
}

impl ViewStyle {
    #[must_use]
    pub const fn fg(mut self, color: ViewColor) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: ViewColor) -> Self {
        self.bg = Some(color);
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    #[must_use]
    pub const fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    #[must_use]
    pub const fn size(mut self, size: SizeHint) -> Self {
        self.size = size;
        self
    }
}

/// A node of the display tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadViewNode {
    /// Text of this node. May contain newlines; the flattener splits them.
    pub content: String,
    pub style: Option<ViewStyle>,
    pub children: Vec<ReadViewNode>,
    /// Path of the document node this was projected from
    pub source: Option<NodePath>,
}

impl ReadViewNode {
    /// An unstyled leaf.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// A styled leaf.
    pub fn styled(content: impl Into<String>, style: ViewStyle) -> Self {
        Self {
            content: content.into(),
            style: Some(style),
            ..Self::default()
        }
    }

    /// A node whose content prefixes its first child.
    pub fn container(content: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            content: content.into(),
            children,
            ..Self::default()
        }
    }

    /// A node that flattens to exactly one (suppressible) empty line.
    pub fn blank() -> Self {
        Self::text("\n")
    }

    /// Wrap `self` so a blank line follows it.
    #[must_use]
    pub fn spaced(self) -> Self {
        Self::container("", vec![self, Self::blank()])
    }

    #[must_use]
    pub fn with_style(mut self, style: ViewStyle) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: NodePath) -> Self {
        self.source = Some(source);
        self
    }
}

/// Project a document into its display tree.
pub fn project(doc: &Document, registry: &ComponentRegistry) -> Result<ReadViewNode, ConvertError> {
    let root = registry.require(node_types::DOC)?;
    let node = doc.as_root_node();
    let mut ctx = RenderContext::new(registry);
    let view = (root.to_read_view)(&node, &mut ctx);
    Ok(view)
}

/// Project and flatten in one step.
pub fn display_lines(
    doc: &Document,
    registry: &ComponentRegistry,
) -> Result<Vec<DisplayLine>, ConvertError> {
    Ok(flatten(&project(doc, registry)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::Node;

    fn registry() -> ComponentRegistry {
        ComponentRegistry::with_defaults()
    }

    fn contents(lines: &[DisplayLine]) -> Vec<&str> {
        lines.iter().map(DisplayLine::content).collect()
    }

    #[test]
    fn test_project_requires_doc_handler() {
        let err = project(&Document::empty(), &ComponentRegistry::new()).unwrap_err();
        assert_eq!(
            err,
            ConvertError::MissingHandler {
                node_type: "doc".to_string()
            }
        );
    }

    #[test]
    fn test_paragraphs_are_separated_by_one_blank_line() {
        let doc = Document::new(vec![
            Node::with_content("paragraph", vec![Node::text("one")]),
            Node::with_content("paragraph", vec![Node::text("two")]),
        ]);
        let lines = display_lines(&doc, &registry()).unwrap();
        assert_eq!(contents(&lines), vec!["one", "", "two", ""]);
    }

    #[test]
    fn test_lines_point_back_at_source_nodes() {
        let doc = Document::new(vec![
            Node::with_content("paragraph", vec![Node::text("one")]),
            Node::with_content("heading", vec![Node::text("Two")]).with_attr("level", 2),
        ]);
        let lines = display_lines(&doc, &registry()).unwrap();
        let heading = lines.iter().find(|l| l.content() == "Two").unwrap();
        let source = heading.source().unwrap();
        assert_eq!(doc.node_at(source).unwrap().node_type, "heading");
    }

    #[test]
    fn test_list_items_carry_markers() {
        let doc = Document::new(vec![Node::with_content(
            "bulletList",
            vec![
                Node::with_content(
                    "listItem",
                    vec![Node::with_content("paragraph", vec![Node::text("a")])],
                ),
                Node::with_content(
                    "listItem",
                    vec![Node::with_content("paragraph", vec![Node::text("b")])],
                ),
            ],
        )]);
        let lines = display_lines(&doc, &registry()).unwrap();
        assert_eq!(contents(&lines), vec!["• a", "• b", ""]);
    }

    #[test]
    fn test_unknown_node_projects_dimmed_label() {
        let doc = Document::new(vec![Node::new("bodiedExtension")]);
        let lines = display_lines(&doc, &registry()).unwrap();
        assert_eq!(lines[0].content(), "[unsupported: bodiedExtension]");
        assert!(lines[0].style().is_some_and(|s| s.dim));
    }

    #[test]
    fn test_empty_document_is_one_empty_line() {
        let lines = display_lines(&Document::empty(), &registry()).unwrap();
        assert_eq!(contents(&lines), vec![""]);
    }
}
