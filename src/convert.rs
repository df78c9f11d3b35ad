//! Conversion entry points.
//!
//! A [`Converter`] holds a registry that has been checked once for the
//! handlers conversion cannot work without, so its methods never fail.

use crate::adf::{Document, node_types};
use crate::error::ConvertError;
use crate::ids::{IdSource, UuidIds};
use crate::markdown;
use crate::perf;
use crate::readview::{self, DisplayLine, ReadViewNode};
use crate::registry::ComponentRegistry;

/// Node types every registry used for conversion must handle.
pub const REQUIRED_TYPES: [&str; 3] = [node_types::DOC, node_types::PARAGRAPH, node_types::TEXT];

/// ADF ⇄ Markdown ⇄ read view, over one validated registry.
#[derive(Debug, Clone)]
pub struct Converter {
    registry: ComponentRegistry,
}

impl Converter {
    /// A converter over the built-in handlers.
    pub fn new() -> Self {
        Self {
            registry: ComponentRegistry::with_defaults(),
        }
    }

    /// A converter over a custom registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingHandler`] for the first required node
    /// type the registry has no handler for.
    pub fn with_registry(registry: ComponentRegistry) -> Result<Self, ConvertError> {
        for node_type in REQUIRED_TYPES {
            registry.require(node_type)?;
        }
        Ok(Self { registry })
    }

    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Render a document as Markdown.
    pub fn to_markdown(&self, doc: &Document) -> String {
        let _scope = perf::scope("convert.to_markdown");
        markdown::serialize(doc, &self.registry).unwrap_or_default()
    }

    /// Parse Markdown, drawing identifiers for task nodes from `ids`.
    pub fn from_markdown(&self, source: &str, ids: &mut dyn IdSource) -> Document {
        let _scope = perf::scope("convert.from_markdown");
        markdown::parse(source, &self.registry, ids).unwrap_or_default()
    }

    /// Project a document into its display tree.
    pub fn read_view(&self, doc: &Document) -> ReadViewNode {
        let _scope = perf::scope("convert.read_view");
        readview::project(doc, &self.registry).unwrap_or_default()
    }

    /// Project and flatten a document into display lines.
    pub fn display_lines(&self, doc: &Document) -> Vec<DisplayLine> {
        readview::flatten(&self.read_view(doc))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Markdown for this document using the built-in handlers.
    pub fn to_markdown(&self) -> String {
        markdown::serialize(self, ComponentRegistry::shared()).unwrap_or_default()
    }

    /// Parse Markdown using the built-in handlers and random identifiers.
    pub fn from_markdown(source: &str) -> Self {
        markdown::parse(source, ComponentRegistry::shared(), &mut UuidIds).unwrap_or_default()
    }

    /// Display lines for this document using the built-in handlers.
    pub fn display_lines(&self) -> Vec<DisplayLine> {
        readview::display_lines(self, ComponentRegistry::shared())
            .unwrap_or_else(|_| vec![DisplayLine::default()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::Node;
    use crate::ids::SequentialIds;

    #[test]
    fn test_with_registry_rejects_missing_paragraph() {
        let mut registry = ComponentRegistry::new();
        let defaults = ComponentRegistry::with_defaults();
        for ty in ["doc", "text"] {
            registry.register(*defaults.get(ty).unwrap());
        }
        let err = Converter::with_registry(registry).unwrap_err();
        assert_eq!(
            err,
            ConvertError::MissingHandler {
                node_type: "paragraph".to_string()
            }
        );
    }

    #[test]
    fn test_with_registry_accepts_defaults() {
        assert!(Converter::with_registry(ComponentRegistry::with_defaults()).is_ok());
    }

    #[test]
    fn test_converter_round_trip() {
        let converter = Converter::new();
        let mut ids = SequentialIds::default();
        let doc = converter.from_markdown("# Hi\n\n- [ ] task\n", &mut ids);
        assert_eq!(converter.to_markdown(&doc), "# Hi\n\n- [ ] task\n");
    }

    #[test]
    fn test_display_lines_of_empty_document() {
        let lines = Converter::new().display_lines(&Document::empty());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
    }

    #[test]
    fn test_document_conveniences() {
        let doc = Document::from_markdown("hello **world**");
        assert_eq!(doc.to_markdown(), "hello **world**\n");
        let lines = doc.display_lines();
        assert_eq!(lines[0].content(), "hello world");
        assert_eq!(doc.node_at(lines[0].source().unwrap()).unwrap().node_type, "paragraph");
    }

    #[test]
    fn test_read_view_root_has_one_child_per_block() {
        let doc = Document::new(vec![Node::new("rule"), Node::new("rule")]);
        let view = Converter::new().read_view(&doc);
        assert_eq!(view.children.len(), 2);
    }
}
