//! Markdown serialization and parsing.
//!
//! Both directions dispatch through the [`ComponentRegistry`]: serializing
//! hands the root `doc` node to its handler, parsing runs the registered
//! block parsers over the input lines in priority order.

pub mod inline;
pub mod patterns;

pub use inline::parse_inline;

use crate::adf::{Document, Node, node_types};
use crate::error::ConvertError;
use crate::ids::IdSource;
use crate::registry::{ComponentRegistry, ParseContext, ParsedBlock, RenderContext};

/// Render a document as Markdown.
pub fn serialize(doc: &Document, registry: &ComponentRegistry) -> Result<String, ConvertError> {
    let root = registry.require(node_types::DOC)?;
    let node = doc.as_root_node();
    let mut ctx = RenderContext::new(registry);
    Ok((root.to_markdown)(&node, &mut ctx))
}

/// Parse Markdown into a document.
///
/// Fails only when the registry has no paragraph handler, since every line
/// no other construct claims must end up in a paragraph.
pub fn parse(
    source: &str,
    registry: &ComponentRegistry,
    ids: &mut dyn IdSource,
) -> Result<Document, ConvertError> {
    registry.require(node_types::PARAGRAPH)?;
    let mut ctx = ParseContext::new(source, registry, ids);
    let content = parse_blocks(&mut ctx);
    tracing::debug!(blocks = content.len(), "parsed markdown");
    Ok(Document::new(content))
}

/// Parse block nodes from the cursor to the end of the context's lines.
pub fn parse_blocks(ctx: &mut ParseContext<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    while let Some(line) = ctx.current() {
        if patterns::is_blank(line) {
            ctx.advance(1);
            continue;
        }
        match parse_block(ctx) {
            Some(block) => {
                tracing::trace!(
                    line = ctx.position(),
                    node_type = %block.node.node_type,
                    consumed = block.consumed,
                    "parsed block"
                );
                ctx.advance(block.consumed);
                nodes.push(block.node);
            }
            None => {
                tracing::debug!(line = ctx.position(), "no block parser accepted line, skipping");
                ctx.advance(1);
            }
        }
    }
    nodes
}

/// First block parser in priority order that accepts the cursor line and
/// consumes at least one line.
fn parse_block(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let registry = ctx.registry();
    for (name, parser) in registry.block_parsers() {
        if !(parser.can_parse)(ctx) {
            continue;
        }
        match (parser.parse)(ctx) {
            Some(block) if block.consumed > 0 => return Some(block),
            _ => tracing::trace!(parser = name, "parser declined after accepting line"),
        }
    }
    None
}
