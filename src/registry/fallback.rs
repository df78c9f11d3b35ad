//! Universal handler for node types nothing else accepts.
//!
//! The node stays visible and labeled with its type tag instead of being
//! dropped or aborting the conversion.

use crate::adf::Node;
use crate::readview::{ReadViewNode, ViewStyle};

use super::{Handler, RenderContext};

pub const FALLBACK_TYPE: &str = "*";

pub(super) const fn handler() -> Handler {
    Handler::new(FALLBACK_TYPE, to_markdown, to_read_view)
}

fn to_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    if ctx.in_inline {
        return format!("[unsupported: {}]", node.node_type);
    }
    let json = serde_json::to_string_pretty(node)
        .unwrap_or_else(|_| format!("{{\"type\": \"{}\"}}", node.node_type));
    format!(
        "<!-- unsupported node: {} -->\n```json\n{json}\n```\n\n",
        node.node_type
    )
}

fn to_read_view(node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled(
        format!("[unsupported: {}]", node.node_type),
        ViewStyle::default().dim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentRegistry;

    #[test]
    fn test_block_fallback_is_labeled_json() {
        let registry = ComponentRegistry::new();
        let mut ctx = RenderContext::new(&registry);
        let node = Node::new("extension").with_attr("extensionKey", "toc");
        let md = ctx.markdown(&node);
        assert!(md.starts_with("<!-- unsupported node: extension -->\n```json\n"));
        assert!(md.contains("\"extensionKey\": \"toc\""));
        assert!(md.ends_with("```\n\n"));
    }

    #[test]
    fn test_inline_fallback_stays_on_the_line() {
        let registry = ComponentRegistry::new();
        let mut ctx = RenderContext::new(&registry);
        ctx.in_inline = true;
        assert_eq!(ctx.markdown(&Node::new("inlineCard")), "[unsupported: inlineCard]");
    }

    #[test]
    fn test_read_view_label_is_dimmed() {
        let registry = ComponentRegistry::new();
        let mut ctx = RenderContext::new(&registry);
        let view = ctx.project(&Node::new("placeholder"));
        assert_eq!(view.content, "[unsupported: placeholder]");
        assert!(view.style.is_some_and(|s| s.dim));
    }
}
