//! Document root and basic block handlers: paragraph, heading, code block,
//! blockquote and rule.

use crate::adf::{Node, node_types};
use crate::markdown::patterns;
use crate::readview::{ReadViewNode, SizeHint, ViewColor, ViewStyle};
use crate::registry::{Handler, ParseContext, ParsedBlock, RenderContext};

pub(super) fn handlers() -> Vec<Handler> {
    vec![
        Handler::new(node_types::DOC, doc_markdown, doc_read_view),
        Handler::new(node_types::PARAGRAPH, paragraph_markdown, paragraph_read_view)
            .with_block_parser(always, parse_paragraph),
        Handler::new(node_types::HEADING, heading_markdown, heading_read_view)
            .with_block_parser(can_parse_heading, parse_heading),
        Handler::new(node_types::CODE_BLOCK, code_block_markdown, code_block_read_view)
            .with_block_parser(can_parse_code_block, parse_code_block),
        Handler::new(node_types::BLOCKQUOTE, blockquote_markdown, blockquote_read_view)
            .with_block_parser(can_parse_blockquote, parse_blockquote),
        Handler::new(node_types::RULE, rule_markdown, rule_read_view)
            .with_block_parser(can_parse_rule, parse_rule),
    ]
}

const fn always(_: &ParseContext<'_>) -> bool {
    true
}

fn current_matches(ctx: &ParseContext<'_>, test: fn(&str) -> bool) -> bool {
    ctx.current().is_some_and(test)
}

// doc

fn doc_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let body = ctx.markdown_children(node);
    let body = body.trim_end_matches('\n');
    if body.is_empty() {
        String::new()
    } else {
        format!("{body}\n")
    }
}

fn doc_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let blocks = ctx
        .project_children(node)
        .into_iter()
        .map(ReadViewNode::spaced)
        .collect();
    ReadViewNode::container("", blocks)
}

// paragraph

fn paragraph_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let text = ctx.inline_markdown(node);
    if ctx.list_depth > 0 {
        format!("{text}\n")
    } else {
        format!("{text}\n\n")
    }
}

fn paragraph_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let view = ctx.inline_view(node);
    if view.content.is_empty() {
        ReadViewNode::blank()
    } else {
        view
    }
}

/// Consecutive lines up to a blank line or the start of another block.
/// Line breaks become spaces, except after a line ending in two or more
/// spaces where the break is kept for the inline parser.
fn parse_paragraph(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let lines = ctx.remaining();
    let first = lines.first()?;

    let mut text = first.trim_start().to_string();
    let mut consumed = 1;
    for line in &lines[1..] {
        if patterns::is_blank(line) || patterns::starts_block(line) {
            break;
        }
        patterns::join_line(&mut text, line);
        consumed += 1;
    }

    let content = ctx.parse_inline(text.trim_end());
    Some(ParsedBlock::new(
        Node::with_content(node_types::PARAGRAPH, content),
        consumed,
    ))
}

// heading

fn heading_level(node: &Node) -> u8 {
    node.attr_u64("level")
        .map_or(1, |level| u8::try_from(level.clamp(1, 6)).unwrap_or(1))
}

fn heading_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let hashes = "#".repeat(usize::from(heading_level(node)));
    format!("{hashes} {}\n\n", ctx.inline_markdown(node))
}

fn heading_style(level: u8) -> ViewStyle {
    let base = ViewStyle::default().bold().size(SizeHint::Heading(level));
    match level {
        1 => base.fg(ViewColor::TEAL).underline(),
        2 => base.fg(ViewColor::GREEN),
        3 => base.fg(ViewColor::YELLOW),
        4 => base.fg(ViewColor::BLUE),
        5 => base.fg(ViewColor::PURPLE),
        _ => base.fg(ViewColor::GRAY),
    }
}

fn heading_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled(ctx.inline_text(node), heading_style(heading_level(node)))
}

fn can_parse_heading(ctx: &ParseContext<'_>) -> bool {
    current_matches(ctx, |line| patterns::heading(line).is_some())
}

fn parse_heading(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let (level, text) = patterns::heading(ctx.current()?)?;
    let content = ctx.parse_inline(text);
    let node = Node::with_content(node_types::HEADING, content).with_attr("level", level);
    Some(ParsedBlock::new(node, 1))
}

// code block

fn code_block_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let language = node.attr_str("language").unwrap_or_default();
    let code = ctx.in_code_block(|ctx| ctx.markdown_children(node));
    if code.is_empty() {
        format!("```{language}\n```\n\n")
    } else {
        format!("```{language}\n{code}\n```\n\n")
    }
}

fn code_block_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let language = node.attr_str("language").unwrap_or("code");
    let code = ctx.in_code_block(|ctx| ctx.inline_text(node));

    let mut framed = format!("┌─ {language}\n");
    for line in code.lines() {
        framed.push_str("│ ");
        framed.push_str(line);
        framed.push('\n');
    }
    framed.push('└');
    ReadViewNode::styled(framed, ViewStyle::default().fg(ViewColor::GRAY))
}

fn can_parse_code_block(ctx: &ParseContext<'_>) -> bool {
    current_matches(ctx, patterns::is_fence)
}

/// Everything up to the closing fence, verbatim. An unclosed fence runs to
/// the end of the input.
fn parse_code_block(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let lines = ctx.remaining();
    let language = patterns::fence_language(lines.first()?);

    let body: Vec<&str> = lines[1..]
        .iter()
        .map(String::as_str)
        .take_while(|line| !patterns::is_fence(line))
        .collect();
    let closed = lines.len() > body.len() + 1;
    let consumed = 1 + body.len() + usize::from(closed);

    let code = body.join("\n");
    let content = if code.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(code)]
    };
    let mut node = Node::with_content(node_types::CODE_BLOCK, content);
    if !language.is_empty() {
        node = node.with_attr("language", language);
    }
    Some(ParsedBlock::new(node, consumed))
}

// blockquote

fn blockquote_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let inner = ctx.markdown_children(node);
    let mut out = String::new();
    for line in inner.trim_end_matches('\n').lines() {
        if line.is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str("> ");
            out.push_str(line);
            out.push('\n');
        }
    }
    if out.is_empty() {
        out.push_str(">\n");
    }
    out.push('\n');
    out
}

fn blockquote_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let framed: Vec<String> = ctx
        .project_lines(node)
        .iter()
        .map(|line| format!("│ {}", line.content()).trim_end().to_string())
        .collect();
    ReadViewNode::styled(
        framed.join("\n"),
        ViewStyle::default().fg(ViewColor::BLUE).italic(),
    )
}

fn can_parse_blockquote(ctx: &ParseContext<'_>) -> bool {
    current_matches(ctx, patterns::is_blockquote)
}

/// Quoted lines with the marker stripped, parsed again as blocks.
fn parse_blockquote(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let inner: Vec<String> = ctx
        .remaining()
        .iter()
        .map_while(|line| patterns::strip_blockquote(line))
        .map(ToString::to_string)
        .collect();
    let consumed = inner.len();

    let mut content = ctx.parse_nested(inner);
    if content.is_empty() {
        content.push(Node::with_content(node_types::PARAGRAPH, Vec::new()));
    }
    Some(ParsedBlock::new(
        Node::with_content(node_types::BLOCKQUOTE, content),
        consumed,
    ))
}

// rule

fn rule_markdown(_node: &Node, _ctx: &mut RenderContext<'_>) -> String {
    "---\n\n".to_string()
}

fn rule_read_view(_node: &Node, _ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled("─".repeat(40), ViewStyle::default().fg(ViewColor::GRAY).dim())
}

fn can_parse_rule(ctx: &ParseContext<'_>) -> bool {
    current_matches(ctx, patterns::is_rule)
}

fn parse_rule(_ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    Some(ParsedBlock::new(Node::new(node_types::RULE), 1))
}
