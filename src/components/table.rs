//! Pipe tables.
//!
//! The first Markdown row becomes the header row. In the read view cells
//! are laid out in a box drawn with Unicode line characters.

use unicode_width::UnicodeWidthStr;

use crate::adf::{Node, node_types};
use crate::markdown::patterns;
use crate::readview::{ReadViewNode, ViewStyle};
use crate::registry::{Handler, ParseContext, ParsedBlock, RenderContext};

pub(super) fn handlers() -> Vec<Handler> {
    vec![
        Handler::new(node_types::TABLE, table_markdown, table_read_view)
            .with_block_parser(can_parse_table, parse_table),
        Handler::new(node_types::TABLE_ROW, row_markdown, row_read_view),
        Handler::new(node_types::TABLE_HEADER, cell_markdown, header_read_view),
        Handler::new(node_types::TABLE_CELL, cell_markdown, cell_read_view),
    ]
}

// markdown

fn table_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let mut out = String::new();
    for (index, row) in node.children().iter().enumerate() {
        out.push_str(&ctx.markdown(row));
        if index == 0 {
            let columns = row.children().len().max(1);
            out.push('|');
            out.push_str(&" --- |".repeat(columns));
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

fn row_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let cells: Vec<String> = node.children().iter().map(|cell| ctx.markdown(cell)).collect();
    format!("| {} |\n", cells.join(" | "))
}

/// Cell text on one line with pipes escaped.
fn cell_markdown(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let parts: Vec<String> = node
        .children()
        .iter()
        .map(|block| {
            if block.is_type(node_types::PARAGRAPH) {
                ctx.inline_markdown(block)
            } else {
                ctx.markdown(block)
            }
        })
        .collect();
    parts
        .join(" ")
        .replace('|', "\\|")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// read view

/// Text of a cell: its blocks' inline text joined by spaces.
fn cell_text(node: &Node, ctx: &mut RenderContext<'_>) -> String {
    let mut parts = Vec::new();
    for (index, block) in node.children().iter().enumerate() {
        let view = ctx.project_child(block, index);
        let text = if view.content.is_empty() {
            view.children
                .iter()
                .map(|child| child.content.as_str())
                .collect::<String>()
        } else {
            view.content
        };
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" ")
}

fn cell_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::text(cell_text(node, ctx))
}

fn header_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::styled(cell_text(node, ctx), ViewStyle::default().bold())
}

fn row_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    ReadViewNode::container("", ctx.project_children(node))
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (index, width) in widths.iter().enumerate() {
        if index > 0 {
            line.push(mid);
        }
        line.push_str(&"─".repeat(width + 2));
    }
    line.push(right);
    line
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (index, width) in widths.iter().enumerate() {
        let cell = cells.get(index).map_or("", String::as_str);
        let padding = width.saturating_sub(cell.width());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding));
        line.push_str(" │");
    }
    line
}

fn table_read_view(node: &Node, ctx: &mut RenderContext<'_>) -> ReadViewNode {
    let mut rows: Vec<(bool, Vec<String>)> = Vec::new();
    for (index, row) in node.children().iter().enumerate() {
        let view = ctx.project_child(row, index);
        let is_header = !row.children().is_empty()
            && row.children().iter().all(|cell| cell.is_type(node_types::TABLE_HEADER));
        let cells = view.children.into_iter().map(|cell| cell.content).collect();
        rows.push((is_header, cells));
    }

    let columns = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    if columns == 0 {
        return ReadViewNode::text("");
    }
    let mut widths = vec![1; columns];
    for (_, cells) in &rows {
        for (index, cell) in cells.iter().enumerate() {
            widths[index] = widths[index].max(cell.width());
        }
    }

    let mut lines = vec![border(&widths, '┌', '┬', '┐')];
    for (index, (is_header, cells)) in rows.iter().enumerate() {
        lines.push(format_row(cells, &widths));
        if *is_header && index + 1 < rows.len() {
            lines.push(border(&widths, '├', '┼', '┤'));
        }
    }
    lines.push(border(&widths, '└', '┴', '┘'));
    ReadViewNode::text(lines.join("\n"))
}

// parsing

fn can_parse_table(ctx: &ParseContext<'_>) -> bool {
    ctx.current().is_some_and(patterns::is_table_row)
}

/// Consecutive pipe rows. Separator rows are skipped; the first row holds
/// header cells and the rest body cells.
fn parse_table(ctx: &mut ParseContext<'_>) -> Option<ParsedBlock> {
    let block: Vec<&String> = ctx
        .remaining()
        .iter()
        .take_while(|line| patterns::is_table_row(line) || patterns::is_table_separator(line))
        .collect();
    let consumed = block.len();
    let rows: Vec<Vec<String>> = block
        .into_iter()
        .filter(|line| !patterns::is_table_separator(line))
        .map(|line| patterns::table_cells(line))
        .collect();
    if rows.is_empty() {
        return None;
    }

    let mut content = Vec::with_capacity(rows.len());
    for (index, cells) in rows.into_iter().enumerate() {
        let cell_type = if index == 0 {
            node_types::TABLE_HEADER
        } else {
            node_types::TABLE_CELL
        };
        let cells = cells
            .iter()
            .map(|text| {
                let paragraph = Node::with_content(node_types::PARAGRAPH, ctx.parse_inline(text));
                Node::with_content(cell_type, vec![paragraph])
            })
            .collect();
        content.push(Node::with_content(node_types::TABLE_ROW, cells));
    }
    Some(ParsedBlock::new(
        Node::with_content(node_types::TABLE, content),
        consumed,
    ))
}
