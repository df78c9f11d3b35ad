//! Terminal presentation of display lines.
//!
//! - [`style`]: Theming and colors (read-view styles to ratatui styles)
//! - [`terminal`]: Writing styled lines to stdout with crossterm

pub mod style;
pub mod terminal;

use ratatui::text::Line;

use crate::readview::DisplayLine;
use crate::search;
use style::Theme;

/// Numbered lines for a `--find` listing: `NUMBER: text` for each match,
/// 1-based, with the matches highlighted.
pub fn match_listing(lines: &[DisplayLine], query: &str, theme: &Theme) -> Vec<Line<'static>> {
    search::find_matches(lines, query)
        .into_iter()
        .map(|index| {
            let mut line = theme.line_with_matches(&lines[index], query);
            line.spans.insert(0, format!("{:>4}: ", index + 1).into());
            line
        })
        .collect()
}

/// Every display line, styled.
pub fn document_lines(lines: &[DisplayLine], theme: &Theme) -> Vec<Line<'static>> {
    lines.iter().map(|line| theme.line(line)).collect()
}
