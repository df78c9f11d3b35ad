//! Printing styled lines to a terminal stream.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, ContentStyle, Print, PrintStyledContent, StyledContent,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

/// Write `lines` to `out`, one per row, with ANSI styling.
pub fn write_styled<W: Write>(out: &mut W, lines: &[Line<'_>]) -> std::io::Result<()> {
    for line in lines {
        for span in &line.spans {
            let styled = StyledContent::new(content_style(span.style), span.content.as_ref());
            queue!(out, PrintStyledContent(styled))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

/// Write the text of `lines` without any styling.
pub fn write_plain<W: Write>(out: &mut W, lines: &[Line<'_>]) -> std::io::Result<()> {
    for line in lines {
        for span in &line.spans {
            out.write_all(span.content.as_bytes())?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(term_color);
    content.background_color = style.bg.map(term_color);
    let attributes = [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ];
    for (modifier, attribute) in attributes {
        if style.add_modifier.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}

const fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(index) => TermColor::AnsiValue(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Span;

    #[test]
    fn test_plain_output_has_no_escapes() {
        let lines = vec![
            Line::from(vec![Span::raw("a"), Span::styled("b", Style::default().fg(Color::Red))]),
            Line::from(""),
        ];
        let mut out = Vec::new();
        write_plain(&mut out, &lines).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ab\n\n");
    }

    #[test]
    fn test_styled_output_contains_escapes_and_text() {
        let lines = vec![Line::from(Span::styled(
            "bold",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        let mut out = Vec::new();
        write_styled(&mut out, &lines).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("bold"));
        assert!(text.contains('\u{1b}'));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(term_color(Color::Indexed(42)), TermColor::AnsiValue(42));
        assert_eq!(
            term_color(Color::Rgb(1, 2, 3)),
            TermColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
