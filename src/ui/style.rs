//! Theming and color definitions.
//!
//! Maps read-view styles onto ratatui styles. Colors are emitted as true
//! color when the terminal supports it and as xterm-256 indices otherwise;
//! on light backgrounds bright foregrounds are darkened to stay legible.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::config::ThemeMode;
use crate::readview::{DisplayLine, ViewColor, ViewStyle};
use crate::search;

/// Terminal capabilities the styles adapt to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub light_background: bool,
    pub truecolor: bool,
    /// Style of search match spans
    pub search_match: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self {
            light_background: false,
            truecolor: supports_truecolor(),
            search_match: Style::default().fg(Color::Black).bg(Color::Yellow),
        }
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            light_background: true,
            truecolor: supports_truecolor(),
            search_match: Style::default().fg(Color::Black).bg(Color::Indexed(229)),
        }
    }

    pub fn for_mode(mode: Option<ThemeMode>) -> Self {
        match mode {
            Some(ThemeMode::Light) => Self::light(),
            Some(ThemeMode::Dark) | None => Self::dark(),
        }
    }

    fn color(&self, color: ViewColor) -> Color {
        let color = if self.light_background {
            darken_for_light_background(color)
        } else {
            color
        };
        if self.truecolor {
            Color::Rgb(color.r, color.g, color.b)
        } else {
            Color::Indexed(rgb_to_xterm_256(color.r, color.g, color.b))
        }
    }

    /// Get the ratatui style for a read-view style.
    pub fn style(&self, view: &ViewStyle) -> Style {
        let mut style = Style::default();
        if let Some(fg) = view.fg {
            style = style.fg(self.color(fg));
        }
        if let Some(bg) = view.bg {
            style = style.bg(self.color(bg));
        }
        let flags = [
            (view.bold, Modifier::BOLD),
            (view.italic, Modifier::ITALIC),
            (view.underline, Modifier::UNDERLINED),
            (view.dim, Modifier::DIM),
            (view.strikethrough, Modifier::CROSSED_OUT),
        ];
        for (on, modifier) in flags {
            if on {
                style = style.add_modifier(modifier);
            }
        }
        style
    }

    /// A display line as a single styled ratatui line.
    pub fn line(&self, line: &DisplayLine) -> Line<'static> {
        let style = line.style().map(|s| self.style(s)).unwrap_or_default();
        Line::from(Span::styled(line.content().to_string(), style))
    }

    /// A display line with every occurrence of `query` highlighted.
    pub fn line_with_matches(&self, line: &DisplayLine, query: &str) -> Line<'static> {
        let base = line.style().map(|s| self.style(s)).unwrap_or_default();
        let chars: Vec<char> = line.content().chars().collect();

        let mut spans = Vec::new();
        let mut cursor = 0;
        for found in search::match_spans(line.content(), query) {
            let start = found.start;
            if start < cursor {
                continue;
            }
            if start > cursor {
                spans.push(Span::styled(chars[cursor..start].iter().collect::<String>(), base));
            }
            let end = found.end.min(chars.len());
            spans.push(Span::styled(
                chars[start..end].iter().collect::<String>(),
                base.patch(self.search_match),
            ));
            cursor = end;
        }
        if cursor < chars.len() || spans.is_empty() {
            spans.push(Span::styled(chars[cursor..].iter().collect::<String>(), base));
        }
        Line::from(spans)
    }
}

fn darken_for_light_background(color: ViewColor) -> ViewColor {
    let luma = 0.0722f32.mul_add(
        f32::from(color.b),
        0.2126f32.mul_add(f32::from(color.r), 0.7152 * f32::from(color.g)),
    );
    if luma < 150.0 {
        return color;
    }
    ViewColor::new(color.r / 2, color.g / 2, color.b / 2)
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("ADFLESS_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readview::SizeHint;

    fn theme(light_background: bool, truecolor: bool) -> Theme {
        Theme {
            light_background,
            truecolor,
            ..Theme::dark()
        }
    }

    #[test]
    fn test_modifiers_follow_view_style() {
        let view = ViewStyle::default()
            .bold()
            .italic()
            .strikethrough()
            .size(SizeHint::Heading(1));
        let style = theme(false, true).style(&view);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
        assert!(!style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_truecolor_keeps_rgb() {
        let style = theme(false, true).style(&ViewStyle::default().fg(ViewColor::RED));
        assert_eq!(style.fg, Some(Color::Rgb(0xde, 0x35, 0x0b)));
    }

    #[test]
    fn test_fallback_indexed_color_when_not_truecolor() {
        let style = theme(false, false).style(&ViewStyle::default().fg(ViewColor::new(255, 0, 0)));
        assert_eq!(style.fg, Some(Color::Indexed(196)));
    }

    #[test]
    fn test_light_background_darkens_bright_colors() {
        let style = theme(true, true).style(&ViewStyle::default().fg(ViewColor::YELLOW));
        assert_eq!(style.fg, Some(Color::Rgb(0x7f, 0x55, 0x00)));
        let style = theme(true, true).style(&ViewStyle::default().fg(ViewColor::BLUE));
        assert_eq!(style.fg, Some(Color::Rgb(0x00, 0x52, 0xcc)));
    }

    #[test]
    fn test_truecolor_detection_without_colorterm() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
    }

    #[test]
    fn test_truecolor_detection_with_colorterm() {
        assert!(supports_truecolor_from_env(Some("truecolor"), Some("xterm-256color")));
    }

    #[test]
    fn test_line_keeps_content() {
        let line = DisplayLine::new("hello".to_string(), None, None);
        let rendered = theme(false, true).line(&line);
        assert_eq!(rendered.spans.len(), 1);
        assert_eq!(rendered.spans[0].content, "hello");
    }

    #[test]
    fn test_line_with_matches_splits_spans() {
        let theme = theme(false, true);
        let line = DisplayLine::new("Find the find".to_string(), None, None);
        let rendered = theme.line_with_matches(&line, "find");
        let parts: Vec<&str> = rendered.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Find", " the ", "find"]);
        assert_eq!(rendered.spans[0].style.bg, theme.search_match.bg);
        assert_eq!(rendered.spans[1].style.bg, None);
    }

    #[test]
    fn test_highlight_covers_source_chars_of_match() {
        let theme = theme(false, true);
        let line = DisplayLine::new("İstanbul trip".to_string(), None, None);
        let rendered = theme.line_with_matches(&line, "i\u{307}stanbul");
        let parts: Vec<&str> = rendered.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["İstanbul", " trip"]);
        assert_eq!(rendered.spans[0].style.bg, theme.search_match.bg);
    }

    #[test]
    fn test_line_without_matches_is_one_span() {
        let line = DisplayLine::new(String::new(), None, None);
        let rendered = theme(false, true).line_with_matches(&line, "x");
        assert_eq!(rendered.spans.len(), 1);
    }
}
