//! Selection formatting.
//!
//! Every function here is a pure `(content, span, parameter) -> content`
//! transformation. Recording the result in history is the caller's job.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseTokenError;
use crate::text::{EditorRope, TextBuffer};
use crate::types::SelectionSpan;

/// Inline and block formats applied to a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextFormat {
    Bold,
    Italic,
    Underline,
    H1,
    H2,
    Bullet,
}

impl TextFormat {
    pub const ALL: [TextFormat; 6] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::H1,
        Self::H2,
        Self::Bullet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::Bullet => "bullet",
        }
    }

    /// Rewrite `text` with this format's tokens.
    pub fn wrap(&self, text: &str) -> String {
        match self {
            Self::Bold => format!("**{text}**"),
            Self::Italic => format!("*{text}*"),
            Self::Underline => format!("__{text}__"),
            Self::H1 => format!("# {text}"),
            Self::H2 => format!("## {text}"),
            Self::Bullet => text
                .split('\n')
                .map(|line| format!("- {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextFormat {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTokenError::Format(s.to_string()))
    }
}

/// Block alignment carried by `[ALIGN:<name>]...[/ALIGN]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [Self::Left, Self::Center, Self::Right, Self::Justify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }

    pub fn wrap(&self, text: &str) -> String {
        format!("[ALIGN:{}]{text}[/ALIGN]", self.as_str())
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTokenError::Alignment(s.to_string()))
    }
}

/// Apply `format` to the span and splice the result into `content`.
///
/// The replacement is built from `span.text`, which the caller captured when
/// the command was issued. A span outside the content leaves it unchanged.
pub fn apply_format(content: &str, format: TextFormat, span: &SelectionSpan) -> String {
    splice(content, span, &format.wrap(&span.text))
}

/// Like [`apply_format`] but takes the format by name. Unknown names are a no-op.
pub fn handle_text_format(content: &str, format: &str, span: &SelectionSpan) -> String {
    match format.parse::<TextFormat>() {
        Ok(format) => apply_format(content, format, span),
        Err(err) => {
            tracing::debug!(%err, "ignoring format command");
            content.to_string()
        }
    }
}

/// Wrap the span in alignment tokens. Existing alignment tokens are not
/// checked, so nesting is possible.
pub fn apply_alignment(content: &str, alignment: Alignment, span: &SelectionSpan) -> String {
    splice(content, span, &alignment.wrap(&span.text))
}

/// Like [`apply_alignment`] but takes the alignment by name. Unknown names are a no-op.
pub fn handle_text_align(content: &str, alignment: &str, span: &SelectionSpan) -> String {
    match alignment.parse::<Alignment>() {
        Ok(alignment) => apply_alignment(content, alignment, span),
        Err(err) => {
            tracing::debug!(%err, "ignoring align command");
            content.to_string()
        }
    }
}

fn splice(content: &str, span: &SelectionSpan, replacement: &str) -> String {
    let mut rope = EditorRope::from_str(content);
    if !rope.try_replace(span.start..span.end, replacement) {
        tracing::debug!(
            start = span.start,
            end = span.end,
            len = rope.len_chars(),
            "selection outside content"
        );
        return content.to_string();
    }
    rope.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(content: &str, start: usize, end: usize) -> SelectionSpan {
        let text: String = content.chars().skip(start).take(end - start).collect();
        SelectionSpan::new(start, end, text)
    }

    #[test]
    fn test_bold_hello_world() {
        let content = "hello world";
        let out = handle_text_format(content, "bold", &span(content, 0, 5));
        assert_eq!(out, "**hello** world");
    }

    #[test]
    fn test_each_inline_format() {
        let content = "a word here";
        let sel = span(content, 2, 6);
        let cases = [
            (TextFormat::Italic, "a *word* here"),
            (TextFormat::Underline, "a __word__ here"),
            (TextFormat::H1, "a # word here"),
            (TextFormat::H2, "a ## word here"),
        ];
        for (format, expected) in cases {
            assert_eq!(apply_format(content, format, &sel), expected, "{format}");
        }
    }

    #[test]
    fn test_bullet_prefixes_every_line() {
        let content = "Breakfast\nLunch\nDinner";
        let out = apply_format(content, TextFormat::Bullet, &span(content, 0, 22));
        assert_eq!(out, "- Breakfast\n- Lunch\n- Dinner");
    }

    #[test]
    fn test_unknown_format_is_noop() {
        let content = "hello world";
        let out = handle_text_format(content, "strikethrough", &span(content, 0, 5));
        assert_eq!(out, content);
    }

    #[test]
    fn test_out_of_range_selection_is_noop() {
        let content = "short";
        let sel = SelectionSpan::new(2, 40, "ort");
        assert_eq!(apply_format(content, TextFormat::Bold, &sel), content);
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let content = "Piña colada";
        let out = apply_format(content, TextFormat::Bold, &span(content, 0, 4));
        assert_eq!(out, "**Piña** colada");
    }

    #[test]
    fn test_alignment_nests() {
        let content = "Welcome";
        let once = handle_text_align(content, "center", &span(content, 0, 7));
        assert_eq!(once, "[ALIGN:center]Welcome[/ALIGN]");

        let len = once.chars().count();
        let twice = apply_alignment(&once, Alignment::Right, &span(&once, 0, len));
        assert_eq!(
            twice,
            "[ALIGN:right][ALIGN:center]Welcome[/ALIGN][/ALIGN]"
        );
    }

    #[test]
    fn test_unknown_alignment_is_noop() {
        let content = "Welcome";
        assert_eq!(handle_text_align(content, "diagonal", &span(content, 0, 7)), content);
    }

    #[test]
    fn test_empty_selection_inserts_tokens() {
        let content = "ab";
        let out = apply_format(content, TextFormat::Bold, &span(content, 1, 1));
        assert_eq!(out, "a****b");
    }
}
