//! Core editor types: selection, selection spans and image descriptors.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ParseTokenError;
use crate::text::TextBuffer;

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
/// Offsets are in chars, not bytes.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the selection length.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Check if empty (same as is_collapsed).
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// The selected text at the moment a formatting command is issued.
///
/// Recomputed for every command; never stored across edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSpan {
    /// Char offset of the first selected char
    pub start: usize,
    /// Char offset one past the last selected char
    pub end: usize,
    pub text: String,
}

impl SelectionSpan {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Capture the text under `selection`. `None` if it runs past the end.
    pub fn capture<B: TextBuffer>(buffer: &B, selection: Selection) -> Option<Self> {
        let text = buffer.slice(selection.to_range())?;
        Some(Self {
            start: selection.start(),
            end: selection.end(),
            text: text.to_string(),
        })
    }
}

/// Where an image sits relative to the surrounding text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    Left,
    #[default]
    Center,
    Right,
    Full,
}

impl ImagePosition {
    pub const ALL: [ImagePosition; 4] = [Self::Left, Self::Center, Self::Right, Self::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for ImagePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImagePosition {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTokenError::ImagePosition(s.to_string()))
    }
}

/// One image embedded in a page.
///
/// The descriptor's position in the editor's image list is the `<n>` of its
/// `[IMAGE_<n>]` placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    #[serde(default)]
    pub position: ImagePosition,
    #[serde(default)]
    pub caption: Option<String>,
    /// Percentage string such as `"50%"`.
    #[serde(default = "default_width")]
    pub width: SmolStr,
}

fn default_width() -> SmolStr {
    SmolStr::new_static("100%")
}

impl ImageDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            position: ImagePosition::default(),
            caption: None,
            width: default_width(),
        }
    }

    pub fn with_position(mut self, position: ImagePosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        self.caption = (!caption.is_empty()).then_some(caption);
        self
    }

    pub fn with_width(mut self, width: impl Into<SmolStr>) -> Self {
        self.width = width.into();
        self
    }
}

/// Normalize a width to a percentage string.
///
/// Accepts `"50"`, `"50%"` or `" 50 % "`; anything outside 1..=100 is rejected.
pub fn normalize_width(width: &str) -> Option<SmolStr> {
    let digits = width.trim().trim_end_matches('%').trim();
    let value: u8 = digits.parse().ok()?;
    (1..=100)
        .contains(&value)
        .then(|| smol_str::format_smolstr!("{value}%"))
}
