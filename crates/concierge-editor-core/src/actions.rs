//! Editor actions and key bindings.
//!
//! `EditorAction` represents semantic editing operations, decoupled from how
//! they are triggered (toolbar button, keyboard shortcut, CLI command).

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::format::{Alignment, TextFormat};
use crate::types::{ImageDescriptor, ImagePosition};

/// A range in the document, measured in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(r: Range) -> Self {
        r.start..r.end
    }
}

/// All possible editor actions.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    // === Text ===
    /// Insert text at the given range (replacing any selected content).
    Insert { text: String, range: Range },

    /// Delete content backward (Backspace).
    DeleteBackward { range: Range },

    /// Delete content forward (Delete key).
    DeleteForward { range: Range },

    // === History ===
    Undo,
    Redo,

    // === Formatting ===
    /// Apply a format to the current selection.
    Format(TextFormat),

    /// Wrap the current selection in alignment tokens.
    Align(Alignment),

    // === Images ===
    /// Insert an image placeholder at the cursor.
    InsertImage(ImageDescriptor),

    SetImagePosition { index: usize, position: ImagePosition },

    SetImageWidth { index: usize, width: SmolStr },

    SetImageCaption { index: usize, caption: String },

    /// Remove an image and renumber later placeholders.
    DeleteImage { index: usize },

    /// Convert inline `[IMAGE:...]` tokens into indexed placeholders.
    FoldInlineImages,

    // === View ===
    ToggleExpanded,
    TogglePreview,

    // === Selection ===
    /// Select all content.
    SelectAll,

    /// Move cursor to position.
    MoveCursor { offset: usize },

    /// Extend selection to position.
    ExtendSelection { offset: usize },
}

impl EditorAction {
    /// Update the range in actions that use one.
    pub fn with_range(self, range: Range) -> Self {
        match self {
            Self::Insert { text, .. } => Self::Insert { text, range },
            Self::DeleteBackward { .. } => Self::DeleteBackward { range },
            Self::DeleteForward { .. } => Self::DeleteForward { range },
            other => other,
        }
    }

    /// Whether the action can change content or history.
    pub fn is_edit(&self) -> bool {
        !matches!(
            self,
            Self::ToggleExpanded
                | Self::TogglePreview
                | Self::SelectAll
                | Self::MoveCursor { .. }
                | Self::ExtendSelection { .. }
        )
    }
}

/// Key values for keyboard input.
///
/// Platform-agnostic key representation. Front ends convert from native key
/// events to this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };

    pub const META_SHIFT: Self = Self {
        meta: true,
        shift: true,
        ..Self::NONE
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    /// Get the primary modifier + Shift for the platform.
    pub fn primary_shift(is_mac: bool) -> Self {
        if is_mac {
            Self::META_SHIFT
        } else {
            Self::CTRL_SHIFT
        }
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }

    pub fn primary_shift(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary_shift(is_mac),
        }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, etc.).
    PassThrough,
}

/// Shortcut table mapping key combinations to actions.
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    bindings: HashMap<KeyCombo, EditorAction>,
}

impl KeybindingConfig {
    /// Bold/italic/underline on the primary modifier plus undo/redo.
    pub fn default_for_platform(is_mac: bool) -> Self {
        let mut config = Self::default();
        let ch = Key::character;
        config.bind(KeyCombo::primary(ch("b"), is_mac), EditorAction::Format(TextFormat::Bold));
        config.bind(KeyCombo::primary(ch("i"), is_mac), EditorAction::Format(TextFormat::Italic));
        config.bind(
            KeyCombo::primary(ch("u"), is_mac),
            EditorAction::Format(TextFormat::Underline),
        );
        config.bind(KeyCombo::primary(ch("z"), is_mac), EditorAction::Undo);
        config.bind(KeyCombo::primary_shift(ch("z"), is_mac), EditorAction::Redo);
        if !is_mac {
            config.bind(KeyCombo::primary(ch("y"), is_mac), EditorAction::Redo);
        }
        config.bind(KeyCombo::primary(ch("a"), is_mac), EditorAction::SelectAll);
        config
    }

    pub fn bind(&mut self, combo: KeyCombo, action: EditorAction) {
        self.bindings.insert(combo, action);
    }

    /// Look up the action for `combo`, with `range` applied to range-based actions.
    pub fn lookup(&self, combo: &KeyCombo, range: Range) -> Option<EditorAction> {
        self.bindings
            .get(combo)
            .cloned()
            .map(|action| action.with_range(range))
    }
}
