//! concierge-editor-core: the staff-side page editor without any UI framework.
//!
//! This crate provides:
//! - `EditorState` - one editing session with linear undo/redo
//! - `ImageControls` - the image list bound to `[IMAGE_<n>]` placeholders
//! - `ImageDialogState` - image insertion, including file decoding
//! - Text formatting over a selection span
//! - `Document` - the content micro-format parsed into nodes
//! - HTML preview rendering

pub mod actions;
pub mod dialog;
pub mod document;
pub mod editor;
pub mod error;
pub mod execute;
pub mod format;
pub mod history;
pub mod host;
pub mod images;
pub mod render;
pub mod text;
pub mod types;

pub use actions::{
    EditorAction, Key, KeyCombo, KeybindingConfig, KeydownResult, Modifiers, Range,
};
pub use dialog::{ImageDialogState, SelectedFile};
pub use document::{Document, Node};
pub use editor::EditorState;
pub use error::{DialogError, EditorError, ParseTokenError};
pub use execute::{execute_action, handle_keydown_with_bindings};
pub use format::{Alignment, TextFormat, handle_text_align, handle_text_format};
pub use history::{EditorSnapshot, SnapshotHistory, UndoManager};
pub use host::{EditorHost, RecordingHost};
pub use images::{ImageControls, ImageDeletion};
pub use render::{ImageResolver, PreviewRenderer, render_preview};
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use types::{ImageDescriptor, ImagePosition, Selection, SelectionSpan, normalize_width};
