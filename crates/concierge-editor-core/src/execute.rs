//! Action execution for editor sessions.
//!
//! This module provides the `execute_action` function that applies
//! `EditorAction` operations to an `EditorState`.

use crate::actions::{EditorAction, KeyCombo, KeybindingConfig, KeydownResult, Range};
use crate::editor::EditorState;
use crate::host::EditorHost;
use crate::types::Selection;

/// Execute an editor action on a session.
///
/// This is the central dispatch point for all editor operations.
/// Returns true if the action was handled and changed something.
pub fn execute_action<H: EditorHost>(editor: &mut EditorState<H>, action: &EditorAction) -> bool {
    tracing::trace!(?action, "execute");
    match action {
        EditorAction::Insert { text, range } => {
            let range = range.normalize();
            editor.insert_text(range.into(), text)
        }
        EditorAction::DeleteBackward { range } => execute_delete_backward(editor, *range),
        EditorAction::DeleteForward { range } => execute_delete_forward(editor, *range),
        EditorAction::Undo => editor.undo(),
        EditorAction::Redo => editor.redo(),
        EditorAction::Format(format) => editor.format_selection(*format),
        EditorAction::Align(alignment) => editor.align_selection(*alignment),
        EditorAction::InsertImage(image) => {
            editor.insert_image(image.clone());
            true
        }
        EditorAction::SetImagePosition { index, position } => {
            editor.set_image_position(*index, *position)
        }
        EditorAction::SetImageWidth { index, width } => editor.set_image_width(*index, width),
        EditorAction::SetImageCaption { index, caption } => {
            editor.set_image_caption(*index, caption)
        }
        EditorAction::DeleteImage { index } => {
            let deletion = editor.delete_image(*index);
            deletion.removed.is_some() || deletion.placeholders > 0
        }
        EditorAction::FoldInlineImages => editor.fold_inline_images() > 0,
        EditorAction::ToggleExpanded => {
            editor.toggle_expanded();
            true
        }
        EditorAction::TogglePreview => {
            editor.toggle_preview_mode();
            true
        }
        EditorAction::SelectAll => {
            let len = editor.len_chars();
            editor.set_selection(Some(Selection::new(0, len)));
            true
        }
        EditorAction::MoveCursor { offset } => {
            editor.set_cursor_offset(*offset);
            editor.set_selection(None);
            true
        }
        EditorAction::ExtendSelection { offset } => {
            let offset = (*offset).min(editor.len_chars());
            let anchor = editor
                .selection()
                .map(|s| s.anchor)
                .unwrap_or_else(|| editor.cursor_offset());
            editor.set_selection(Some(Selection::new(anchor, offset)));
            true
        }
    }
}

fn execute_delete_backward<H: EditorHost>(editor: &mut EditorState<H>, range: Range) -> bool {
    let range = range.normalize();
    if !range.is_caret() {
        return editor.delete_range(range.into());
    }
    if range.start == 0 {
        return false;
    }
    editor.delete_range(range.start - 1..range.start)
}

fn execute_delete_forward<H: EditorHost>(editor: &mut EditorState<H>, range: Range) -> bool {
    let range = range.normalize();
    if !range.is_caret() {
        return editor.delete_range(range.into());
    }
    if range.start >= editor.len_chars() {
        return false;
    }
    editor.delete_range(range.start..range.start + 1)
}

/// Handle a keydown event using the keybinding configuration.
///
/// Only shortcuts are handled here. Navigation and modifier-only presses
/// pass through; anything else is left to text input.
pub fn handle_keydown_with_bindings<H: EditorHost>(
    editor: &mut EditorState<H>,
    config: &KeybindingConfig,
    combo: KeyCombo,
    range: Range,
) -> KeydownResult {
    if let Some(action) = config.lookup(&combo, range) {
        execute_action(editor, &action);
        return KeydownResult::Handled;
    }

    if combo.key.is_navigation() || combo.key.is_modifier() {
        return KeydownResult::PassThrough;
    }

    KeydownResult::NotHandled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Key, Modifiers};
    use crate::format::TextFormat;
    use crate::types::ImageDescriptor;

    fn make_editor(content: &str) -> EditorState<()> {
        EditorState::new(content, Vec::new(), ())
    }

    #[test]
    fn test_insert() {
        let mut editor = make_editor("hello");
        let action = EditorAction::Insert {
            text: " world".to_string(),
            range: Range::caret(5),
        };
        assert!(execute_action(&mut editor, &action));
        assert_eq!(editor.content(), "hello world");
        assert_eq!(editor.cursor_offset(), 11);
    }

    #[test]
    fn test_delete_backward() {
        let mut editor = make_editor("hello");
        let action = EditorAction::DeleteBackward {
            range: Range::caret(5),
        };
        assert!(execute_action(&mut editor, &action));
        assert_eq!(editor.content(), "hell");

        let at_start = EditorAction::DeleteBackward {
            range: Range::caret(0),
        };
        assert!(!execute_action(&mut editor, &at_start));
    }

    #[test]
    fn test_delete_selection() {
        let mut editor = make_editor("hello world");
        let action = EditorAction::DeleteForward {
            range: Range::new(11, 5),
        };
        assert!(execute_action(&mut editor, &action));
        assert_eq!(editor.content(), "hello");
    }

    #[test]
    fn test_undo_redo() {
        let mut editor = make_editor("hello");

        let action = EditorAction::Insert {
            text: " world".to_string(),
            range: Range::caret(5),
        };
        execute_action(&mut editor, &action);
        assert_eq!(editor.content(), "hello world");

        assert!(execute_action(&mut editor, &EditorAction::Undo));
        assert_eq!(editor.content(), "hello");

        assert!(execute_action(&mut editor, &EditorAction::Redo));
        assert_eq!(editor.content(), "hello world");
    }

    #[test]
    fn test_select_all_then_bold() {
        let mut editor = make_editor("hello");
        assert!(execute_action(&mut editor, &EditorAction::SelectAll));
        let sel = editor.selection().unwrap();
        assert_eq!((sel.start(), sel.end()), (0, 5));

        assert!(execute_action(&mut editor, &EditorAction::Format(TextFormat::Bold)));
        assert_eq!(editor.content(), "**hello**");
    }

    #[test]
    fn test_extend_selection_from_cursor() {
        let mut editor = make_editor("hello world");
        execute_action(&mut editor, &EditorAction::MoveCursor { offset: 6 });
        execute_action(&mut editor, &EditorAction::ExtendSelection { offset: 99 });
        assert_eq!(editor.selection(), Some(Selection::new(6, 11)));
        assert_eq!(editor.selection_span().unwrap().text, "world");
    }

    #[test]
    fn test_image_actions() {
        let mut editor = make_editor("");
        execute_action(
            &mut editor,
            &EditorAction::InsertImage(ImageDescriptor::new("a.png")),
        );
        assert!(execute_action(
            &mut editor,
            &EditorAction::SetImageWidth {
                index: 0,
                width: "40".into(),
            },
        ));
        assert_eq!(editor.images()[0].width, "40%");
        assert!(execute_action(&mut editor, &EditorAction::DeleteImage { index: 0 }));
        assert_eq!(editor.content(), "");
        assert!(!execute_action(&mut editor, &EditorAction::DeleteImage { index: 0 }));
    }

    #[test]
    fn test_keydown_dispatch() {
        let mut editor = make_editor("hello");
        editor.set_selection(Some(Selection::new(0, 5)));
        let config = KeybindingConfig::default_for_platform(false);

        let bold = KeyCombo::with_modifiers(Key::character("b"), Modifiers::CTRL);
        assert_eq!(
            handle_keydown_with_bindings(&mut editor, &config, bold, Range::new(0, 5)),
            KeydownResult::Handled
        );
        assert_eq!(editor.content(), "**hello**");

        let left = KeyCombo::new(Key::ArrowLeft);
        assert_eq!(
            handle_keydown_with_bindings(&mut editor, &config, left, Range::caret(0)),
            KeydownResult::PassThrough
        );
        let typed = KeyCombo::new(Key::character("x"));
        assert_eq!(
            handle_keydown_with_bindings(&mut editor, &config, typed, Range::caret(0)),
            KeydownResult::NotHandled
        );
    }
}
