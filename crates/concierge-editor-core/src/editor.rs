//! One editing session over a page's content.
//!
//! `EditorState` owns the text, its undo history, the image list and the UI
//! flags. Every mutation goes through `&mut self`, so a session has exactly
//! one writer at a time.

use concierge_common::config::EditorConfig;
use smol_str::SmolStr;

use crate::document::{Document, placeholder};
use crate::error::EditorError;
use crate::format::{Alignment, TextFormat, apply_alignment, apply_format};
use crate::history::{EditorSnapshot, SnapshotHistory, UndoManager};
use crate::host::EditorHost;
use crate::images::{ImageControls, ImageDeletion};
use crate::render::{ImageResolver, PreviewRenderer};
use crate::text::{EditorRope, TextBuffer};
use crate::types::{ImageDescriptor, ImagePosition, Selection, SelectionSpan};

pub struct EditorState<H> {
    buffer: EditorRope,
    history: SnapshotHistory,
    images: ImageControls,
    selection: Option<Selection>,
    cursor: usize,
    expanded: bool,
    preview_mode: bool,
    default_image_width: SmolStr,
    host: H,
}

impl<H: EditorHost> EditorState<H> {
    /// Open a session on `content`. The initial content and images seed the
    /// history.
    pub fn new(content: &str, images: Vec<ImageDescriptor>, host: H) -> Self {
        Self {
            buffer: EditorRope::from_str(content),
            history: SnapshotHistory::new(EditorSnapshot::new(content, &images)),
            images: ImageControls::new(images),
            selection: None,
            cursor: content.chars().count(),
            expanded: false,
            preview_mode: false,
            default_image_width: SmolStr::new_static("100%"),
            host,
        }
    }

    /// Apply the `[editor]` configuration section.
    pub fn with_config(mut self, config: &EditorConfig) -> Self {
        self.history = self.history.with_limit(config.history_limit);
        self.default_image_width = config.default_image_width.clone();
        self
    }

    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn images(&self) -> &[ImageDescriptor] {
        self.images.images()
    }

    /// The descriptor behind `[IMAGE_<index>]`.
    pub fn image(&self, index: usize) -> Result<&ImageDescriptor, EditorError> {
        self.images.get(index).ok_or(EditorError::ImageIndex {
            index,
            len: self.images.len(),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn default_image_width(&self) -> &SmolStr {
        &self.default_image_width
    }

    // === Content and history ===

    /// Replace the content, tell the host, and record a history snapshot.
    pub fn update_content(&mut self, content: &str) {
        self.set_buffer(content);
        self.update_history(content);
    }

    /// Record `content` and the current image list in history, unless both
    /// match the current snapshot.
    pub fn update_history(&mut self, content: &str) -> bool {
        let snapshot = EditorSnapshot::new(content, self.images.images());
        let recorded = self.history.record(snapshot);
        if recorded {
            tracing::trace!(index = self.history.index(), "recorded snapshot");
        }
        recorded
    }

    /// Restore the previous snapshot. Returns false at the oldest one.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Restore the next snapshot. Returns false when nothing was undone.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Images go first so the host never sees a placeholder without its
    // descriptor.
    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.images.restore(&snapshot.images, &mut self.host);
        self.set_buffer(&snapshot.content);
    }

    fn set_buffer(&mut self, content: &str) {
        self.buffer = EditorRope::from_str(content);
        let len = self.buffer.len_chars();
        self.cursor = self.cursor.min(len);
        self.selection = self.selection.filter(|sel| sel.end() <= len);
        self.host.on_change(content);
    }

    // === UI flags ===

    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn toggle_preview_mode(&mut self) -> bool {
        self.preview_mode = !self.preview_mode;
        self.preview_mode
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_preview_mode(&self) -> bool {
        self.preview_mode
    }

    // === Selection ===

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Track a selection. Selections past the end of the content are
    /// stored as-is; formatting them is a no-op.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        if let Some(sel) = selection {
            self.cursor = sel.head;
        }
        self.selection = selection;
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor_offset(&mut self, offset: usize) {
        self.cursor = offset.min(self.buffer.len_chars());
    }

    /// The selected text, captured fresh from the current content.
    pub fn selection_span(&self) -> Option<SelectionSpan> {
        SelectionSpan::capture(&self.buffer, self.selection?)
    }

    // === Editing ===

    /// Insert `text` at `range`, replacing any selected text.
    pub fn insert_text(&mut self, range: std::ops::Range<usize>, text: &str) -> bool {
        if !self.buffer.try_replace(range.clone(), text) {
            return false;
        }
        self.cursor = range.start + text.chars().count();
        self.selection = None;
        let content = self.buffer.to_string();
        self.host.on_change(&content);
        self.update_history(&content);
        true
    }

    /// Delete `range`. Empty ranges are a no-op.
    pub fn delete_range(&mut self, range: std::ops::Range<usize>) -> bool {
        if range.is_empty() {
            return false;
        }
        self.insert_text(range, "")
    }

    // === Formatting ===

    /// Apply `format` to the tracked selection.
    pub fn format_selection(&mut self, format: TextFormat) -> bool {
        let Some(span) = self.selection_span() else {
            tracing::debug!(%format, "no usable selection to format");
            return false;
        };
        let content = apply_format(&self.content(), format, &span);
        self.commit_formatted(&span, content)
    }

    /// Apply the format named `format`; unknown names are ignored.
    pub fn handle_text_format(&mut self, format: &str) -> bool {
        match format.parse::<TextFormat>() {
            Ok(format) => self.format_selection(format),
            Err(err) => {
                tracing::debug!(%err, "ignoring format command");
                false
            }
        }
    }

    pub fn align_selection(&mut self, alignment: Alignment) -> bool {
        let Some(span) = self.selection_span() else {
            tracing::debug!(%alignment, "no usable selection to align");
            return false;
        };
        let content = apply_alignment(&self.content(), alignment, &span);
        self.commit_formatted(&span, content)
    }

    pub fn handle_text_align(&mut self, alignment: &str) -> bool {
        match alignment.parse::<Alignment>() {
            Ok(alignment) => self.align_selection(alignment),
            Err(err) => {
                tracing::debug!(%err, "ignoring align command");
                false
            }
        }
    }

    fn commit_formatted(&mut self, span: &SelectionSpan, content: String) -> bool {
        let old_len = self.buffer.len_chars();
        let new_len = content.chars().count();
        self.selection = None;
        self.cursor = span.end + new_len.saturating_sub(old_len);
        self.update_content(&content);
        true
    }

    // === Images ===

    /// Append `image` and insert its placeholder at the cursor.
    pub fn insert_image(&mut self, image: ImageDescriptor) -> usize {
        let index = self.images.push(image, &mut self.host);
        let token = placeholder(index);
        let at = self.cursor.min(self.buffer.len_chars());
        self.buffer.insert(at, &token);
        self.cursor = at + token.chars().count();
        self.selection = None;

        let content = self.buffer.to_string();
        self.host.on_change(&content);
        self.update_history(&content);
        tracing::debug!(index, "inserted image");
        index
    }

    pub fn set_image_position(&mut self, index: usize, position: ImagePosition) -> bool {
        let changed = self.images.set_position(index, position, &mut self.host);
        self.record_image_edit(changed)
    }

    pub fn set_image_width(&mut self, index: usize, width: &str) -> bool {
        let changed = self.images.set_width(index, width, &mut self.host);
        self.record_image_edit(changed)
    }

    pub fn set_image_caption(&mut self, index: usize, caption: &str) -> bool {
        let changed = self.images.set_caption(index, caption, &mut self.host);
        self.record_image_edit(changed)
    }

    fn record_image_edit(&mut self, changed: bool) -> bool {
        if changed {
            let content = self.content();
            self.update_history(&content);
        }
        changed
    }

    /// Remove image `index` and its placeholder, renumbering later ones.
    pub fn delete_image(&mut self, index: usize) -> ImageDeletion {
        let content = self.content();
        let deletion = self.images.delete(index, &content, &mut self.host);
        if deletion.content != content {
            self.update_content(&deletion.content);
        } else {
            self.update_history(&content);
        }
        deletion
    }

    /// Turn every `[IMAGE:<url>:<position>:<caption>]` token into an indexed
    /// placeholder backed by a new descriptor. Returns how many were folded.
    pub fn fold_inline_images(&mut self) -> usize {
        let mut doc = Document::parse(&self.content());
        let first = self.images.len();
        let folded = doc.fold_inline_images(self.images.images_mut());
        if folded == 0 {
            return 0;
        }

        let width = self.default_image_width.clone();
        for index in first..self.images.len() {
            if let Some(image) = self.images.images_mut().get_mut(index) {
                image.width = width.clone();
            }
            if let Some(image) = self.images.get(index) {
                self.host.on_image_add(index, image);
            }
        }
        self.update_content(&doc.to_content());
        tracing::debug!(folded, "folded inline images");
        folded
    }

    // === Preview ===

    pub fn render_preview(&self) -> String {
        PreviewRenderer::new(self.images.images()).render(&self.content())
    }

    pub fn render_preview_with<R: ImageResolver>(&self, resolver: R) -> String {
        PreviewRenderer::new(self.images.images())
            .with_resolver(resolver)
            .render(&self.content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    fn editor(content: &str) -> EditorState<RecordingHost> {
        EditorState::new(content, Vec::new(), RecordingHost::new())
    }

    fn urls<H: EditorHost>(ed: &EditorState<H>) -> Vec<&str> {
        ed.images().iter().map(|i| i.url.as_str()).collect()
    }

    fn refs<H: EditorHost>(ed: &EditorState<H>) -> Vec<usize> {
        Document::parse(&ed.content()).image_refs().collect()
    }

    #[test]
    fn test_update_content_notifies_and_records() {
        let mut ed = editor("");
        ed.update_content("a");
        ed.update_content("ab");
        ed.update_content("ab");

        assert_eq!(ed.content(), "ab");
        assert_eq!(ed.history().len(), 3);
        assert_eq!(ed.host().changes, ["a", "ab", "ab"]);
    }

    #[test]
    fn test_undo_redo_restore_content() {
        let mut ed = editor("one");
        ed.update_content("two");
        ed.update_content("three");

        assert!(ed.undo());
        assert_eq!(ed.content(), "two");
        assert!(ed.undo());
        assert!(!ed.undo());
        assert_eq!(ed.content(), "one");
        assert!(ed.redo());
        assert_eq!(ed.content(), "two");

        ed.update_content("branch");
        assert!(!ed.can_redo());
        let contents: Vec<_> = ed
            .history()
            .snapshots()
            .iter()
            .map(|s| s.content.as_str())
            .collect();
        assert_eq!(contents, ["one", "two", "branch"]);
    }

    #[test]
    fn test_toggles_leave_content_alone() {
        let mut ed = editor("text");
        assert!(ed.toggle_expanded());
        assert!(ed.toggle_preview_mode());
        assert!(!ed.toggle_expanded());
        assert_eq!(ed.content(), "text");
        assert_eq!(ed.history().len(), 1);
        assert!(ed.host().changes.is_empty());
    }

    #[test]
    fn test_format_selection_bold() {
        let mut ed = editor("hello world");
        ed.set_selection(Some(Selection::new(0, 5)));
        assert!(ed.format_selection(TextFormat::Bold));
        assert_eq!(ed.content(), "**hello** world");
        assert_eq!(ed.selection(), None);
        assert_eq!(ed.cursor_offset(), 9);
        assert!(ed.can_undo());
    }

    #[test]
    fn test_unknown_format_name_is_noop() {
        let mut ed = editor("hello world");
        ed.set_selection(Some(Selection::new(0, 5)));
        assert!(!ed.handle_text_format("blink"));
        assert_eq!(ed.content(), "hello world");
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_selection_past_end_is_noop() {
        let mut ed = editor("short");
        ed.set_selection(Some(Selection::new(2, 30)));
        assert!(!ed.format_selection(TextFormat::Italic));
        assert_eq!(ed.content(), "short");
    }

    #[test]
    fn test_insert_image_at_cursor() {
        let mut ed = editor("ab");
        ed.set_cursor_offset(1);
        let index = ed.insert_image(ImageDescriptor::new("x.png"));
        assert_eq!(index, 0);
        assert_eq!(ed.content(), "a[IMAGE_0]b");
        assert_eq!(ed.host().images, vec![(0, ImageDescriptor::new("x.png"))]);
    }

    #[test]
    fn test_delete_image_rewrites_content() {
        let mut ed = EditorState::new(
            "[IMAGE_0] [IMAGE_1]",
            vec![ImageDescriptor::new("a.png"), ImageDescriptor::new("b.png")],
            RecordingHost::new(),
        );
        let deletion = ed.delete_image(0);
        assert_eq!(deletion.content, " [IMAGE_0]");
        assert_eq!(ed.content(), " [IMAGE_0]");
        assert_eq!(ed.images().len(), 1);
        assert_eq!(ed.images()[0].url, "b.png");
        assert!(ed.undo());
        assert_eq!(ed.content(), "[IMAGE_0] [IMAGE_1]");
        assert_eq!(urls(&ed), ["a.png", "b.png"]);
    }

    #[test]
    fn test_undo_delete_restores_image_list() {
        let mut ed = EditorState::new(
            "[IMAGE_0][IMAGE_1][IMAGE_2]",
            vec![
                ImageDescriptor::new("a.png"),
                ImageDescriptor::new("b.png"),
                ImageDescriptor::new("c.png"),
            ],
            RecordingHost::new(),
        );
        ed.delete_image(1);
        assert_eq!(refs(&ed), [0, 1]);
        assert_eq!(urls(&ed), ["a.png", "c.png"]);

        ed.host_mut().clear_images();
        assert!(ed.undo());
        assert_eq!(refs(&ed), [0, 1, 2]);
        assert_eq!(urls(&ed), ["a.png", "b.png", "c.png"]);
        // The host is re-synced with the restored list.
        let synced: Vec<_> = ed
            .host()
            .images
            .iter()
            .map(|(i, d)| (*i, d.url.as_str()))
            .collect();
        assert_eq!(synced, [(0, "a.png"), (1, "b.png"), (2, "c.png")]);

        assert!(ed.redo());
        assert_eq!(refs(&ed), [0, 1]);
        assert_eq!(urls(&ed), ["a.png", "c.png"]);
    }

    #[test]
    fn test_undo_insert_drops_image() {
        let mut ed = editor("x");
        ed.insert_image(ImageDescriptor::new("a.png"));
        assert_eq!(ed.content(), "x[IMAGE_0]");

        assert!(ed.undo());
        assert_eq!(ed.content(), "x");
        assert!(ed.images().is_empty());

        assert!(ed.redo());
        assert_eq!(refs(&ed), [0]);
        assert_eq!(urls(&ed), ["a.png"]);
    }

    #[test]
    fn test_image_edits_are_undoable() {
        let mut ed = EditorState::new("[IMAGE_0]", vec![ImageDescriptor::new("a.png")], ());
        assert!(ed.set_image_position(0, ImagePosition::Left));
        assert!(ed.set_image_caption(0, "Spa"));
        assert!(!ed.set_image_width(3, "50%"));
        assert_eq!(ed.history().len(), 3);

        assert!(ed.undo());
        assert_eq!(ed.images()[0].caption, None);
        assert_eq!(ed.images()[0].position, ImagePosition::Left);
        assert!(ed.undo());
        assert_eq!(ed.images()[0].position, ImagePosition::default());
        assert_eq!(ed.content(), "[IMAGE_0]");
    }

    #[test]
    fn test_fold_inline_images_uses_default_width() {
        let config = EditorConfig {
            history_limit: None,
            default_image_width: SmolStr::new("60%"),
        };
        let mut ed = editor("Pool: [IMAGE:https://x.test/p.jpg:full:Pool]").with_config(&config);
        assert_eq!(ed.fold_inline_images(), 1);
        assert_eq!(ed.content(), "Pool: [IMAGE_0]");
        assert_eq!(ed.images()[0].width, "60%");
        assert_eq!(ed.images()[0].position, ImagePosition::Full);
        assert_eq!(ed.host().images.len(), 1);
        assert_eq!(ed.fold_inline_images(), 0);
    }

    #[test]
    fn test_image_lookup_reports_bad_index() {
        let ed = EditorState::new("[IMAGE_0]", vec![ImageDescriptor::new("a.png")], ());
        assert_eq!(ed.image(0).unwrap().url, "a.png");
        let err = ed.image(4).unwrap_err();
        assert!(matches!(err, EditorError::ImageIndex { index: 4, len: 1 }));
        assert_eq!(err.to_string(), "no image at index 4 (session has 1)");
    }

    #[test]
    fn test_render_preview_uses_images() {
        let ed = EditorState::new(
            "# Hi\n[IMAGE_0]",
            vec![ImageDescriptor::new("a.png")],
            (),
        );
        assert_eq!(
            ed.render_preview(),
            "<h1>Hi</h1>\n<figure class=\"image image-center\" style=\"width: 100%\"><img src=\"a.png\" alt=\"\"></figure>"
        );
    }
}
