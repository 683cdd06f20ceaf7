//! Host callbacks.
//!
//! The editor never persists anything. It reports content changes and image
//! descriptors to the embedding application, which decides when to save.

use std::cell::RefCell;

use concierge_common::notify::{Notice, Notifier};

use crate::types::ImageDescriptor;

/// Callbacks the embedding application provides to an editor session.
pub trait EditorHost: Notifier {
    /// The live content changed.
    fn on_change(&mut self, content: &str);

    /// The descriptor at `index` was added or needs to be re-synced.
    fn on_image_add(&mut self, index: usize, image: &ImageDescriptor);
}

/// Unit type implementation - a detached session with no host.
impl EditorHost for () {
    fn on_change(&mut self, _content: &str) {}

    fn on_image_add(&mut self, _index: usize, _image: &ImageDescriptor) {}
}

/// Host that records every callback. Used by tests and the CLI preview.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub changes: Vec<String>,
    pub images: Vec<(usize, ImageDescriptor)>,
    pub notices: RefCell<Vec<Notice>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last content reported through `on_change`.
    pub fn last_change(&self) -> Option<&str> {
        self.changes.last().map(String::as_str)
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Forget recorded image broadcasts.
    pub fn clear_images(&mut self) {
        self.images.clear();
    }
}

impl Notifier for RecordingHost {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

impl EditorHost for RecordingHost {
    fn on_change(&mut self, content: &str) {
        self.changes.push(content.to_string());
    }

    fn on_image_add(&mut self, index: usize, image: &ImageDescriptor) {
        self.images.push((index, image.clone()));
    }
}
