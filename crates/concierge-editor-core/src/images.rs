//! The image list of an editor session.
//!
//! Index `n` of the list is the target of every `[IMAGE_<n>]` placeholder in
//! the content. Edits broadcast the whole list back to the host rather than a
//! diff, so the host never has to track indices itself.

use concierge_common::notify::Notice;

use crate::document::Document;
use crate::host::EditorHost;
use crate::types::{ImageDescriptor, ImagePosition, normalize_width};

/// Outcome of [`ImageControls::delete`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageDeletion {
    /// Content with the placeholder removed and later placeholders renumbered.
    pub content: String,
    /// The removed descriptor, if the index existed.
    pub removed: Option<ImageDescriptor>,
    /// How many `[IMAGE_<index>]` placeholders were stripped.
    pub placeholders: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageControls {
    images: Vec<ImageDescriptor>,
}

impl ImageControls {
    pub fn new(images: Vec<ImageDescriptor>) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &[ImageDescriptor] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&ImageDescriptor> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub(crate) fn images_mut(&mut self) -> &mut Vec<ImageDescriptor> {
        &mut self.images
    }

    /// Append a descriptor and return its index.
    pub fn push<H: EditorHost>(&mut self, image: ImageDescriptor, host: &mut H) -> usize {
        self.images.push(image);
        let index = self.images.len() - 1;
        host.on_image_add(index, &self.images[index]);
        index
    }

    pub fn set_position<H: EditorHost>(
        &mut self,
        index: usize,
        position: ImagePosition,
        host: &mut H,
    ) -> bool {
        let Some(image) = self.images.get_mut(index) else {
            tracing::warn!(index, len = self.images.len(), "position change for unknown image");
            return false;
        };
        image.position = position;
        self.broadcast(host);
        host.notify(Notice::success("Image position updated"));
        true
    }

    /// Set the display width. Accepts `"50"` or `"50%"`; anything that is
    /// not a percentage in 1..=100 is rejected.
    pub fn set_width<H: EditorHost>(&mut self, index: usize, width: &str, host: &mut H) -> bool {
        let Some(width) = normalize_width(width) else {
            tracing::warn!(index, width, "rejecting image width");
            return false;
        };
        let Some(image) = self.images.get_mut(index) else {
            tracing::warn!(index, len = self.images.len(), "width change for unknown image");
            return false;
        };
        image.width = width;
        self.broadcast(host);
        true
    }

    /// Set or clear (empty string) the caption.
    pub fn set_caption<H: EditorHost>(&mut self, index: usize, caption: &str, host: &mut H) -> bool {
        let Some(image) = self.images.get_mut(index) else {
            tracing::warn!(index, len = self.images.len(), "caption change for unknown image");
            return false;
        };
        image.caption = (!caption.is_empty()).then(|| caption.to_string());
        self.broadcast(host);
        true
    }

    /// Remove image `index` from both the list and `content`.
    ///
    /// The new content and list are both computed before either is
    /// committed. Placeholders above `index` shift down by one and each
    /// shifted descriptor is re-broadcast under its new index. An index past
    /// the end leaves the list and every other placeholder alone, stripping
    /// only placeholders for `index` itself.
    pub fn delete<H: EditorHost>(&mut self, index: usize, content: &str, host: &mut H) -> ImageDeletion {
        let mut doc = Document::parse(content);
        let known = index < self.images.len();
        let placeholders = if known {
            doc.remove_image(index)
        } else {
            doc.strip_image(index)
        };
        let content = doc.to_content();

        let removed = known.then(|| self.images.remove(index));

        if removed.is_some() {
            for (i, image) in self.images.iter().enumerate().skip(index) {
                host.on_image_add(i, image);
            }
            host.notify(Notice::success("Image deleted"));
        } else {
            tracing::debug!(index, placeholders, "deleting unknown image");
        }

        ImageDeletion {
            content,
            removed,
            placeholders,
        }
    }

    /// Replace the whole list, e.g. from an undo snapshot, and re-sync the
    /// host with every entry.
    pub fn restore<H: EditorHost>(&mut self, images: &[ImageDescriptor], host: &mut H) {
        if self.images == images {
            return;
        }
        self.images = images.to_vec();
        self.broadcast(host);
    }

    fn broadcast<H: EditorHost>(&self, host: &mut H) {
        for (i, image) in self.images.iter().enumerate() {
            host.on_image_add(i, image);
        }
    }
}
