//! Structured view of page content.
//!
//! Content is stored and exchanged as a flat string with embedded image
//! tokens. Edits that touch images (deletion, renumbering, folding inline
//! images) parse it into an ordered node list, operate on the nodes, and
//! flatten back, so placeholders are never rewritten by substring search.
//!
//! Token forms:
//! - `[IMAGE_<n>]` refers to entry `n` (0-based) of the image list.
//! - `[IMAGE:<url>:<position>:<caption>]` carries a whole descriptor inline.
//!   The url may itself contain `:`; position and caption may not.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ImageDescriptor, ImagePosition};

static IMAGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[IMAGE_(\d+)\]|\[IMAGE:([^\]\n]+)\]").expect("image token regex is valid")
});

/// One piece of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Plain text, including any formatting tokens.
    Text(String),
    /// An `[IMAGE_<n>]` placeholder.
    Image(usize),
    /// An `[IMAGE:<url>:<position>:<caption>]` token not yet folded into the list.
    InlineImage(ImageDescriptor),
}

/// Content parsed into text runs and image references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Parse content. Tokens that do not parse (bad position, index too
    /// large for `usize`) stay as text.
    pub fn parse(content: &str) -> Self {
        let mut doc = Document::default();
        let mut last = 0;

        for caps in IMAGE_TOKEN.captures_iter(content) {
            let Some(whole) = caps.get(0) else { continue };

            let node = if let Some(index) = caps.get(1) {
                index.as_str().parse().ok().map(Node::Image)
            } else {
                caps.get(2)
                    .and_then(|body| parse_inline(body.as_str()))
                    .map(Node::InlineImage)
            };

            if let Some(node) = node {
                doc.push_text(&content[last..whole.start()]);
                doc.nodes.push(node);
                last = whole.end();
            }
        }
        doc.push_text(&content[last..]);
        doc
    }

    /// Flatten back to the token string.
    pub fn to_content(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Image(index) => out.push_str(&placeholder(*index)),
                Node::InlineImage(image) => out.push_str(&inline_token(image)),
            }
        }
        out
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Indices referenced by `[IMAGE_<n>]` placeholders, in document order.
    pub fn image_refs(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter_map(|n| match n {
            Node::Image(i) => Some(*i),
            _ => None,
        })
    }

    /// Drop every placeholder for `index` and shift higher placeholders
    /// down by one. Returns how many placeholders were dropped.
    pub fn remove_image(&mut self, index: usize) -> usize {
        let removed = self.strip_image(index);
        for node in &mut self.nodes {
            if let Node::Image(i) = node {
                if *i > index {
                    *i -= 1;
                }
            }
        }
        removed
    }

    /// Drop every placeholder for `index`, leaving other placeholders as
    /// they are. Returns how many were dropped.
    pub fn strip_image(&mut self, index: usize) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| !matches!(n, Node::Image(i) if *i == index));
        let removed = before - self.nodes.len();
        self.merge_text();
        removed
    }

    /// Replace inline image tokens with placeholders, appending each
    /// descriptor to `images`. Returns how many were folded.
    pub fn fold_inline_images(&mut self, images: &mut Vec<ImageDescriptor>) -> usize {
        let mut folded = 0;
        for node in &mut self.nodes {
            if let Node::InlineImage(image) = node {
                images.push(image.clone());
                *node = Node::Image(images.len() - 1);
                folded += 1;
            }
        }
        folded
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.nodes.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(text),
            _ => self.nodes.push(Node::Text(text.to_string())),
        }
    }

    fn merge_text(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        for node in nodes {
            match node {
                Node::Text(text) => self.push_text(&text),
                other => self.nodes.push(other),
            }
        }
    }
}

/// `[IMAGE_<index>]`
pub fn placeholder(index: usize) -> String {
    format!("[IMAGE_{index}]")
}

/// `[IMAGE:<url>:<position>:<caption>]`
pub fn inline_token(image: &ImageDescriptor) -> String {
    format!(
        "[IMAGE:{}:{}:{}]",
        image.url,
        image.position,
        image.caption.as_deref().unwrap_or("")
    )
}

fn parse_inline(body: &str) -> Option<ImageDescriptor> {
    let mut parts = body.rsplitn(3, ':');
    let caption = parts.next()?;
    let position: ImagePosition = parts.next()?.parse().ok()?;
    let url = parts.next()?;
    if url.trim().is_empty() {
        return None;
    }
    Some(
        ImageDescriptor::new(url.trim())
            .with_position(position)
            .with_caption(caption.trim()),
    )
}
