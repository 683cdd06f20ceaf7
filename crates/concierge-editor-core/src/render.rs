//! HTML preview of page content.
//!
//! Renders the concierge micro-format (headings, bullets, inline emphasis,
//! alignment blocks and image placeholders) to the HTML the guest pages show.
//! Text is escaped before any markup is inserted, so content can never inject
//! tags of its own.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Document, Node};
use crate::format::Alignment;
use crate::types::ImageDescriptor;

/// Resolves image URLs to actual paths.
///
/// Content may reference images by storage key. This trait maps those to
/// CDN URLs; data URLs from the image dialog pass through unchanged.
pub trait ImageResolver {
    /// Resolve an image URL to the URL the preview should load.
    ///
    /// Returns `Some(resolved_url)` if the image is found,
    /// `None` to use the original URL unchanged.
    fn resolve_image_url(&self, url: &str) -> Option<String>;
}

/// Unit type implementation - no image resolution.
impl ImageResolver for () {
    fn resolve_image_url(&self, _url: &str) -> Option<String> {
        None
    }
}

impl<T: ImageResolver> ImageResolver for &T {
    fn resolve_image_url(&self, url: &str) -> Option<String> {
        (*self).resolve_image_url(url)
    }
}

static ALIGN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ALIGN:([A-Za-z]+)\]|\[/ALIGN\]").expect("align regex is valid"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex is valid"));
static UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.+?)__").expect("underline regex is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+?)\*").expect("italic regex is valid"));

enum Event<'a> {
    Text(&'a str),
    AlignOpen(Alignment),
    AlignClose,
    Image(usize),
    InlineImage(&'a ImageDescriptor),
}

/// Renders content plus its image list to HTML.
pub struct PreviewRenderer<'a, R = ()> {
    images: &'a [ImageDescriptor],
    resolver: R,
}

impl<'a> PreviewRenderer<'a, ()> {
    pub fn new(images: &'a [ImageDescriptor]) -> Self {
        Self {
            images,
            resolver: (),
        }
    }
}

impl<'a, R: ImageResolver> PreviewRenderer<'a, R> {
    pub fn with_resolver<R2: ImageResolver>(self, resolver: R2) -> PreviewRenderer<'a, R2> {
        PreviewRenderer {
            images: self.images,
            resolver,
        }
    }

    pub fn render(&self, content: &str) -> String {
        let doc = Document::parse(content);
        let mut out = BlockWriter::default();
        let mut depth = 0usize;

        for event in events(&doc) {
            match event {
                Event::Text(text) => {
                    for line in text.split('\n') {
                        out.line(line);
                    }
                }
                Event::AlignOpen(alignment) => {
                    out.flush();
                    out.push(format!(r#"<div style="text-align: {alignment}">"#));
                    depth += 1;
                }
                Event::AlignClose if depth == 0 => {
                    tracing::debug!("unmatched alignment close token");
                    out.line("[/ALIGN]");
                }
                Event::AlignClose => {
                    out.flush();
                    out.push("</div>".to_string());
                    depth -= 1;
                }
                Event::Image(index) => {
                    out.flush();
                    match self.images.get(index) {
                        Some(image) => out.push(self.figure(image)),
                        None => {
                            tracing::debug!(index, "placeholder without image");
                            out.push(format!(
                                r#"<span class="image-missing">[IMAGE_{index}]</span>"#
                            ));
                        }
                    }
                }
                Event::InlineImage(image) => {
                    out.flush();
                    out.push(self.figure(image));
                }
            }
        }

        out.flush();
        for _ in 0..depth {
            out.push("</div>".to_string());
        }
        out.finish()
    }

    fn figure(&self, image: &ImageDescriptor) -> String {
        let src = self
            .resolver
            .resolve_image_url(&image.url)
            .unwrap_or_else(|| image.url.clone());
        let src = html_escape::encode_double_quoted_attribute(&src);
        let width = html_escape::encode_double_quoted_attribute(image.width.as_str());

        match image.caption.as_deref() {
            Some(caption) => format!(
                r#"<figure class="image image-{}" style="width: {}"><img src="{}" alt="{}"><figcaption>{}</figcaption></figure>"#,
                image.position,
                width,
                src,
                html_escape::encode_double_quoted_attribute(caption),
                html_escape::encode_text(caption),
            ),
            None => format!(
                r#"<figure class="image image-{}" style="width: {}"><img src="{}" alt=""></figure>"#,
                image.position, width, src,
            ),
        }
    }
}

/// Render with no resolver.
pub fn render_preview(content: &str, images: &[ImageDescriptor]) -> String {
    PreviewRenderer::new(images).render(content)
}

fn events(doc: &Document) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    for node in doc.nodes() {
        match node {
            Node::Text(text) => split_align(text, &mut events),
            Node::Image(index) => events.push(Event::Image(*index)),
            Node::InlineImage(image) => events.push(Event::InlineImage(image)),
        }
    }
    events
}

fn split_align<'a>(text: &'a str, events: &mut Vec<Event<'a>>) {
    let mut last = 0;
    for caps in ALIGN_TOKEN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let event = match caps.get(1) {
            Some(name) => match name.as_str().parse::<Alignment>() {
                Ok(alignment) => Event::AlignOpen(alignment),
                // Unknown alignment names render as literal text.
                Err(_) => continue,
            },
            None => Event::AlignClose,
        };
        if whole.start() > last {
            events.push(Event::Text(&text[last..whole.start()]));
        }
        events.push(event);
        last = whole.end();
    }
    if last < text.len() {
        events.push(Event::Text(&text[last..]));
    }
}

fn render_inline(text: &str) -> String {
    let escaped = html_escape::encode_text(text);
    let html = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let html = UNDERLINE.replace_all(&html, "<u>$1</u>");
    ITALIC.replace_all(&html, "<em>$1</em>").into_owned()
}

/// Groups lines into paragraphs, lists and headings.
#[derive(Default)]
struct BlockWriter {
    blocks: Vec<String>,
    paragraph: Vec<String>,
    list: Vec<String>,
}

impl BlockWriter {
    fn line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.flush();
        } else if let Some(heading) = line.strip_prefix("## ") {
            self.flush();
            self.push(format!("<h2>{}</h2>", render_inline(heading.trim())));
        } else if let Some(heading) = line.strip_prefix("# ") {
            self.flush();
            self.push(format!("<h1>{}</h1>", render_inline(heading.trim())));
        } else if let Some(item) = line.strip_prefix("- ") {
            self.flush_paragraph();
            self.list.push(render_inline(item.trim()));
        } else {
            self.flush_list();
            self.paragraph.push(render_inline(line.trim()));
        }
    }

    fn push(&mut self, block: String) {
        self.blocks.push(block);
    }

    fn flush(&mut self) {
        self.flush_list();
        self.flush_paragraph();
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let block = format!("<p>{}</p>", self.paragraph.join("<br>"));
            self.paragraph.clear();
            self.blocks.push(block);
        }
    }

    fn flush_list(&mut self) {
        if !self.list.is_empty() {
            let items: String = self.list.drain(..).map(|i| format!("<li>{i}</li>")).collect();
            self.blocks.push(format!("<ul>{items}</ul>"));
        }
    }

    fn finish(self) -> String {
        self.blocks.join("\n")
    }
}
