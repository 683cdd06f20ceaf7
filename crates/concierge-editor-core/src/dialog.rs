//! State of the image-insertion dialog.
//!
//! The dialog collects either a remote URL or a local file. A chosen file is
//! read and turned into a `data:` URL preview that doubles as the image
//! source when the dialog is finished.

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD};
use mime_sniffer::MimeTypeSniffer;
use smol_str::SmolStr;

use crate::error::DialogError;
use crate::types::{ImageDescriptor, ImagePosition};

/// A local file picked in the dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    /// Sniffed from the file's bytes once it has been read.
    pub mime_type: Option<String>,
}

impl SelectedFile {
    fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            name,
            mime_type: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageDialogState {
    pub url: String,
    pub position: ImagePosition,
    pub caption: String,
    /// True when the image comes from a local file rather than `url`.
    pub uploading: bool,
    pub file: Option<SelectedFile>,
    /// `data:<mime>;base64,...` for the selected file.
    pub preview: Option<String>,
}

impl ImageDialogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `path` and decode it into a preview.
    ///
    /// The file reference is stored before reading starts. On failure the
    /// previous preview is cleared and the error is handed back; nothing is
    /// retried.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn handle_image_file_change(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&str, DialogError> {
        let path = path.as_ref();
        self.file = Some(SelectedFile::new(path));
        self.uploading = true;
        self.preview = None;

        let bytes = tokio::fs::read(path).await.map_err(|source| DialogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(DialogError::Empty {
                path: path.to_path_buf(),
            });
        }

        let mime_type = bytes
            .sniff_mime_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        tracing::debug!(%mime_type, size = bytes.len(), "decoded image");

        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));
        if let Some(file) = self.file.as_mut() {
            file.mime_type = Some(mime_type);
        }
        Ok(self.preview.insert(data_url).as_str())
    }

    /// Clear everything and go back to URL mode with a centered image.
    pub fn reset_state(&mut self) {
        *self = Self::default();
    }

    /// The source the dialog would insert: the preview in upload mode, the
    /// trimmed URL otherwise.
    pub fn source(&self) -> Option<&str> {
        let source = if self.uploading {
            self.preview.as_deref()?
        } else {
            self.url.trim()
        };
        (!source.is_empty()).then_some(source)
    }

    /// Build the descriptor and reset the dialog. Returns `None`, leaving the
    /// dialog untouched, while there is no source yet.
    pub fn finish(&mut self, default_width: &SmolStr) -> Option<ImageDescriptor> {
        let image = ImageDescriptor::new(self.source()?)
            .with_position(self.position)
            .with_caption(self.caption.trim())
            .with_width(default_width.clone());
        self.reset_state();
        Some(image)
    }
}
