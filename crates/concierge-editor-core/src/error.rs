//! Error types for editor operations.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// A command or token name that does not name anything we know.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseTokenError {
    #[error("unknown text format {0:?}")]
    #[diagnostic(
        code(editor::format),
        help("expected one of: bold, italic, underline, h1, h2, bullet")
    )]
    Format(String),

    #[error("unknown alignment {0:?}")]
    #[diagnostic(
        code(editor::align),
        help("expected one of: left, center, right, justify")
    )]
    Alignment(String),

    #[error("unknown image position {0:?}")]
    #[diagnostic(
        code(editor::image_position),
        help("expected one of: left, center, right, full")
    )]
    ImagePosition(String),
}

/// Errors from the image-insertion dialog.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum DialogError {
    /// The selected file could not be read.
    #[error("failed to read image {}", path.display())]
    #[diagnostic(code(editor::image_read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selected file is empty.
    #[error("image {} is empty", path.display())]
    #[diagnostic(code(editor::image_empty))]
    Empty { path: PathBuf },
}

/// Any failure surfaced by an editor session.
#[derive(Error, Debug, Diagnostic)]
pub enum EditorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Token(#[from] ParseTokenError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dialog(#[from] DialogError),

    #[error("no image at index {index} (session has {len})")]
    #[diagnostic(code(editor::image_index))]
    ImageIndex { index: usize, len: usize },
}
