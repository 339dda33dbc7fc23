//! Document — an [`Editor`] tied to an optional file on disk.
//!
//! Loading decodes the file as UTF-8 and feeds it through
//! [`Editor::load`], so the cursor starts at the top and the document starts
//! clean. Files that are not valid UTF-8 (binary files, Latin-1 text) are
//! refused with [`DocumentError::InvalidUtf8`]. A path that does not exist yet is created empty, which lets
//! `gled newfile.txt` start a new file.
//!
//! Saving writes [`Editor::contents`] verbatim. Rows are separated by exactly
//! the `\n` chars in the text; no line-ending translation happens in either
//! direction.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::editor::Editor;
use crate::options::EditorOptions;

/// Shown in place of a file name for documents that were never saved.
pub const UNTITLED: &str = "[Untitled]";

/// Failure to read or write a document's file.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8", .path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("no file name")]
    NoPath,
}

impl DocumentError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One open file (or untitled scratch text).
#[derive(Debug, Clone, Default)]
pub struct Document {
    editor: Editor,
    path: Option<PathBuf>,
}

impl Document {
    /// Untitled, empty document.
    #[must_use]
    pub fn new(options: EditorOptions) -> Self {
        Self {
            editor: Editor::with_options(options),
            path: None,
        }
    }

    /// Open `path`, creating it empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the file cannot be read or created,
    /// and [`DocumentError::InvalidUtf8`] if its bytes are not UTF-8.
    pub fn open(path: impl AsRef<Path>, options: EditorOptions) -> Result<Self, DocumentError> {
        let mut doc = Self::new(options);
        doc.load(path.as_ref())?;
        Ok(doc)
    }

    /// Load `path` into this document at the cursor and adopt it as the
    /// document's file. Returns the number of chars loaded.
    ///
    /// Intended for an empty document; the window reuses an empty active
    /// document this way instead of opening a second one.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn load(&mut self, path: &Path) -> Result<usize, DocumentError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::File::create(path).map_err(|e| DocumentError::io(path, e))?;
                debug!(path = %path.display(), "created new file");
                Vec::new()
            }
            Err(e) => return Err(DocumentError::io(path, e)),
        };
        let text = String::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8 {
            path: path.to_path_buf(),
        })?;

        let chars = self.editor.load(&text);
        self.path = Some(path.to_path_buf());
        info!(path = %path.display(), chars, rows = self.editor.num_rows(), "opened");
        Ok(chars)
    }

    /// Write the text to the document's file. Returns bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NoPath`] for an untitled document, or
    /// [`DocumentError::Io`] if the write fails.
    pub fn save(&mut self) -> Result<usize, DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::NoPath)?;
        self.write_to(&path)
    }

    /// Write the text to `path` and make it the document's file. Returns
    /// bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the write fails. The stored path is
    /// left unchanged in that case.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<usize, DocumentError> {
        let path = path.as_ref();
        let written = self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        Ok(written)
    }

    fn write_to(&mut self, path: &Path) -> Result<usize, DocumentError> {
        let text = self.editor.contents();
        fs::write(path, &text).map_err(|e| DocumentError::io(path, e))?;
        self.editor.mark_saved();
        info!(path = %path.display(), bytes = text.len(), "saved");
        Ok(text.len())
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    #[inline]
    pub const fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn is_untitled(&self) -> bool {
        self.path.is_none()
    }

    /// The path as given when opened or saved, or [`UNTITLED`].
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| UNTITLED.to_string(), |p| p.display().to_string())
    }
}
