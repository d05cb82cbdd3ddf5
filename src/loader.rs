//! Opening mesh resources and running the parser over them.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::{de, LookaheadReader, MeshBuffers, MeshSink, ParseOptions, ParseOutcome, PlyError};

/// Where mesh bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl fmt::Display for MeshSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshSource::Path(path) => write!(f, "{}", path.display()),
            MeshSource::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// Parses meshes from a [`MeshSource`].
///
/// Every operation opens its own stream and drops it before returning, on
/// success and on failure alike.
#[derive(Debug, Clone)]
pub struct MeshLoader {
    source: MeshSource,
}

impl MeshLoader {
    pub fn new(source: MeshSource) -> Self {
        Self { source }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::new(MeshSource::Path(path.as_ref().to_path_buf()))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(MeshSource::Bytes(bytes.into()))
    }

    /// Whether the resource looks like the text format.
    #[tracing::instrument(skip_all, fields(source = %self.source))]
    pub fn is_text_format(&self) -> Result<bool, PlyError> {
        let mut reader = LookaheadReader::new(self.open().inspect_err(log_failure)?);
        Ok(de::is_text_format(&mut reader)?)
    }

    #[tracing::instrument(skip_all, fields(source = %self.source))]
    pub fn decode(&self, options: &ParseOptions) -> Result<Option<MeshBuffers>, PlyError> {
        let reader = self.open().inspect_err(log_failure)?;
        crate::decode(reader, options)
    }

    #[tracing::instrument(skip_all, fields(source = %self.source))]
    pub fn parse<S: MeshSink + ?Sized>(
        &self,
        options: &ParseOptions,
        sink: &mut S,
    ) -> Result<ParseOutcome, PlyError> {
        let reader = self.open().inspect_err(log_failure)?;
        crate::parse(reader, options, sink)
    }

    fn open(&self) -> Result<Box<dyn Read + '_>, PlyError> {
        match &self.source {
            MeshSource::Path(path) => {
                debug!("Opening {}", path.display());
                let file = File::open(path).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => PlyError::NotFound { path: path.clone() },
                    _ => PlyError::Io(e),
                })?;
                if !file.metadata()?.is_file() {
                    return Err(PlyError::NotAFile { path: path.clone() });
                }
                Ok(Box::new(file))
            }
            MeshSource::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
        }
    }
}

fn log_failure(e: &PlyError) {
    error!(kind = ?e.kind(), "Mesh loading failed: {e}");
}
