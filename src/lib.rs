//! Triangle mesh parser for a header-plus-rows text format and a fixed-layout
//! binary facet format.
//!
//! Both decoders produce flat `f32` buffers ready to upload for rendering. The
//! format is either detected from the first bytes of the stream or forced by
//! the caller, and exactly one decoder runs per call.
//!
//! # Example
//!
//! ```rust
//! use plymesh::{ParseMode, ParseOptions};
//!
//! let ply_data = r#"ply
//! format ascii 1.0
//! element vertex 3
//! property float x
//! property float y
//! property float z
//! element face 1
//! property list uchar int vertex_indices
//! end_header
//! 0 0 0
//! 1 0 0
//! 0 1 0
//! 3 0 1 2
//! "#;
//!
//! let mesh = plymesh::decode(ply_data.as_bytes(), &ParseOptions::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(mesh.face_positions.len(), 9);
//! assert_eq!(mesh.indices, vec![0, 1, 2]);
//! ```

pub mod de;
mod error;
pub mod header;
pub mod loader;
mod mesh;
mod stream;

pub use de::{decode_binary, decode_text, is_text_format};
pub use error::{FailureKind, PlyError};
pub use header::{ElementRole, ElementSpec, PropertySchema, TextHeader};
pub use loader::{MeshLoader, MeshSource};
pub use mesh::{MeshBuffers, MeshSink};
pub use stream::LookaheadReader;

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// How the decoder for a stream is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Sniff the start of the stream.
    #[default]
    Auto,
    Text,
    Binary,
}

/// The decoder that produced a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Text,
    Binary,
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshFormat::Text => write!(f, "text"),
            MeshFormat::Binary => write!(f, "binary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub mode: ParseMode,
    /// Bytes inspected by [`ParseMode::Auto`].
    pub lookahead: usize,
    /// Passed through to [`MeshSink::set_data`].
    pub create_buffers: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::Auto,
            lookahead: de::SNIFF_WINDOW,
            create_buffers: false,
        }
    }
}

impl ParseOptions {
    pub fn with_mode(mode: ParseMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

/// Result of a parse that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The sink received a mesh.
    Delivered(MeshFormat),
    /// The text header declared no elements; the sink was not called.
    NoData,
}

/// Select a decoder for `reader` and run it.
///
/// Returns the format that was decoded along with the buffers, or `None` for a
/// text header without elements. Failures are logged before they are returned.
pub fn decode_with_format<R: Read>(
    reader: R,
    options: &ParseOptions,
) -> Result<Option<(MeshFormat, MeshBuffers)>, PlyError> {
    select_and_decode(reader, options)
        .inspect_err(|e| error!(kind = ?e.kind(), "Mesh parsing failed: {e}"))
}

fn select_and_decode<R: Read>(
    reader: R,
    options: &ParseOptions,
) -> Result<Option<(MeshFormat, MeshBuffers)>, PlyError> {
    let mut reader = LookaheadReader::new(reader);

    let format = match options.mode {
        ParseMode::Text => MeshFormat::Text,
        ParseMode::Binary => MeshFormat::Binary,
        ParseMode::Auto => {
            if de::is_text_format_within(&mut reader, options.lookahead)? {
                MeshFormat::Text
            } else {
                MeshFormat::Binary
            }
        }
    };
    info!(mode = ?options.mode, %format, "Selected mesh decoder");

    let mesh = match format {
        MeshFormat::Text => decode_text(&mut reader)?,
        MeshFormat::Binary => Some(decode_binary(&mut reader)?),
    };
    Ok(mesh.map(|mesh| (format, mesh)))
}

/// Decode a mesh from `reader` without a sink.
pub fn decode<R: Read>(
    reader: R,
    options: &ParseOptions,
) -> Result<Option<MeshBuffers>, PlyError> {
    Ok(decode_with_format(reader, options)?.map(|(_, mesh)| mesh))
}

/// Decode a mesh and hand it to `sink`.
///
/// The sink is called at most once, and only after the whole stream decoded
/// successfully.
pub fn parse<R: Read, S: MeshSink + ?Sized>(
    reader: R,
    options: &ParseOptions,
    sink: &mut S,
) -> Result<ParseOutcome, PlyError> {
    match decode_with_format(reader, options)? {
        Some((format, mesh)) => {
            sink.set_data(mesh, options.create_buffers);
            Ok(ParseOutcome::Delivered(format))
        }
        None => Ok(ParseOutcome::NoData),
    }
}
