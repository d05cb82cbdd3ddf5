use serde::{Deserialize, Serialize};

use crate::PlyError;

/// Flat render buffers produced by one successful parse.
///
/// Buffers a decoder does not produce are left empty: the binary decoder never
/// fills the color buffers and the text decoder never fills `normals`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    /// xyz per vertex (text) or per facet corner (binary).
    pub positions: Vec<f32>,
    /// xyz per facet corner, binary only.
    pub normals: Vec<f32>,
    /// rgb per vertex, 0-255 range, text only.
    pub colors: Vec<f32>,
    /// xyz for each corner of each face, 9 floats per face.
    pub face_positions: Vec<f32>,
    /// rgba for each corner of each face, 12 floats per face.
    pub face_colors: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.face_positions.len() / 9
    }
}

/// Consumer that takes ownership of the finished buffers.
pub trait MeshSink {
    fn set_data(&mut self, mesh: MeshBuffers, create_buffers: bool);
}

impl MeshSink for Option<MeshBuffers> {
    fn set_data(&mut self, mesh: MeshBuffers, _create_buffers: bool) {
        *self = Some(mesh);
    }
}

/// An empty buffer with room for exactly `len` elements.
///
/// Sizes come from counts declared in the file, so a refused allocation is
/// reported as [`PlyError::CountOverflow`] instead of aborting.
fn reserved<T>(len: usize) -> Result<Vec<T>, PlyError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| PlyError::CountOverflow)?;
    Ok(buf)
}

/// `len` copies of `value`.
pub(crate) fn filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, PlyError> {
    let mut buf = reserved(len)?;
    buf.resize(len, value);
    Ok(buf)
}

/// `0, 1, .., len - 1`.
pub(crate) fn identity_indices(len: usize) -> Result<Vec<u32>, PlyError> {
    let end = u32::try_from(len).map_err(|_| PlyError::CountOverflow)?;
    let mut indices = reserved(len)?;
    indices.extend(0..end);
    Ok(indices)
}
