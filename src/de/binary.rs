use std::io::BufRead;

use byteorder::LittleEndian;
use tracing::{info, warn};

use crate::de::val_reader::BinValReader;
use crate::mesh::{identity_indices, MeshBuffers};
use crate::PlyError;

/// Leading bytes of a binary mesh, skipped without inspection.
pub const HEADER_LEN: u64 = 80;
/// Normal, three corners, and the trailing attribute field.
pub const RECORD_LEN: usize = 50;
const ATTRIBUTE_LEN: u64 = 2;
/// Upper bound on facets preallocated from the declared count.
const MAX_PREALLOC_FACETS: usize = 1 << 20;

/// Decode a binary facet list.
///
/// Records are read for as long as the stream has bytes left. The declared
/// facet count only sizes the buffers and the index sequence.
pub fn decode_binary<R: BufRead>(reader: R) -> Result<MeshBuffers, PlyError> {
    info!("Reading binary mesh");
    let mut reader = BinValReader::<_, LittleEndian>::new(reader);

    reader.skip(HEADER_LEN)?;
    let declared = reader.read_i32()?;
    let facet_count =
        usize::try_from(declared).map_err(|_| PlyError::InvalidFacetCount(declared))?;
    let corner_count = facet_count.checked_mul(3).ok_or(PlyError::CountOverflow)?;

    let prealloc = facet_count.min(MAX_PREALLOC_FACETS) * 9;
    let mut positions = Vec::with_capacity(prealloc);
    let mut normals = Vec::with_capacity(prealloc);
    let mut corrupt_normals = 0usize;

    while reader.has_remaining()? {
        let mut normal = [0f32; 3];
        for component in &mut normal {
            *component = reader.read_f32()?;
        }
        if normal.iter().any(|c| !c.is_finite()) {
            warn!(
                facet = positions.len() / 9,
                "Facet normal is NaN or infinite, using zero"
            );
            corrupt_normals += 1;
            normal = [0.0; 3];
        }
        for _ in 0..3 {
            normals.extend_from_slice(&normal);
        }

        for _ in 0..9 {
            positions.push(reader.read_f32()?);
        }
        reader.skip(ATTRIBUTE_LEN)?;
    }

    let decoded = positions.len() / 9;
    if decoded != facet_count {
        info!(
            declared = facet_count,
            decoded, "Facet count differs from record count"
        );
    }
    info!(facets = decoded, corrupt_normals, "Decoded binary mesh");

    Ok(MeshBuffers {
        positions,
        normals,
        indices: identity_indices(corner_count)?,
        ..Default::default()
    })
}
