use std::io::BufRead;

use tracing::{debug, info};

use crate::de::val_reader::AsciiRow;
use crate::header::{ElementRole, LineReader, PropertySchema, TextHeader};
use crate::mesh::{filled, identity_indices, MeshBuffers};
use crate::PlyError;

const COORDS: [&str; 3] = ["x", "y", "z"];
const COLORS: [&str; 3] = ["red", "green", "blue"];

/// Coordinate used when the vertex element does not declare an axis.
const DEFAULT_COORD: f32 = 1.0;
/// Full channel intensity; also the alpha of every face corner.
const FULL_CHANNEL: f32 = 255.0;

/// Decode a text mesh: two preamble lines, the header, then data rows.
///
/// Returns `Ok(None)` when the header declares no elements at all.
pub fn decode_text<R: BufRead>(reader: R) -> Result<Option<MeshBuffers>, PlyError> {
    info!("Reading text mesh");
    let mut lines = LineReader::new(reader);

    // Magic and format lines, not validated.
    lines.advance()?;
    lines.advance()?;

    let header = TextHeader::from_lines(&mut lines)?;
    if header.elements.is_empty() {
        debug!("Header declares no elements");
        return Ok(None);
    }

    let vertex_count = header.count(ElementRole::Vertex);
    let face_count = header.count(ElementRole::Face);
    debug!(
        elements = header.elements.len(),
        vertex_count, face_count, "Parsed text header"
    );

    let mut vertices = VertexTable::allocate(vertex_count)?;
    let mut faces = FaceTable::allocate(face_count)?;

    let mut element = next_populated(&header, 0);
    let mut row = 0;
    while element < header.elements.len() {
        let Some(values) = lines.next_row()? else {
            break;
        };
        if values.is_empty() {
            continue;
        }

        let spec = &header.elements[element];
        match ElementRole::at(element) {
            Some(ElementRole::Vertex) => vertices.decode_row(row, &values, &spec.schema)?,
            Some(ElementRole::Face) => faces.decode_row(row, &values, &vertices)?,
            None => {}
        }

        row += 1;
        if row == spec.count {
            element = next_populated(&header, element + 1);
            row = 0;
        }
    }

    if header.elements.len() < 2 && has_more_rows(&mut lines)? {
        return Err(PlyError::MissingFaceElement);
    }

    let mesh = MeshBuffers {
        indices: identity_indices(vertex_count)?,
        positions: vertices.positions,
        colors: vertices.colors,
        face_positions: faces.positions,
        face_colors: faces.colors,
        normals: Vec::new(),
    };
    info!(vertex_count, face_count, "Decoded text mesh");
    Ok(Some(mesh))
}

/// First element at or after `from` that declares at least one row.
fn next_populated(header: &TextHeader, from: usize) -> usize {
    (from..header.elements.len())
        .find(|&i| header.elements[i].count > 0)
        .unwrap_or(header.elements.len())
}

fn has_more_rows<R: BufRead>(lines: &mut LineReader<R>) -> Result<bool, PlyError> {
    while let Some(values) = lines.next_row()? {
        if !values.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn buffer_len(count: usize, stride: usize) -> Result<usize, PlyError> {
    count.checked_mul(stride).ok_or(PlyError::CountOverflow)
}

struct VertexTable {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl VertexTable {
    fn allocate(count: usize) -> Result<Self, PlyError> {
        let len = buffer_len(count, 3)?;
        Ok(Self {
            positions: filled(len, 0.0)?,
            colors: filled(len, FULL_CHANNEL)?,
        })
    }

    fn decode_row(
        &mut self,
        row: usize,
        values: &AsciiRow,
        schema: &PropertySchema,
    ) -> Result<(), PlyError> {
        let base = row * 3;
        for (i, name) in COORDS.iter().enumerate() {
            self.positions[base + i] = match schema.column(name) {
                Some(column) => values.read_f32(column)?,
                None => DEFAULT_COORD,
            };
        }

        // Color columns are only looked at when the row carries more than xyz.
        if values.len() > 3 {
            for (i, name) in COLORS.iter().enumerate() {
                self.colors[base + i] = match schema.column(name) {
                    Some(column) => values.read_f32(column)?,
                    None => FULL_CHANNEL,
                };
            }
        }
        Ok(())
    }

    fn count(&self) -> usize {
        self.positions.len() / 3
    }

    fn resolve(&self, index: i64) -> Result<usize, PlyError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.count())
            .ok_or(PlyError::VertexIndexOutOfRange {
                index,
                vertex_count: self.count(),
            })
    }
}

struct FaceTable {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl FaceTable {
    fn allocate(count: usize) -> Result<Self, PlyError> {
        Ok(Self {
            positions: filled(buffer_len(count, 9)?, 0.0)?,
            colors: filled(buffer_len(count, 12)?, 0.0)?,
        })
    }

    /// Expand one triangle into per-corner positions and colors.
    fn decode_row(
        &mut self,
        row: usize,
        values: &AsciiRow,
        vertices: &VertexTable,
    ) -> Result<(), PlyError> {
        // Column 0 is the corner count; every face is taken as a triangle.
        for corner in 0..3 {
            let vertex = vertices.resolve(values.read_int::<i64>(corner + 1)?)?;
            let src = vertex * 3;

            let pos = row * 9 + corner * 3;
            self.positions[pos..pos + 3].copy_from_slice(&vertices.positions[src..src + 3]);

            let col = row * 12 + corner * 4;
            self.colors[col..col + 3].copy_from_slice(&vertices.colors[src..src + 3]);
            self.colors[col + 3] = FULL_CHANNEL;
        }
        Ok(())
    }
}
