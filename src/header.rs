use std::collections::HashMap;
use std::io::BufRead;

use crate::de::val_reader::AsciiRow;
use crate::PlyError;

/// Column layout of one element: property name to position within a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySchema {
    columns: HashMap<String, usize>,
    width: usize,
}

impl PropertySchema {
    /// Column of the named property, if the element declares it.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of property lines declared for the element.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// A declared element (e.g. `vertex`, `face`) with its row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub name: String,
    pub count: usize,
    pub schema: PropertySchema,
}

/// Meaning of an element, taken from its declaration position rather than
/// its name: the first element holds vertices, the second holds faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Vertex,
    Face,
}

impl ElementRole {
    pub fn at(position: usize) -> Option<Self> {
        match position {
            0 => Some(ElementRole::Vertex),
            1 => Some(ElementRole::Face),
            _ => None,
        }
    }
}

/// Element declarations of a text mesh header, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextHeader {
    pub elements: Vec<ElementSpec>,
    pub comments: Vec<String>,
}

/// Element being declared; its schema is still open for new properties.
struct PendingElement {
    name: String,
    count: usize,
    columns: HashMap<String, usize>,
    next_column: usize,
}

impl PendingElement {
    fn finish(self) -> ElementSpec {
        ElementSpec {
            name: self.name,
            count: self.count,
            schema: PropertySchema {
                columns: self.columns,
                width: self.next_column,
            },
        }
    }
}

impl TextHeader {
    /// Parse header lines up to and including the `end_header` line.
    ///
    /// The reader must already be past the `ply` and `format` lines. Running out
    /// of input before `end_header` ends the header at that point.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, PlyError> {
        Self::from_lines(&mut LineReader::after_preamble(reader))
    }

    pub(crate) fn from_lines<R: BufRead>(lines: &mut LineReader<R>) -> Result<Self, PlyError> {
        let mut elements = Vec::new();
        let mut comments = Vec::new();
        let mut current: Option<PendingElement> = None;

        while let Some(row) = lines.next_row()? {
            let line = row.text();
            if line.contains("end_header") {
                break;
            }
            if let Some(comment) = line.strip_prefix("comment") {
                comments.push(comment.trim().to_string());
                continue;
            }

            if line.starts_with("element") {
                if let Some(element) = current.take() {
                    elements.push(element.finish());
                }
                current = Some(PendingElement {
                    name: row.token(1)?.to_string(),
                    count: row.read_int::<usize>(2)?,
                    columns: HashMap::new(),
                    next_column: 0,
                });
            } else if line.starts_with("property") {
                let element = current.as_mut().ok_or_else(|| {
                    PlyError::InvalidHeader("Property without element".to_string())
                })?;

                // property <type> <name> | property list <count_type> <value_type> <name>
                let name = if row.len() == 3 {
                    Some(row.token(2)?)
                } else if line.contains("list") {
                    Some(row.token(4)?)
                } else {
                    None
                };
                if let Some(name) = name {
                    element.columns.insert(name.to_string(), element.next_column);
                }
                element.next_column += 1;
            }
        }

        if let Some(element) = current {
            elements.push(element.finish());
        }

        Ok(TextHeader { elements, comments })
    }

    /// Row count of the element playing `role`, zero when it is not declared.
    pub fn count(&self, role: ElementRole) -> usize {
        let position = match role {
            ElementRole::Vertex => 0,
            ElementRole::Face => 1,
        };
        self.elements.get(position).map_or(0, |e| e.count)
    }
}

/// Line-by-line reader that keeps track of the current line number.
pub(crate) struct LineReader<R> {
    reader: R,
    buf: String,
    number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            number: 0,
        }
    }

    fn after_preamble(reader: R) -> Self {
        Self {
            number: 2,
            ..Self::new(reader)
        }
    }

    /// Read one line without its terminator. Returns false at end of input.
    pub fn advance(&mut self) -> Result<bool, PlyError> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        let trimmed = self.buf.trim_end_matches(&['\n', '\r'][..]).len();
        self.buf.truncate(trimmed);
        self.number += 1;
        Ok(true)
    }

    pub fn next_row(&mut self) -> Result<Option<AsciiRow<'_>>, PlyError> {
        if !self.advance()? {
            return Ok(None);
        }
        Ok(Some(AsciiRow::new(&self.buf, self.number)))
    }
}
