use std::{
    num::{ParseFloatError, ParseIntError},
    path::PathBuf,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Not a readable file: {}", .path.display())]
    NotAFile { path: PathBuf },

    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    #[error("Error parsing integer: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error("Error parsing float: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    #[error("Line {line} has no column {column}")]
    MissingColumn { line: usize, column: usize },

    #[error("Face references vertex {index} but only {vertex_count} vertices are declared")]
    VertexIndexOutOfRange { index: i64, vertex_count: usize },

    #[error("Rows remain after the vertex element but no face element is declared")]
    MissingFaceElement,

    #[error("Declared element counts overflow the buffer size")]
    CountOverflow,

    #[error("Invalid facet count: {0}")]
    InvalidFacetCount(i32),

    #[error("Binary data ends in the middle of a facet record")]
    Truncated,
}

/// Coarse classification of a failed parse, for callers that only need to
/// decide between retrying, reporting a missing resource, or giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ResourceNotFound,
    UnexpectedValue,
    ReadFailure,
    Generic,
}

impl PlyError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PlyError::NotFound { .. } => FailureKind::ResourceNotFound,
            PlyError::ParseIntError(_) | PlyError::ParseFloatError(_) => {
                FailureKind::UnexpectedValue
            }
            PlyError::Io(_) | PlyError::Truncated => FailureKind::ReadFailure,
            PlyError::NotAFile { .. }
            | PlyError::InvalidHeader(_)
            | PlyError::MissingColumn { .. }
            | PlyError::VertexIndexOutOfRange { .. }
            | PlyError::MissingFaceElement
            | PlyError::CountOverflow
            | PlyError::InvalidFacetCount(_) => FailureKind::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let bad_float = "abc".parse::<f32>().unwrap_err();
        assert_eq!(
            PlyError::from(bad_float).kind(),
            FailureKind::UnexpectedValue
        );

        let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert_eq!(PlyError::from(eof).kind(), FailureKind::ReadFailure);
        assert_eq!(PlyError::Truncated.kind(), FailureKind::ReadFailure);

        let missing = PlyError::NotFound {
            path: PathBuf::from("missing.ply"),
        };
        assert_eq!(missing.kind(), FailureKind::ResourceNotFound);
        assert_eq!(
            PlyError::MissingColumn { line: 3, column: 2 }.kind(),
            FailureKind::Generic
        );
    }
}
