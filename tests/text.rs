//! Text format decoding through the public entry points.

use plymesh::{FailureKind, MeshBuffers, ParseMode, ParseOptions, PlyError};
use std::io::Cursor;

fn decode_text(data: &str) -> Result<Option<MeshBuffers>, PlyError> {
    plymesh::decode(
        Cursor::new(data),
        &ParseOptions::with_mode(ParseMode::Text),
    )
}

const TRIANGLE: &str = r#"ply
format ascii 1.0
comment single triangle
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0.0 0.0 0.0
1.0 0.0 0.0
0.5 1.0 0.0
3 0 1 2
"#;

#[test]
fn test_single_triangle() {
    let mesh = decode_text(TRIANGLE).unwrap().unwrap();

    assert_eq!(
        mesh.face_positions,
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0]
    );
    assert_eq!(mesh.face_colors, vec![255.0; 12]);
    assert_eq!(mesh.positions, mesh.face_positions);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert!(mesh.normals.is_empty());
}

#[test]
fn test_greg_turk_cube() {
    let ply_data = r#"ply
format ascii 1.0
comment made by Greg Turk
comment this file is a cube
element vertex 8
property float x
property float y
property float z
element face 12
property list uchar int vertex_index
end_header
0 0 0
0 0 1
0 1 1
0 1 0
1 0 0
1 0 1
1 1 1
1 1 0
3 0 1 2
3 0 2 3
3 7 6 5
3 7 5 4
3 0 4 5
3 0 5 1
3 1 5 6
3 1 6 2
3 2 6 7
3 2 7 3
3 3 7 4
3 3 4 0
"#;

    let mesh = decode_text(ply_data).unwrap().unwrap();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 12);
    assert_eq!(mesh.face_positions.len(), 9 * 12);
    assert_eq!(mesh.face_colors.len(), 12 * 12);
    assert_eq!(mesh.indices, (0..8).collect::<Vec<u32>>());

    // Third face is 7 6 5.
    assert_eq!(
        mesh.face_positions[18..27],
        [1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0]
    );
}

#[test]
fn test_missing_z_defaults_to_one() {
    let ply_data = r#"ply
format ascii 1.0
element vertex 2
property float x
property float y
element face 0
end_header
1.5 2.5
-1 -2
"#;

    let mesh = decode_text(ply_data).unwrap().unwrap();
    assert_eq!(mesh.positions, vec![1.5, 2.5, 1.0, -1.0, -2.0, 1.0]);
}

#[test]
fn test_missing_blue_defaults_to_full() {
    let ply_data = r#"ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property uchar red
property uchar green
element face 1
property list uchar int vertex_indices
end_header
0 0 0 10 20
1 0 0 30 40
0 1 0 50 60
3 2 1 0
"#;

    let mesh = decode_text(ply_data).unwrap().unwrap();
    assert_eq!(
        mesh.colors,
        vec![10.0, 20.0, 255.0, 30.0, 40.0, 255.0, 50.0, 60.0, 255.0]
    );
    assert_eq!(
        mesh.face_colors,
        vec![
            50.0, 60.0, 255.0, 255.0, 30.0, 40.0, 255.0, 255.0, 10.0, 20.0, 255.0, 255.0
        ]
    );
}

#[test]
fn test_crlf_and_blank_lines() {
    let ply_data = "ply\r\nformat ascii 1.0\r\nelement vertex 3\r\nproperty float x\r\n\
                    property float y\r\nproperty float z\r\nelement face 1\r\n\
                    property list uchar int vertex_indices\r\nend_header\r\n\
                    0 0 0\r\n\r\n1 0 0\r\n0 1 0\r\n3 0 1 2\r\n";

    let mesh = decode_text(ply_data).unwrap().unwrap();
    assert_eq!(mesh.face_positions.len(), 9);
    assert_eq!(mesh.positions[3..6], [1.0, 0.0, 0.0]);
}

#[test]
fn test_preamble_is_not_validated() {
    let data = TRIANGLE.replacen("ply\nformat ascii 1.0\n", "anything\ngoes here\n", 1);
    let mesh = decode_text(&data).unwrap().unwrap();
    assert_eq!(mesh.face_positions.len(), 9);
}

#[test]
fn test_no_elements_is_no_data() {
    let ply_data = "ply\nformat ascii 1.0\ncomment empty\nend_header\n";
    assert!(decode_text(ply_data).unwrap().is_none());
}

#[test]
fn test_fewer_rows_than_declared() {
    let ply_data = r#"ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
"#;

    let mesh = decode_text(ply_data).unwrap().unwrap();
    assert_eq!(mesh.positions.len(), 9);
    assert_eq!(mesh.face_positions, vec![0.0; 9]);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
}

#[test]
fn test_bad_value() {
    let data = TRIANGLE.replace("0.5 1.0 0.0", "0.5 one 0.0");
    let err = decode_text(&data).unwrap_err();
    assert!(matches!(err, PlyError::ParseFloatError(_)));
    assert_eq!(err.kind(), FailureKind::UnexpectedValue);
}

#[test]
fn test_short_row() {
    let data = TRIANGLE.replace("0.5 1.0 0.0", "0.5 1.0");
    let err = decode_text(&data).unwrap_err();
    assert!(matches!(err, PlyError::MissingColumn { line: 13, column: 2 }));
    assert_eq!(err.kind(), FailureKind::Generic);
}

#[test]
fn test_short_face_row() {
    let data = TRIANGLE.replace("3 0 1 2", "3 0 1");
    assert!(matches!(
        decode_text(&data),
        Err(PlyError::MissingColumn { column: 3, .. })
    ));
}

#[test]
fn test_face_index_out_of_range() {
    let data = TRIANGLE.replace("3 0 1 2", "3 0 1 3");
    assert!(matches!(
        decode_text(&data),
        Err(PlyError::VertexIndexOutOfRange {
            index: 3,
            vertex_count: 3
        })
    ));

    let data = TRIANGLE.replace("3 0 1 2", "3 0 -1 2");
    assert!(matches!(
        decode_text(&data),
        Err(PlyError::VertexIndexOutOfRange { index: -1, .. })
    ));
}

#[test]
fn test_huge_vertex_count_is_refused() {
    let data = "ply\nformat ascii 1.0\nelement vertex 1000000000000000000\nproperty float x\nend_header\n";
    let err = decode_text(data).unwrap_err();
    assert!(matches!(err, PlyError::CountOverflow));
    assert_eq!(err.kind(), FailureKind::Generic);
}

#[test]
fn test_huge_face_count_is_refused() {
    let data = TRIANGLE.replace("element face 1", "element face 1000000000000000000");
    assert!(matches!(decode_text(&data), Err(PlyError::CountOverflow)));
}
