//! OBJ subset reader: `v`, `vn` and `f` records.
//!
//! Face corners accept `v`, `v/vt`, `v/vt/vn` and the `v//vn` shorthand.
//! Indices are 1-based in the text and stored 0-based. Empty sub-fields are
//! absent, never zero. Texcoord fields accept any integer, and zero or negative
//! values are carried as absent. Unknown record kinds are ignored.

use tracing::{debug, info, instrument};

use crate::error::{BakeError, BakeResult};
use crate::mesh::{Face, FaceVertexRef, ObjMesh, Vec3, default_axis};

/// Parse a whole OBJ document.
///
/// Fails if the document yields no positions or no faces, or if any face
/// references a position that was never declared.
#[instrument(skip(source), fields(bytes = source.len()))]
pub fn parse_obj(source: &str) -> BakeResult<ObjMesh> {
    let mut mesh = ObjMesh::default();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                if let Some(p) = parse_vec3(tokens, line_no)? {
                    mesh.positions.push(p);
                }
            }
            Some("vn") => {
                if let Some(n) = parse_vec3(tokens, line_no)? {
                    mesh.normals.push(normalize_reference(n));
                }
            }
            Some("f") => {
                let refs = tokens
                    .map(|token| parse_face_ref(token, line_no))
                    .collect::<BakeResult<Vec<_>>>()?;
                let corners = refs.len();
                match Face::new(refs) {
                    Some(face) => mesh.faces.push(face),
                    None => {
                        debug!(line = line_no, corners, "skipping face with fewer than 3 corners");
                        mesh.dropped_faces += 1;
                    }
                }
            }
            _ => {}
        }
    }

    if mesh.positions.is_empty() || mesh.faces.is_empty() {
        return Err(BakeError::EmptyMesh {
            positions: mesh.positions.len(),
            faces: mesh.faces.len(),
        });
    }

    mesh.check_position_indices()?;

    info!(
        positions = mesh.positions.len(),
        reference_normals = mesh.normals.len(),
        faces = mesh.faces.len(),
        dropped_faces = mesh.dropped_faces,
        "OBJ parsed"
    );
    Ok(mesh)
}

/// Read three components. Records with fewer are skipped; extra components
/// (`w`, vertex colors) are ignored.
fn parse_vec3<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> BakeResult<Option<Vec3>> {
    let (Some(x), Some(y), Some(z)) = (tokens.next(), tokens.next(), tokens.next()) else {
        debug!(line, "skipping record with fewer than 3 components");
        return Ok(None);
    };
    Ok(Some(Vec3::new(
        parse_real(x, line)?,
        parse_real(y, line)?,
        parse_real(z, line)?,
    )))
}

fn parse_real(token: &str, line: usize) -> BakeResult<f64> {
    token.parse().map_err(|_| BakeError::MalformedNumber {
        line,
        token: token.to_string(),
    })
}

fn normalize_reference(n: Vec3) -> Vec3 {
    let len = n.norm();
    if len == 0.0 { default_axis() } else { n / len }
}

/// Parse one face corner token.
pub fn parse_face_ref(token: &str, line: usize) -> BakeResult<FaceVertexRef> {
    let malformed = || BakeError::MalformedFaceToken {
        line,
        token: token.to_string(),
    };

    let mut fields = token.split('/');
    let position = fields
        .next()
        .and_then(parse_index)
        .ok_or_else(malformed)?;
    let texcoord = texcoord_index(fields.next()).ok_or_else(malformed)?;
    let normal = optional_index(fields.next()).ok_or_else(malformed)?;
    if fields.next().is_some() {
        return Err(malformed());
    }

    Ok(FaceVertexRef {
        position,
        texcoord,
        normal,
    })
}

/// `None` when the field is present but invalid; `Some(None)` when it is
/// missing or empty.
fn optional_index(field: Option<&str>) -> Option<Option<usize>> {
    match field {
        None | Some("") => Some(None),
        Some(text) => parse_index(text).map(Some),
    }
}

/// Texcoords are never read, so any integer is accepted. Values that are not a
/// usable 1-based index (zero, negative) are carried as absent.
fn texcoord_index(field: Option<&str>) -> Option<Option<usize>> {
    match field {
        None | Some("") => Some(None),
        Some(text) => {
            let value = text.parse::<i64>().ok()?;
            Some(usize::try_from(value).ok().and_then(|v| v.checked_sub(1)))
        }
    }
}

/// 1-based text index to 0-based. Zero and negative indices are rejected.
fn parse_index(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn test_parse_simple_triangle() {
        let mesh = parse_obj(TRIANGLE).unwrap();
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
        assert!(mesh.normals.is_empty());
        assert_eq!(mesh.faces[0].refs[2], FaceVertexRef::new(2));
    }

    #[test]
    fn test_face_ref_grammars() {
        assert_eq!(parse_face_ref("4", 1).unwrap(), FaceVertexRef::new(3));
        assert_eq!(
            parse_face_ref("4/2", 1).unwrap(),
            FaceVertexRef::new(3).with_texcoord(1)
        );
        assert_eq!(
            parse_face_ref("4/2/7", 1).unwrap(),
            FaceVertexRef::new(3).with_texcoord(1).with_normal(6)
        );
        assert_eq!(
            parse_face_ref("4//7", 1).unwrap(),
            FaceVertexRef::new(3).with_normal(6)
        );
    }

    #[test]
    fn test_empty_subfields_are_absent() {
        assert_eq!(parse_face_ref("5/", 1).unwrap(), FaceVertexRef::new(4));
        assert_eq!(parse_face_ref("5//", 1).unwrap(), FaceVertexRef::new(4));
        assert_eq!(
            parse_face_ref("5/3/", 1).unwrap(),
            FaceVertexRef::new(4).with_texcoord(2)
        );
    }

    #[test]
    fn test_unusable_texcoords_are_carried_as_absent() {
        assert_eq!(parse_face_ref("2/0", 1).unwrap(), FaceVertexRef::new(1));
        assert_eq!(
            parse_face_ref("2/-3/1", 1).unwrap(),
            FaceVertexRef::new(1).with_normal(0)
        );

        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/0 2/0 3/0\n").unwrap();
        assert_eq!(mesh.faces.len(), 1);
        assert!(mesh.faces[0].refs.iter().all(|r| r.texcoord.is_none()));
    }

    #[test]
    fn test_malformed_face_tokens() {
        for token in ["", "a", "1/x", "1//y", "0", "-1", "1/2/3/4", "/2/3"] {
            let err = parse_face_ref(token, 9).unwrap_err();
            assert!(
                matches!(err, BakeError::MalformedFaceToken { line: 9, .. }),
                "token {token:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_reference_normals_are_normalized() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 5\nvn 0 0 0\nvn 3 4 0\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.normals.len(), 3);
        assert_relative_eq!(mesh.normals[0], Vec3::z());
        assert_relative_eq!(mesh.normals[1], Vec3::z());
        assert_relative_eq!(mesh.normals[2], Vec3::new(0.6, 0.8, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_comments_blank_and_unknown_lines_skipped() {
        let src = "# header\n\n   \nmtllib a.mtl\nvt 0.5 0.5\no thing\ns off\n".to_string() + TRIANGLE;
        let mesh = parse_obj(&src).unwrap();
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn test_short_faces_and_records_dropped() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1\nf 1 2\nf 1 2 3\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.dropped_faces, 1);
    }

    #[test]
    fn test_extra_components_ignored() {
        let src = "v 0 0 0 1.0\nv 1 0 0 0.2 0.3 0.4\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.positions[1], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_mesh_errors() {
        assert!(matches!(
            parse_obj("# nothing\n"),
            Err(BakeError::EmptyMesh { positions: 0, faces: 0 })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\n"),
            Err(BakeError::EmptyMesh { positions: 3, faces: 0 })
        ));
        assert!(matches!(
            parse_obj("f 1 2 3\n"),
            Err(BakeError::EmptyMesh { positions: 0, faces: 1 })
        ));
    }

    #[test]
    fn test_out_of_range_position() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert!(matches!(
            err,
            BakeError::PositionOutOfRange { index: 3, count: 3 }
        ));
    }

    #[test]
    fn test_malformed_number() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        match err {
            BakeError::MalformedNumber { line, token } => {
                assert_eq!(line, 1);
                assert_eq!(token, "zero");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let src = TRIANGLE.replace('\n', "\r\n");
        let mesh = parse_obj(&src).unwrap();
        assert_eq!(mesh.faces[0].refs.len(), 3);
    }
}
