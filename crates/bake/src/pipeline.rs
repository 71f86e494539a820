//! Whole-file driver: parse, triangulate, shade, color, serialize.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::color::{generate_colors, seeded_rng};
use crate::config::BakeConfig;
use crate::error::{BakeError, BakeResult};
use crate::mesh::BakedMesh;
use crate::normals::{NormalStats, compute_normals};
use crate::parse::parse_obj;
use crate::serialize::render;
use crate::triangulate::{index_buffer, triangulate};

/// Counts describing one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BakeSummary {
    pub vertex_count: usize,
    pub index_count: usize,
    pub triangle_count: usize,
    pub face_count: usize,
    pub dropped_faces: usize,
    pub reference_normals: usize,
    pub normals: NormalStats,
    /// Set once the document has been written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Buffers plus the counts gathered while building them.
#[derive(Debug, Clone)]
pub struct Bake {
    pub mesh: BakedMesh,
    pub summary: BakeSummary,
}

/// Run every stage over OBJ text held in memory.
#[instrument(skip_all)]
pub fn bake(source: &str, config: &BakeConfig) -> BakeResult<Bake> {
    let obj = parse_obj(source)?;
    let triangles = triangulate(&obj.faces);
    let (normals, normal_stats) = compute_normals(&obj, &triangles, config.thresholds)?;
    let colors = generate_colors(&mut seeded_rng(config.seed), obj.position_count());

    let mesh = BakedMesh {
        indices: index_buffer(&triangles),
        normals,
        colors,
        positions: obj.positions,
    };

    let summary = BakeSummary {
        vertex_count: mesh.vertex_count(),
        index_count: mesh.index_count(),
        triangle_count: triangles.len(),
        face_count: obj.faces.len(),
        dropped_faces: obj.dropped_faces,
        reference_normals: obj.normals.len(),
        normals: normal_stats,
        output: None,
    };
    Ok(Bake { mesh, summary })
}

/// `<dir>/<stem>_output.txt` beside the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_output.txt"))
}

/// Convert `input` and write the document to `output`, or to
/// [`default_output_path`] when none is given.
///
/// The document is fully rendered, written to a temporary file beside the
/// target and then renamed over it, so a failed run never leaves a partial
/// output file behind.
#[instrument(skip(input, config), fields(input = %input.display()))]
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    config: &BakeConfig,
) -> BakeResult<BakeSummary> {
    if !input.is_file() {
        return Err(BakeError::MissingInput {
            path: input.to_path_buf(),
        });
    }

    let bytes = fs::read(input)?;
    let source = String::from_utf8_lossy(&bytes);
    let Bake { mesh, mut summary } = bake(&source, config)?;

    let text = render(&mesh, &input.display().to_string(), config);
    let out_path = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    write_atomic(&out_path, text.as_bytes())?;

    info!(
        output = %out_path.display(),
        vertices = summary.vertex_count,
        indices = summary.index_count,
        "output written"
    );
    summary.output = Some(out_path);
    Ok(summary)
}

/// Write `contents` to a temporary file in the target directory, then rename
/// it into place.
fn write_atomic(path: &Path, contents: &[u8]) -> BakeResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("wang.obj")),
            PathBuf::from("wang_output.txt")
        );
        assert_eq!(
            default_output_path(Path::new("models/cube.v2.obj")),
            PathBuf::from("models/cube.v2_output.txt")
        );
    }

    #[test]
    fn test_bake_quad_summary() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\nf 1 2\n";
        let bake = bake(src, &BakeConfig::default()).unwrap();
        assert_eq!(bake.summary.vertex_count, 4);
        assert_eq!(bake.summary.triangle_count, 2);
        assert_eq!(bake.summary.index_count, 6);
        assert_eq!(bake.summary.dropped_faces, 1);
        assert_eq!(bake.summary.normals.geometric, 2);
        assert_eq!(bake.mesh.indices, vec![2, 1, 0, 3, 2, 0]);
        assert_eq!(bake.mesh.colors.len(), 4);
    }

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn dir_entries(dir: &Path) -> Vec<PathBuf> {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn test_write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tri.obj");
        let output = dir.path().join("tri.txt");
        fs::write(&input, TRIANGLE).unwrap();
        fs::write(&output, "stale contents that are longer than nothing").unwrap();

        convert_file(&input, Some(&output), &BakeConfig::default()).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("// ===== Generated C++ model data"));
        assert_eq!(dir_entries(dir.path()), vec![input, output]);
    }

    #[test]
    fn test_unwritable_target_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tri.obj");
        fs::write(&input, TRIANGLE).unwrap();
        let output = dir.path().join("missing").join("tri.txt");

        let err = convert_file(&input, Some(&output), &BakeConfig::default()).unwrap_err();
        assert!(matches!(err, BakeError::Io(_)));
        assert!(!output.exists());
        assert_eq!(dir_entries(dir.path()), vec![input]);
    }

    #[test]
    fn test_missing_input() {
        let err = convert_file(
            Path::new("/definitely/not/here.obj"),
            None,
            &BakeConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BakeError::MissingInput { .. }));
    }
}
