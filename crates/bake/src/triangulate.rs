//! Fan triangulation of faces and the output index buffer.

use tracing::{info, instrument};

use crate::mesh::{Face, FaceVertexRef};

/// One fan triangle, corners in face order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub corners: [FaceVertexRef; 3],
}

impl Triangle {
    pub fn positions(&self) -> [usize; 3] {
        self.corners.map(|c| c.position)
    }

    /// Position indices as written to the index buffer: last, middle, first.
    pub fn output_winding(&self) -> [u32; 3] {
        let [a, b, c] = self.positions();
        [c as u32, b as u32, a as u32]
    }
}

/// Fan triangulation anchored at the first corner: k corners give k-2 triangles.
pub fn fan(face: &Face) -> impl Iterator<Item = Triangle> + '_ {
    let anchor = face.refs[0];
    face.refs[1..].windows(2).map(move |pair| Triangle {
        corners: [anchor, pair[0], pair[1]],
    })
}

/// Triangulate every face in order.
#[instrument(skip(faces), fields(faces = faces.len()))]
pub fn triangulate(faces: &[Face]) -> Vec<Triangle> {
    let triangles: Vec<Triangle> = faces.iter().flat_map(fan).collect();
    info!(triangles = triangles.len(), "faces triangulated");
    triangles
}

/// Flatten triangles into the output index buffer.
pub fn index_buffer(triangles: &[Triangle]) -> Vec<u32> {
    triangles.iter().flat_map(Triangle::output_winding).collect()
}
