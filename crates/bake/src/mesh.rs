//! Mesh data as read from OBJ text and as handed to the serializer.

use nalgebra::Vector3;
use serde::Serialize;

use crate::color::VertexColor;
use crate::error::{BakeError, BakeResult};

pub type Vec3 = Vector3<f64>;

/// Normal used wherever no meaningful direction exists.
pub fn default_axis() -> Vec3 {
    Vec3::z()
}

/// One corner of a face: 0-based indices into the position, texcoord and
/// reference-normal lists. Texcoords are carried but never consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceVertexRef {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceVertexRef {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            texcoord: None,
            normal: None,
        }
    }

    pub fn with_texcoord(mut self, texcoord: usize) -> Self {
        self.texcoord = Some(texcoord);
        self
    }

    pub fn with_normal(mut self, normal: usize) -> Self {
        self.normal = Some(normal);
        self
    }
}

/// A polygon with at least three corners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub refs: Vec<FaceVertexRef>,
}

impl Face {
    /// Returns `None` for fewer than three corners.
    pub fn new(refs: Vec<FaceVertexRef>) -> Option<Self> {
        (refs.len() >= 3).then_some(Self { refs })
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Parsed OBJ content.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub positions: Vec<Vec3>,
    /// Reference normals, already unit length.
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
    /// Faces skipped for having fewer than three corners.
    pub dropped_faces: usize,
}

impl ObjMesh {
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_reference_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Every face corner must reference a declared position.
    pub fn check_position_indices(&self) -> BakeResult<()> {
        let count = self.positions.len();
        self.faces
            .iter()
            .flat_map(|face| &face.refs)
            .find(|r| r.position >= count)
            .map_or(Ok(()), |r| {
                Err(BakeError::PositionOutOfRange {
                    index: r.position,
                    count,
                })
            })
    }
}

/// One entry of the emitted vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: VertexColor,
}

/// Render-ready buffers, one vertex per parsed position.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BakedMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<VertexColor>,
    /// Triangle indices [i0, i1, i2, ...] in output winding.
    pub indices: Vec<u32>,
}

impl BakedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertices(&self) -> impl Iterator<Item = OutputVertex> + '_ {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((&position, &normal), &color)| OutputVertex {
                position,
                normal,
                color,
            })
    }
}
