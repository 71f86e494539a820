//! Per-position normal accumulation and finalization.
//!
//! Each triangle either contributes the authored reference normal of each of
//! its corners, or its geometric face normal to all three corners. When only
//! some corners carry a usable reference normal, each corner falls back
//! individually: its own reference normal if it has one, else the face normal.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::Thresholds;
use crate::error::BakeResult;
use crate::mesh::{ObjMesh, Vec3, default_axis};
use crate::triangulate::Triangle;

/// Which source fed a triangle's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalPath {
    /// Every corner used its reference normal.
    Reference,
    /// Every corner used the face normal.
    Geometric,
    /// Some corners used reference normals, the rest the face normal.
    Mixed,
}

/// Counters gathered while accumulating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalStats {
    pub reference: usize,
    pub geometric: usize,
    pub mixed: usize,
    /// Triangles whose face normal was replaced by the default axis.
    pub degenerate: usize,
}

/// Normalize `v`, or return +Z when its squared length is at or below `eps`.
pub fn normalize_or_default(v: Vec3, eps: f64) -> Vec3 {
    let len_sq = v.norm_squared();
    if len_sq <= eps {
        default_axis()
    } else {
        v / len_sq.sqrt()
    }
}

/// Unnormalized face normal: (p1 - p0) x (p2 - p0).
pub fn face_cross(p0: &Vec3, p1: &Vec3, p2: &Vec3) -> Vec3 {
    (p1 - p0).cross(&(p2 - p0))
}

/// Unit normal of triangle (p0, p1, p2) following its winding.
pub fn face_normal(p0: &Vec3, p1: &Vec3, p2: &Vec3, eps: f64) -> Vec3 {
    normalize_or_default(face_cross(p0, p1, p2), eps)
}

/// Running normal sums, one per position.
#[derive(Debug, Clone)]
pub struct NormalAccumulator<'a> {
    positions: &'a [Vec3],
    reference: &'a [Vec3],
    sums: Vec<Vec3>,
    thresholds: Thresholds,
    stats: NormalStats,
}

impl<'a> NormalAccumulator<'a> {
    /// Fails if any face of `mesh` references a missing position.
    pub fn new(mesh: &'a ObjMesh, thresholds: Thresholds) -> BakeResult<Self> {
        mesh.check_position_indices()?;
        Ok(Self {
            positions: &mesh.positions,
            reference: &mesh.normals,
            sums: vec![Vec3::zeros(); mesh.positions.len()],
            thresholds,
            stats: NormalStats::default(),
        })
    }

    /// Reference normal for a corner, if the mesh has any and the index resolves.
    fn reference_for(&self, normal: Option<usize>) -> Option<Vec3> {
        normal.and_then(|i| self.reference.get(i).copied())
    }

    /// Add one triangle's contribution to its three positions.
    ///
    /// # Panics
    ///
    /// If `tri` was not triangulated from the mesh this accumulator was built on
    /// and references a position past its end.
    pub fn accumulate(&mut self, tri: &Triangle) -> NormalPath {
        let authored = tri.corners.map(|c| self.reference_for(c.normal));

        let path = if authored.iter().all(Option::is_some) {
            NormalPath::Reference
        } else if authored.iter().any(Option::is_some) {
            NormalPath::Mixed
        } else {
            NormalPath::Geometric
        };

        let geometric = match path {
            NormalPath::Reference => None,
            NormalPath::Geometric | NormalPath::Mixed => Some(self.geometric_normal(tri)),
        };

        for (corner, own) in tri.corners.iter().zip(authored) {
            if let Some(n) = own.or(geometric) {
                self.sums[corner.position] += n;
            }
        }

        match path {
            NormalPath::Reference => self.stats.reference += 1,
            NormalPath::Geometric => self.stats.geometric += 1,
            NormalPath::Mixed => self.stats.mixed += 1,
        }
        path
    }

    fn geometric_normal(&mut self, tri: &Triangle) -> Vec3 {
        let [a, b, c] = tri.positions();
        let cross = face_cross(&self.positions[a], &self.positions[b], &self.positions[c]);
        if cross.norm_squared() <= self.thresholds.degenerate_area {
            debug!(positions = ?[a, b, c], "degenerate triangle, using default axis");
            self.stats.degenerate += 1;
        }
        normalize_or_default(cross, self.thresholds.degenerate_area)
    }

    pub fn sums(&self) -> &[Vec3] {
        &self.sums
    }

    pub fn stats(&self) -> NormalStats {
        self.stats
    }

    /// Normalize every sum once. Sums that vanish (untouched positions or
    /// cancelling contributions) become +Z.
    pub fn finalize(self) -> Vec<Vec3> {
        let Thresholds {
            degenerate_area,
            zero_normal,
            ..
        } = self.thresholds;
        self.sums
            .into_iter()
            .map(|sum| {
                let n = normalize_or_default(sum, degenerate_area);
                if n.iter().all(|c| c.abs() < zero_normal) {
                    default_axis()
                } else {
                    n
                }
            })
            .collect()
    }
}

/// Accumulate every triangle of `mesh` and return the finished unit normals.
///
/// `triangles` must come from `mesh.faces`.
#[instrument(skip_all, fields(triangles = triangles.len()))]
pub fn compute_normals(
    mesh: &ObjMesh,
    triangles: &[Triangle],
    thresholds: Thresholds,
) -> BakeResult<(Vec<Vec3>, NormalStats)> {
    let mut acc = NormalAccumulator::new(mesh, thresholds)?;
    for tri in triangles {
        acc.accumulate(tri);
    }
    let stats = acc.stats();
    info!(
        reference = stats.reference,
        geometric = stats.geometric,
        mixed = stats.mixed,
        degenerate = stats.degenerate,
        "normals accumulated"
    );
    Ok((acc.finalize(), stats))
}
