//! Bake Wavefront OBJ meshes into render-ready vertex and index buffers.
//!
//! Faces are fan-triangulated, per-vertex normals are accumulated from
//! authored `vn` records or from face geometry, each vertex gets a seeded
//! color, and the result is written as C++ array literals.

pub mod color;
pub mod config;
pub mod error;
pub mod mesh;
pub mod normals;
pub mod parse;
pub mod pipeline;
pub mod serialize;
pub mod triangulate;

pub use config::{BakeConfig, OutputNames, Thresholds};
pub use error::{BakeError, BakeResult};
pub use mesh::{BakedMesh, Face, FaceVertexRef, ObjMesh, Vec3};
pub use pipeline::{Bake, BakeSummary, bake, convert_file, default_output_path};
