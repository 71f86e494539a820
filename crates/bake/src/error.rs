use std::path::PathBuf;

/// Result type for bake operations.
pub type BakeResult<T> = Result<T, BakeError>;

/// Errors that abort a bake run. No output is written when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    #[error("no file: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("no vertices or faces parsed ({positions} positions, {faces} faces)")]
    EmptyMesh { positions: usize, faces: usize },

    #[error("line {line}: malformed face reference `{token}`")]
    MalformedFaceToken { line: usize, token: String },

    #[error("line {line}: `{token}` is not a number")]
    MalformedNumber { line: usize, token: String },

    #[error("face references position {index} but only {count} positions exist")]
    PositionOutOfRange { index: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
