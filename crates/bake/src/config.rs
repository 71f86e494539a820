//! Configuration for a bake run.

/// Seed used when none is supplied, so regenerated files keep their colors.
pub const DEFAULT_COLOR_SEED: u64 = 12345;

/// Numeric thresholds used by the normal engine and the serializer.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Squared cross-product length at or below which a triangle is degenerate.
    pub degenerate_area: f64,
    /// Finalized normals with every component below this are replaced by +Z.
    pub zero_normal: f64,
    /// Magnitudes below this are written as the canonical zero literal.
    pub zero_literal: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            degenerate_area: 1e-12,
            zero_normal: 1e-9,
            zero_literal: 1e-6,
        }
    }
}

/// Identifiers used for the emitted C++ declarations.
#[derive(Debug, Clone)]
pub struct OutputNames {
    pub vertex_type: String,
    pub vertex_array: String,
    pub index_type: String,
    pub index_array: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            vertex_type: "GameApp::VertexPosColor".to_string(),
            vertex_array: "tempVertices".to_string(),
            index_type: "WORD".to_string(),
            index_array: "tempIndices".to_string(),
        }
    }
}

/// Everything that controls a single conversion.
#[derive(Debug, Clone)]
pub struct BakeConfig {
    /// Seed for the per-vertex color generator.
    pub seed: u64,
    /// Index-buffer entries written per output line.
    pub indices_per_line: usize,
    pub thresholds: Thresholds,
    pub names: OutputNames,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_COLOR_SEED,
            indices_per_line: 12,
            thresholds: Thresholds::default(),
            names: OutputNames::default(),
        }
    }
}

impl BakeConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the index line width. Zero is clamped to one entry per line.
    pub fn with_indices_per_line(mut self, per_line: usize) -> Self {
        self.indices_per_line = per_line.max(1);
        self
    }

    pub fn with_names(mut self, names: OutputNames) -> Self {
        self.names = names;
        self
    }
}
