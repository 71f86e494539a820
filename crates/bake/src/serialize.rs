//! Text output: C++ array literals holding the vertex and index buffers.

use crate::config::BakeConfig;
use crate::mesh::{BakedMesh, Vec3};

/// Literal written for values too small to print meaningfully.
pub const ZERO_LITERAL: &str = "0.000000";

/// Six decimals with trailing zeros and a trailing point removed.
/// Magnitudes below `zero_literal` become [`ZERO_LITERAL`].
pub fn format_number(x: f64, zero_literal: f64) -> String {
    if x.is_nan() || x.abs() < zero_literal {
        return ZERO_LITERAL.to_string();
    }
    let fixed = format!("{x:.6}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn format_vec3(v: &Vec3, zero_literal: f64) -> String {
    format!(
        "XMFLOAT3({}, {}, {})",
        format_number(v.x, zero_literal),
        format_number(v.y, zero_literal),
        format_number(v.z, zero_literal)
    )
}

fn format_color(c: [f64; 4], zero_literal: f64) -> String {
    format!(
        "XMFLOAT4({}, {}, {}, {})",
        format_number(c[0], zero_literal),
        format_number(c[1], zero_literal),
        format_number(c[2], zero_literal),
        format_number(c[3], zero_literal)
    )
}

/// Index buffer lines, `per_line` entries each. Every line but the last ends
/// with a comma.
pub fn index_lines(indices: &[u32], per_line: usize) -> Vec<String> {
    let chunks: Vec<&[u32]> = indices.chunks(per_line.max(1)).collect();
    let last = chunks.len().saturating_sub(1);
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let joined = chunk
                .iter()
                .map(|idx| idx.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if i < last { joined + "," } else { joined }
        })
        .collect()
}

/// Render the full output document.
pub fn render(mesh: &BakedMesh, source_name: &str, config: &BakeConfig) -> String {
    let names = &config.names;
    let eps = config.thresholds.zero_literal;
    let mut out = String::with_capacity(mesh.vertex_count() * 96 + mesh.index_count() * 6 + 512);

    out.push_str("// ===== Generated C++ model data (with per-vertex normals embedded) =====\n");
    out.push_str(&format!("// Source OBJ: {source_name}\n\n"));

    out.push_str(&format!(
        "static const {} {}[] = {{\n",
        names.vertex_type, names.vertex_array
    ));
    for v in mesh.vertices() {
        out.push_str(&format!(
            "    {{ {}, {}, {} }},\n",
            format_vec3(&v.position, eps),
            format_vec3(&v.normal, eps),
            format_color(v.color.to_array(), eps)
        ));
    }
    out.push_str("};\n\n");

    out.push_str(&format!(
        "static const {} {}[] = {{\n",
        names.index_type, names.index_array
    ));
    for line in index_lines(&mesh.indices, config.indices_per_line) {
        out.push_str("    ");
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("};\n\n");

    out.push_str("// meta\n");
    out.push_str(&format!("// verticesCount = {}\n", mesh.vertex_count()));
    out.push_str(&format!("// indexCount = {}\n", mesh.index_count()));
    out.push_str(&format!(
        "// NOTE: {} embeds normals (pos, normal, color). If shading looks inverted, \
         flip normals in the renderer or reverse the triangle order.\n",
        names.vertex_array
    ));
    out
}
