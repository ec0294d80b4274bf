//! Scene view consumed by the encoder.
//!
//! Importers produce this model; the encoder only reads it. Attribute
//! arrays are per-vertex and optionally absent, faces are ordered index
//! lists into the shared vertex arrays.

/// Primitive topology bit: single-index faces.
pub const PRIM_POINT: u8 = 1;
/// Primitive topology bit: two-index faces.
pub const PRIM_LINE: u8 = 2;
/// Primitive topology bit: three-index faces.
pub const PRIM_TRIANGLE: u8 = 4;
/// Primitive topology bit: faces with more than three indices.
pub const PRIM_POLYGON: u8 = 8;

/// Diagnostic name for a topology bitmask.
pub fn primitive_type_name(mask: u8) -> &'static str {
    if mask & PRIM_POINT != 0 {
        "pr_pointlist"
    } else if mask & PRIM_LINE != 0 {
        "pr_linelist"
    } else if mask & PRIM_TRIANGLE != 0 {
        "pr_trianglelist"
    } else {
        "unknown"
    }
}

/// Material properties relevant to vertex baking.
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub diffuse: Option<[f32; 3]>,
    pub opacity: Option<f32>,
}

/// A single mesh: faces plus per-vertex attribute arrays.
#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    /// Ordered index lists into the vertex arrays. Face arity is not
    /// fixed; the topology mask is derived from it.
    pub faces: Vec<Vec<u32>>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords0: Option<Vec<[f32; 2]>>,
    pub tex_coords1: Option<Vec<[f32; 2]>>,
    /// RGBA vertex colors in [0, 1].
    pub colors: Option<Vec<[f32; 4]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    pub bitangents: Option<Vec<[f32; 3]>>,
    /// Index into [`Scene::materials`]. Out-of-range indices resolve to
    /// the default material (opaque white).
    pub material_index: usize,
}

impl SceneMesh {
    /// Topology bitmask derived from face arities.
    pub fn primitive_mask(&self) -> u8 {
        let mut mask = 0;
        for face in &self.faces {
            mask |= match face.len() {
                0 => 0,
                1 => PRIM_POINT,
                2 => PRIM_LINE,
                3 => PRIM_TRIANGLE,
                _ => PRIM_POLYGON,
            };
        }
        mask
    }
}

/// A loaded model: meshes plus the shared materials table.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub meshes: Vec<SceneMesh>,
    pub materials: Vec<Material>,
}

impl Scene {
    /// Resolved diffuse color and opacity for a mesh's material,
    /// defaulting to opaque white when unset or missing.
    pub fn material_color(&self, mesh: &SceneMesh) -> ([f32; 3], f32) {
        let material = self.materials.get(mesh.material_index);
        let diffuse = material.and_then(|m| m.diffuse).unwrap_or([1.0, 1.0, 1.0]);
        let opacity = material.and_then(|m| m.opacity).unwrap_or(1.0);
        (diffuse, opacity)
    }
}
