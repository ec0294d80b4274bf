//! Vertex encoder: walks meshes, faces and corners, and streams packed
//! little-endian vertex data in a fixed field order.
//!
//! The field order is declarative: [`VertexLayout`] collects the
//! enabled [`VertexField`]s once per run, and the per-vertex loop just
//! walks that list. Output is headerless; the layout that produced a
//! buffer must travel out-of-band to any consumer.

use std::io::Write;

use bytemuck::cast_slice;
use glam::Vec3;

use crate::config::{UpAxis, VertexFormatConfig};
use crate::error::ExportError;
use crate::scene::{primitive_type_name, Scene, SceneMesh};

/// One attribute slot of the output vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexField {
    /// Axis-converted position, f32x3.
    Position,
    /// Axis-converted normal (fallback (0,1,0), also converted), f32x3.
    Normal,
    /// First UV layer (fallback (0,0), flip applies after), f32x2.
    TexCoord0,
    /// Second UV layer, same rules as the first, f32x2.
    TexCoord1,
    /// Packed RGBA color, one u32.
    Color,
    /// Axis-converted tangent plus bitangent sign, f32x4.
    Tangent,
}

impl VertexField {
    /// Canonical emission order.
    pub const ORDER: [VertexField; 6] = [
        VertexField::Position,
        VertexField::Normal,
        VertexField::TexCoord0,
        VertexField::TexCoord1,
        VertexField::Color,
        VertexField::Tangent,
    ];

    fn enabled(self, config: &VertexFormatConfig) -> bool {
        match self {
            VertexField::Position => config.write_positions,
            VertexField::Normal => config.write_normals,
            VertexField::TexCoord0 => config.write_tex_coords0,
            VertexField::TexCoord1 => config.write_tex_coords1,
            VertexField::Color => config.write_colors || config.write_material_colors,
            VertexField::Tangent => config.write_tangents,
        }
    }

    /// Field width in bytes.
    pub const fn size(self) -> u32 {
        match self {
            VertexField::Position | VertexField::Normal => 12,
            VertexField::TexCoord0 | VertexField::TexCoord1 => 8,
            VertexField::Color => 4,
            VertexField::Tangent => 16,
        }
    }

    fn label(self) -> &'static str {
        match self {
            VertexField::Position => "position 3D",
            VertexField::Normal => "normal",
            VertexField::TexCoord0 => "texcoord",
            VertexField::TexCoord1 => "texcoord 2",
            VertexField::Color => "color",
            VertexField::Tangent => "tangent and bitangent sign (float4)",
        }
    }
}

/// Ordered list of the fields a config actually emits.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    fields: Vec<VertexField>,
}

impl VertexLayout {
    pub fn new(config: &VertexFormatConfig) -> Self {
        Self {
            fields: VertexField::ORDER
                .iter()
                .copied()
                .filter(|f| f.enabled(config))
                .collect(),
        }
    }

    pub fn fields(&self) -> &[VertexField] {
        &self.fields
    }

    /// Bytes per emitted vertex.
    pub fn stride(&self) -> u32 {
        self.fields.iter().map(|f| f.size()).sum()
    }

    /// Human-readable field list for diagnostics.
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Apply the up-axis conversion to a vector.
#[inline]
pub fn convert_up(v: [f32; 3], up: UpAxis) -> [f32; 3] {
    match up {
        UpAxis::NegativeYUp => [v[0], -v[1], -v[2]],
        UpAxis::PositiveZUp => [v[0], v[2], v[1]],
    }
}

/// Truncating unorm8 quantization (0.5 -> 127, not 128). Truncation is
/// kept for bit-exact compatibility with buffers produced by existing
/// consumers.
#[inline]
pub fn quantize_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Pack RGBA floats into one u32: R in bits 0-7, G 8-15, B 16-23,
/// A 24-31.
#[inline]
pub fn pack_color_rgba(r: f32, g: f32, b: f32, a: f32) -> u32 {
    (quantize_unorm8(r) as u32)
        | ((quantize_unorm8(g) as u32) << 8)
        | ((quantize_unorm8(b) as u32) << 16)
        | ((quantize_unorm8(a) as u32) << 24)
}

/// Bitangent handedness relative to normal x tangent. Strictly negative
/// dot products flip; exactly zero keeps +1.
#[inline]
pub fn bitangent_sign(normal: Vec3, tangent: Vec3, bitangent: Vec3) -> f32 {
    if normal.cross(tangent).dot(bitangent) < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Per-mesh state computed once before emission: attribute availability
/// and the resolved material color.
struct MeshView<'a> {
    positions: &'a [[f32; 3]],
    normals: Option<&'a [[f32; 3]]>,
    tex_coords0: Option<&'a [[f32; 2]]>,
    tex_coords1: Option<&'a [[f32; 2]]>,
    colors: Option<&'a [[f32; 4]]>,
    /// Present only when the mesh carries both tangents and bitangents.
    tangent_space: Option<(&'a [[f32; 3]], &'a [[f32; 3]])>,
    material_diffuse: [f32; 3],
    material_opacity: f32,
}

impl<'a> MeshView<'a> {
    fn new(scene: &Scene, mesh: &'a SceneMesh) -> Self {
        let (material_diffuse, material_opacity) = scene.material_color(mesh);
        let tangent_space = match (&mesh.tangents, &mesh.bitangents) {
            (Some(t), Some(b)) => Some((t.as_slice(), b.as_slice())),
            _ => None,
        };
        Self {
            positions: &mesh.positions,
            normals: mesh.normals.as_deref(),
            tex_coords0: mesh.tex_coords0.as_deref(),
            tex_coords1: mesh.tex_coords1.as_deref(),
            colors: mesh.colors.as_deref(),
            tangent_space,
            material_diffuse,
            material_opacity,
        }
    }
}

/// Diagnostic summary returned after a successful encode.
#[derive(Debug, Clone)]
pub struct EncodeSummary {
    /// Human-readable field list, e.g. "position 3D, normal, texcoord".
    pub format: String,
    /// Bytes per vertex.
    pub stride: u32,
    /// Total vertices emitted across all meshes.
    pub vertex_count: u64,
    /// Diagnostic topology name of the whole scene.
    pub primitive_type: &'static str,
    /// Set when meshes reference more than one material.
    pub mixed_materials: bool,
}

/// Encode every mesh of the scene into one contiguous vertex stream.
///
/// Meshes are visited in order, faces in storage order, and corners in
/// storage order unless `invert_winding` fully reverses each face's
/// index list. Validation (one shared primitive topology) happens
/// before the first byte is written; a zero-mesh scene succeeds without
/// writing anything.
///
/// The write is streaming: an I/O failure aborts immediately and leaves
/// the output partial.
pub fn encode_scene<W: Write>(
    w: &mut W,
    scene: &Scene,
    config: &VertexFormatConfig,
) -> Result<EncodeSummary, ExportError> {
    let layout = VertexLayout::new(config);

    if scene.meshes.is_empty() {
        return Ok(EncodeSummary {
            format: layout.describe(),
            stride: layout.stride(),
            vertex_count: 0,
            primitive_type: "unknown",
            mixed_materials: false,
        });
    }

    // Topology must agree across meshes before anything is written.
    let primitive_mask = scene.meshes[0].primitive_mask();
    if scene
        .meshes
        .iter()
        .any(|m| m.primitive_mask() != primitive_mask)
    {
        return Err(ExportError::MixedPrimitiveTypes);
    }

    let material_index = scene.meshes[0].material_index;
    let mut mixed_materials = false;
    let mut vertex_count = 0u64;

    for mesh in &scene.meshes {
        if mesh.material_index != material_index {
            mixed_materials = true;
        }
        vertex_count += encode_mesh(w, scene, mesh, config, &layout)?;
    }

    if mixed_materials && !config.write_material_colors {
        tracing::warn!(
            "model consists of multiple materials, but the entire model is \
             collapsed into a single vertex buffer; use a single material, \
             or bake material colors into vertex colors"
        );
    }

    Ok(EncodeSummary {
        format: layout.describe(),
        stride: layout.stride(),
        vertex_count,
        primitive_type: primitive_type_name(primitive_mask),
        mixed_materials,
    })
}

fn encode_mesh<W: Write>(
    w: &mut W,
    scene: &Scene,
    mesh: &SceneMesh,
    config: &VertexFormatConfig,
    layout: &VertexLayout,
) -> Result<u64, ExportError> {
    let view = MeshView::new(scene, mesh);
    let mut emitted = 0u64;

    for face in &mesh.faces {
        for k in 0..face.len() {
            // Full reversal, not a rotation: the last corner becomes
            // the first.
            let corner = if config.invert_winding {
                face.len() - 1 - k
            } else {
                k
            };
            emit_vertex(w, &view, face[corner] as usize, config, layout)?;
            emitted += 1;
        }
    }

    Ok(emitted)
}

fn emit_vertex<W: Write>(
    w: &mut W,
    view: &MeshView<'_>,
    i: usize,
    config: &VertexFormatConfig,
    layout: &VertexLayout,
) -> Result<(), ExportError> {
    // The normal feeds both the Normal and Tangent fields. The fallback
    // goes through axis conversion like real data.
    let normal = Vec3::from(convert_up(
        view.normals.map(|n| n[i]).unwrap_or([0.0, 1.0, 0.0]),
        config.up_axis,
    ));

    for field in layout.fields() {
        match field {
            VertexField::Position => {
                let p = convert_up(view.positions[i], config.up_axis);
                w.write_all(cast_slice(&p))?;
            }
            VertexField::Normal => {
                w.write_all(cast_slice(&normal.to_array()))?;
            }
            VertexField::TexCoord0 => write_uv(w, view.tex_coords0, i, config)?,
            VertexField::TexCoord1 => write_uv(w, view.tex_coords1, i, config)?,
            VertexField::Color => {
                let packed = if config.write_colors {
                    match view.colors {
                        Some(colors) => {
                            let [r, g, b, a] = colors[i];
                            pack_color_rgba(r, g, b, a)
                        }
                        None => 0xFFFF_FFFF,
                    }
                } else {
                    // Material color applies regardless of vertex-color
                    // presence; write_colors was already checked.
                    let [r, g, b] = view.material_diffuse;
                    pack_color_rgba(r, g, b, view.material_opacity)
                };
                w.write_all(&packed.to_le_bytes())?;
            }
            VertexField::Tangent => match view.tangent_space {
                Some((tangents, bitangents)) => {
                    let tangent = Vec3::from(convert_up(tangents[i], config.up_axis));
                    let bitangent = Vec3::from(convert_up(bitangents[i], config.up_axis));
                    let sign = bitangent_sign(normal, tangent, bitangent);
                    w.write_all(cast_slice(&tangent.to_array()))?;
                    w.write_all(&sign.to_le_bytes())?;
                }
                None => {
                    // Identical under both up-axis conventions since the
                    // Y and Z components are zero.
                    w.write_all(cast_slice(&[1.0f32, 0.0, 0.0, 1.0]))?;
                }
            },
        }
    }

    Ok(())
}

fn write_uv<W: Write>(
    w: &mut W,
    uvs: Option<&[[f32; 2]]>,
    i: usize,
    config: &VertexFormatConfig,
) -> Result<(), ExportError> {
    let [u, mut v] = uvs.map(|t| t[i]).unwrap_or([0.0, 0.0]);
    // The flip applies to whatever v was chosen, fallback included.
    if config.flip_uvs {
        v = 1.0 - v;
    }
    w.write_all(cast_slice(&[u, v]))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_truncates() {
        assert_eq!(quantize_unorm8(0.0), 0);
        assert_eq!(quantize_unorm8(0.5), 127);
        assert_eq!(quantize_unorm8(1.0), 255);
        assert_eq!(quantize_unorm8(-0.5), 0);
        assert_eq!(quantize_unorm8(2.0), 255);
    }

    #[test]
    fn color_packs_rgba_low_to_high() {
        let packed = pack_color_rgba(1.0, 0.0, 0.0, 0.0);
        assert_eq!(packed, 0x0000_00FF);
        let packed = pack_color_rgba(0.0, 0.0, 0.0, 1.0);
        assert_eq!(packed, 0xFF00_0000);
        assert_eq!(pack_color_rgba(1.0, 1.0, 1.0, 1.0), 0xFFFF_FFFF);
    }

    #[test]
    fn axis_conversion() {
        assert_eq!(
            convert_up([1.0, 2.0, 3.0], UpAxis::NegativeYUp),
            [1.0, -2.0, -3.0]
        );
        assert_eq!(
            convert_up([1.0, 2.0, 3.0], UpAxis::PositiveZUp),
            [1.0, 3.0, 2.0]
        );
    }

    #[test]
    fn bitangent_sign_is_positive_at_zero() {
        let n = Vec3::Z;
        let t = Vec3::X;
        // cross(Z, X) = Y
        assert_eq!(bitangent_sign(n, t, Vec3::Y), 1.0);
        assert_eq!(bitangent_sign(n, t, -Vec3::Y), -1.0);
        // Degenerate bitangent dots to exactly zero.
        assert_eq!(bitangent_sign(n, t, Vec3::ZERO), 1.0);
    }

    #[test]
    fn layout_order_and_stride() {
        let config = VertexFormatConfig {
            write_positions: true,
            write_normals: true,
            write_tex_coords0: true,
            write_material_colors: true,
            ..Default::default()
        };
        let layout = VertexLayout::new(&config);
        assert_eq!(
            layout.fields(),
            &[
                VertexField::Position,
                VertexField::Normal,
                VertexField::TexCoord0,
                VertexField::Color,
            ]
        );
        assert_eq!(layout.stride(), 12 + 12 + 8 + 4);
        assert_eq!(
            layout.describe(),
            "position 3D, normal, texcoord, color"
        );
    }

    #[test]
    fn layout_skips_positions_when_disabled() {
        let config = VertexFormatConfig {
            write_positions: false,
            write_tangents: true,
            ..Default::default()
        };
        let layout = VertexLayout::new(&config);
        assert_eq!(layout.fields(), &[VertexField::Tangent]);
        assert_eq!(layout.stride(), 16);
    }
}
