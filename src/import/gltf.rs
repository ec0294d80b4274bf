//! glTF/GLB scene import.
//!
//! Every mesh primitive becomes one [`SceneMesh`]; the encoder's
//! multi-mesh semantics (topology validation, material warnings) need
//! all of them, not just the first.

use anyhow::{bail, Context, Result};
use glam::Vec3;
use std::path::Path;

use crate::scene::{Material, Scene, SceneMesh};

pub fn load_gltf(input: &Path) -> Result<Scene> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let materials: Vec<Material> = document
        .materials()
        .map(|m| {
            let base = m.pbr_metallic_roughness().base_color_factor();
            Material {
                diffuse: Some([base[0], base[1], base[2]]),
                opacity: Some(base[3]),
            }
        })
        .collect();

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            // Positions (required)
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .context("No positions in mesh")?
                .collect();

            // Normals (optional)
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());

            // UV layers (optional)
            let tex_coords0: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect());
            let tex_coords1: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(1)
                .map(|iter| iter.into_f32().collect());

            // Colors (optional) - COLOR_0 as RGBA
            let colors: Option<Vec<[f32; 4]>> = reader
                .read_colors(0)
                .map(|iter| iter.into_rgba_f32().collect());

            // Tangents (optional) - vec4: xyz=direction, w=handedness.
            // Requires normals (tangent without normal is invalid).
            let tangent_w: Option<Vec<[f32; 4]>> = if normals.is_some() {
                reader.read_tangents().map(|iter| iter.collect())
            } else {
                None
            };
            let (tangents, bitangents) = split_tangents(tangent_w, normals.as_deref(), positions.len());

            // Indices (optional) - unindexed primitives are sequential
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let arity = match primitive.mode() {
                gltf::mesh::Mode::Points => 1,
                gltf::mesh::Mode::Lines => 2,
                gltf::mesh::Mode::Triangles => 3,
                mode => bail!("Unsupported glTF primitive mode: {:?}", mode),
            };
            let faces: Vec<Vec<u32>> = indices.chunks_exact(arity).map(|c| c.to_vec()).collect();

            // The default material has no index; point past the table
            // so lookup falls through to opaque white.
            let material_index = primitive.material().index().unwrap_or(materials.len());

            meshes.push(SceneMesh {
                faces,
                positions,
                normals,
                tex_coords0,
                tex_coords1,
                colors,
                tangents,
                bitangents,
                material_index,
            });
        }
    }

    Ok(Scene { meshes, materials })
}

/// Split glTF's vec4 tangents into explicit tangent and bitangent
/// arrays, reconstructing the bitangent as cross(normal, tangent) * w.
fn split_tangents(
    tangent_w: Option<Vec<[f32; 4]>>,
    normals: Option<&[[f32; 3]]>,
    vertex_count: usize,
) -> (Option<Vec<[f32; 3]>>, Option<Vec<[f32; 3]>>) {
    match (tangent_w, normals) {
        (Some(tw), Some(ns)) if tw.len() == vertex_count => {
            let tangents: Vec<[f32; 3]> = tw.iter().map(|t| [t[0], t[1], t[2]]).collect();
            let bitangents: Vec<[f32; 3]> = tw
                .iter()
                .zip(ns)
                .map(|(t, n)| {
                    (Vec3::from(*n).cross(Vec3::new(t[0], t[1], t[2])) * t[3]).to_array()
                })
                .collect();
            (Some(tangents), Some(bitangents))
        }
        (Some(tw), _) => {
            tracing::warn!(
                "Mesh has mismatched tangent count ({} vs {} vertices), ignoring tangents",
                tw.len(),
                vertex_count
            );
            (None, None)
        }
        _ => (None, None),
    }
}
