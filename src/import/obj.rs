//! Wavefront OBJ scene import.
//!
//! Minimal line-based parser: v/vt/vn statements plus faces with fan
//! triangulation. Corners are expanded into unshared vertices, so the
//! whole file becomes a single triangle-list mesh. OBJ materials are
//! not read; the default opaque-white material applies.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::scene::{Scene, SceneMesh};

pub fn load_obj(input: &Path) -> Result<Scene> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let reader = BufReader::new(file);

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();

    // Final vertex data (expanded from faces)
    let mut final_positions: Vec<[f32; 3]> = Vec::new();
    let mut final_uvs: Vec<[f32; 2]> = Vec::new();
    let mut final_normals: Vec<[f32; 3]> = Vec::new();
    let mut faces: Vec<Vec<u32>> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "v" if parts.len() >= 4 => {
                let x: f32 = parts[1].parse().unwrap_or(0.0);
                let y: f32 = parts[2].parse().unwrap_or(0.0);
                let z: f32 = parts[3].parse().unwrap_or(0.0);
                positions.push([x, y, z]);
            }
            "vt" if parts.len() >= 3 => {
                let u: f32 = parts[1].parse().unwrap_or(0.0);
                let v: f32 = parts[2].parse().unwrap_or(0.0);
                tex_coords.push([u, v]);
            }
            "vn" if parts.len() >= 4 => {
                let x: f32 = parts[1].parse().unwrap_or(0.0);
                let y: f32 = parts[2].parse().unwrap_or(0.0);
                let z: f32 = parts[3].parse().unwrap_or(0.0);
                normals_raw.push([x, y, z]);
            }
            "f" if parts.len() >= 4 => {
                // Parse face vertices (triangulate if needed)
                let face_verts: Vec<(usize, Option<usize>, Option<usize>)> = parts[1..]
                    .iter()
                    .filter_map(|v| parse_obj_vertex(v))
                    .collect();

                if face_verts.len() < 3 {
                    continue;
                }

                // Fan triangulation for convex polygons
                for i in 1..face_verts.len() - 1 {
                    let mut face = Vec::with_capacity(3);
                    for &idx in &[0, i, i + 1] {
                        let (vi, vti, vni) = face_verts[idx];

                        face.push(final_positions.len() as u32);
                        final_positions.push(positions.get(vi).copied().unwrap_or([0.0; 3]));

                        if let Some(ti) = vti {
                            final_uvs.push(tex_coords.get(ti).copied().unwrap_or([0.0; 2]));
                        }

                        if let Some(ni) = vni {
                            final_normals
                                .push(normals_raw.get(ni).copied().unwrap_or([0.0, 1.0, 0.0]));
                        }
                    }
                    faces.push(face);
                }
            }
            _ => {}
        }
    }

    if final_positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    // Only keep attribute layers that cover every corner.
    let uvs = (final_uvs.len() == final_positions.len()).then_some(final_uvs);
    let normals = (final_normals.len() == final_positions.len()).then_some(final_normals);

    let mesh = SceneMesh {
        faces,
        positions: final_positions,
        normals,
        tex_coords0: uvs,
        ..Default::default()
    };

    Ok(Scene {
        meshes: vec![mesh],
        materials: Vec::new(),
    })
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(s: &str) -> Option<(usize, Option<usize>, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = parts.first()?.parse::<usize>().ok()?.checked_sub(1)?; // OBJ indices are 1-based

    let vti = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    let vni = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    Some((vi, vti, vni))
}
