//! Normal generation for meshes imported without normals.
//!
//! Runs as scene preprocessing so the encoder still sees plain
//! [`SceneMesh`] data. Meshes that already carry normals are left
//! untouched; scenes fed to the encoder without preprocessing fall
//! back to its fixed (0,1,0) normal.

use glam::Vec3;

use crate::config::{NormalSource, VertexFormatConfig};
use crate::scene::{Scene, SceneMesh};

/// Generate normals for meshes that lack them, per the configured
/// source. No-op unless the config exports normals.
pub fn generate_missing_normals(scene: &mut Scene, config: &VertexFormatConfig) {
    if !config.write_normals {
        return;
    }
    for mesh in &mut scene.meshes {
        if mesh.normals.is_some() {
            continue;
        }
        match config.normal_source {
            NormalSource::Smooth => generate_smooth_normals(mesh),
            NormalSource::Flat => generate_flat_normals(mesh),
        }
    }
}

/// Area-weighted plane normal of a face; zero for degenerate or
/// sub-triangle faces.
fn face_normal(positions: &[[f32; 3]], face: &[u32]) -> Vec3 {
    if face.len() < 3 {
        return Vec3::ZERO;
    }
    let a = Vec3::from(positions[face[0] as usize]);
    let b = Vec3::from(positions[face[1] as usize]);
    let c = Vec3::from(positions[face[2] as usize]);
    (b - a).cross(c - a)
}

fn normalize_or_up(n: Vec3) -> [f32; 3] {
    if n.length_squared() > 0.0 {
        n.normalize().to_array()
    } else {
        [0.0, 1.0, 0.0]
    }
}

fn generate_smooth_normals(mesh: &mut SceneMesh) {
    let mut accum = vec![Vec3::ZERO; mesh.positions.len()];
    for face in &mesh.faces {
        let n = face_normal(&mesh.positions, face);
        for &index in face {
            accum[index as usize] += n;
        }
    }
    mesh.normals = Some(accum.into_iter().map(normalize_or_up).collect());
}

/// Flat normals need unshared corners: every face corner becomes its
/// own vertex carrying its face's plane normal. All other attribute
/// layers are re-expanded alongside.
fn generate_flat_normals(mesh: &mut SceneMesh) {
    let corner_count: usize = mesh.faces.iter().map(|f| f.len()).sum();

    let mut positions = Vec::with_capacity(corner_count);
    let mut normals = Vec::with_capacity(corner_count);
    let mut tex_coords0 = mesh.tex_coords0.as_ref().map(|_| Vec::with_capacity(corner_count));
    let mut tex_coords1 = mesh.tex_coords1.as_ref().map(|_| Vec::with_capacity(corner_count));
    let mut colors = mesh.colors.as_ref().map(|_| Vec::with_capacity(corner_count));
    let mut tangents = mesh.tangents.as_ref().map(|_| Vec::with_capacity(corner_count));
    let mut bitangents = mesh.bitangents.as_ref().map(|_| Vec::with_capacity(corner_count));
    let mut faces = Vec::with_capacity(mesh.faces.len());

    for face in &mesh.faces {
        let n = normalize_or_up(face_normal(&mesh.positions, face));

        let mut new_face = Vec::with_capacity(face.len());
        for &index in face {
            let i = index as usize;
            new_face.push(positions.len() as u32);
            positions.push(mesh.positions[i]);
            normals.push(n);

            if let (Some(dst), Some(src)) = (tex_coords0.as_mut(), mesh.tex_coords0.as_ref()) {
                dst.push(src[i]);
            }
            if let (Some(dst), Some(src)) = (tex_coords1.as_mut(), mesh.tex_coords1.as_ref()) {
                dst.push(src[i]);
            }
            if let (Some(dst), Some(src)) = (colors.as_mut(), mesh.colors.as_ref()) {
                dst.push(src[i]);
            }
            if let (Some(dst), Some(src)) = (tangents.as_mut(), mesh.tangents.as_ref()) {
                dst.push(src[i]);
            }
            if let (Some(dst), Some(src)) = (bitangents.as_mut(), mesh.bitangents.as_ref()) {
                dst.push(src[i]);
            }
        }
        faces.push(new_face);
    }

    mesh.positions = positions;
    mesh.normals = Some(normals);
    mesh.tex_coords0 = tex_coords0;
    mesh.tex_coords1 = tex_coords1;
    mesh.colors = colors;
    mesh.tangents = tangents;
    mesh.bitangents = bitangents;
    mesh.faces = faces;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> SceneMesh {
        // Two triangles in the XY plane sharing an edge.
        SceneMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            faces: vec![vec![0, 1, 2], vec![0, 2, 3]],
            ..Default::default()
        }
    }

    #[test]
    fn smooth_normals_point_out_of_plane() {
        let mut mesh = quad_mesh();
        generate_smooth_normals(&mut mesh);
        let normals = mesh.normals.unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert_eq!(n, [0.0, 0.0, 1.0]);
        }
        // Vertex sharing is preserved.
        assert_eq!(mesh.positions.len(), 4);
    }

    #[test]
    fn smooth_normals_fall_back_on_degenerate_geometry() {
        let mut mesh = SceneMesh {
            positions: vec![[0.0; 3], [0.0; 3], [0.0; 3]],
            faces: vec![vec![0, 1, 2]],
            ..Default::default()
        };
        generate_smooth_normals(&mut mesh);
        assert_eq!(mesh.normals.unwrap()[0], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn flat_normals_unshare_corners() {
        let mut mesh = quad_mesh();
        mesh.tex_coords0 = Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        generate_flat_normals(&mut mesh);

        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.faces, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(mesh.normals.as_ref().unwrap().len(), 6);
        // UV layer is re-expanded with the corners.
        let uvs = mesh.tex_coords0.unwrap();
        assert_eq!(uvs.len(), 6);
        assert_eq!(uvs[3], [0.0, 0.0]);
        assert_eq!(uvs[4], [1.0, 1.0]);
    }

    #[test]
    fn preprocessing_skips_meshes_with_normals() {
        let mut mesh = quad_mesh();
        mesh.normals = Some(vec![[0.0, 1.0, 0.0]; 4]);
        let mut scene = Scene {
            meshes: vec![mesh],
            materials: Vec::new(),
        };
        let config = VertexFormatConfig {
            write_normals: true,
            normal_source: NormalSource::Flat,
            ..Default::default()
        };
        generate_missing_normals(&mut scene, &config);
        // Untouched: still 4 shared vertices.
        assert_eq!(scene.meshes[0].positions.len(), 4);
    }
}
