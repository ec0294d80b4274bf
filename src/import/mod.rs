//! Scene importers: thin glue turning model files into [`Scene`] views.

mod gltf;
mod normals;
mod obj;

pub use normals::generate_missing_normals;

use anyhow::{bail, Result};
use std::path::Path;

use crate::scene::Scene;

/// Load a scene, dispatching on the file extension.
pub fn load_scene(input: &Path) -> Result<Scene> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => obj::load_obj(input),
        "gltf" | "glb" => gltf::load_gltf(input),
        _ => bail!(
            "Unsupported model format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}
