//! vbuf-export library
//!
//! Converts loaded 3D model scenes (meshes, materials) into flat,
//! interleaved binary vertex buffers ready for direct GPU upload.
//! The output is headerless little-endian data; the
//! [`VertexFormatConfig`] that produced a buffer defines its layout
//! and must travel out-of-band to any consumer.

pub mod config;
pub mod encode;
pub mod error;
pub mod import;
pub mod scene;

// Re-export the public surface for tool use
pub use config::{resolve, FormatIntent, NormalSource, UpAxis, VertexFormatConfig};
pub use encode::{
    bitangent_sign, convert_up, encode_scene, pack_color_rgba, quantize_unorm8, EncodeSummary,
    VertexField, VertexLayout,
};
pub use error::ExportError;
pub use import::{generate_missing_normals, load_scene};
pub use scene::{
    primitive_type_name, Material, Scene, SceneMesh, PRIM_LINE, PRIM_POINT, PRIM_POLYGON,
    PRIM_TRIANGLE,
};
