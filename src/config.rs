//! Vertex format configuration.
//!
//! Turns raw user intent (which attributes to export, plus modifiers)
//! into a validated [`VertexFormatConfig`]. Resolution is a pure
//! function: it never touches the scene or the filesystem, and the
//! descriptor it produces is read-only from then on.

use crate::error::ExportError;

/// Target up-axis convention for the emitted buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpAxis {
    /// Negate Y and Z: (x, y, z) -> (x, -y, -z).
    #[default]
    NegativeYUp,
    /// Swap Y and Z: (x, y, z) -> (x, z, y).
    PositiveZUp,
}

impl UpAxis {
    /// Short name used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            UpAxis::NegativeYUp => "-Y",
            UpAxis::PositiveZUp => "Z",
        }
    }
}

/// How to generate normals for meshes that ship without them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalSource {
    /// One plane normal per face, duplicating shared corners.
    Flat,
    /// Area-weighted average over all faces sharing a vertex.
    #[default]
    Smooth,
}

/// Raw user intent as parsed from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatIntent {
    pub positions: bool,
    pub normals: bool,
    pub smooth_normals: bool,
    pub uvs: bool,
    pub uvs2: bool,
    pub colors: bool,
    pub material_colors: bool,
    pub tangents: bool,
    pub flip_uvs: bool,
    pub invert_winding: bool,
    pub z_up: bool,
}

impl FormatIntent {
    /// True when any attribute-selecting flag was given. When none is,
    /// the default profile applies.
    fn selects_attributes(&self) -> bool {
        self.positions
            || self.normals
            || self.smooth_normals
            || self.uvs
            || self.uvs2
            || self.colors
            || self.material_colors
            || self.tangents
    }
}

/// Resolved, immutable vertex format descriptor.
///
/// Constructed once by [`resolve`] before any mesh is processed.
#[derive(Debug, Clone)]
pub struct VertexFormatConfig {
    pub write_positions: bool,
    pub write_normals: bool,
    pub write_tex_coords0: bool,
    pub write_tex_coords1: bool,
    pub write_colors: bool,
    pub write_material_colors: bool,
    pub write_tangents: bool,
    pub up_axis: UpAxis,
    pub flip_uvs: bool,
    pub invert_winding: bool,
    pub normal_source: NormalSource,
}

impl Default for VertexFormatConfig {
    fn default() -> Self {
        Self {
            write_positions: true,
            write_normals: false,
            write_tex_coords0: false,
            write_tex_coords1: false,
            write_colors: false,
            write_material_colors: false,
            write_tangents: false,
            up_axis: UpAxis::default(),
            flip_uvs: false,
            invert_winding: false,
            normal_source: NormalSource::default(),
        }
    }
}

/// Resolve user intent into a validated [`VertexFormatConfig`].
///
/// With no attribute-selecting flags at all, the default profile
/// applies: positions, smoothly generated normals, the first texture
/// coordinate layer and material-baked colors, with UVs flipped
/// vertically. Otherwise exactly the requested attributes are emitted.
///
/// Fails with [`ExportError::InvalidConfiguration`] when vertex colors
/// and material colors are both requested, or when both normal
/// generation hints are given.
pub fn resolve(intent: &FormatIntent) -> Result<VertexFormatConfig, ExportError> {
    if intent.colors && intent.material_colors {
        return Err(ExportError::InvalidConfiguration(
            "vertex colors and material colors cannot be combined".into(),
        ));
    }
    if intent.normals && intent.smooth_normals {
        return Err(ExportError::InvalidConfiguration(
            "flat and smooth normal generation cannot be combined".into(),
        ));
    }

    let mut config = if intent.selects_attributes() {
        VertexFormatConfig {
            write_positions: intent.positions,
            write_normals: intent.normals || intent.smooth_normals,
            write_tex_coords0: intent.uvs,
            write_tex_coords1: intent.uvs2,
            write_colors: intent.colors,
            write_material_colors: intent.material_colors,
            write_tangents: intent.tangents,
            normal_source: if intent.normals {
                NormalSource::Flat
            } else {
                NormalSource::Smooth
            },
            flip_uvs: intent.flip_uvs,
            ..VertexFormatConfig::default()
        }
    } else {
        VertexFormatConfig {
            write_positions: true,
            write_normals: true,
            write_tex_coords0: true,
            write_material_colors: true,
            normal_source: NormalSource::Smooth,
            flip_uvs: true,
            ..VertexFormatConfig::default()
        }
    };

    if intent.flip_uvs {
        config.flip_uvs = true;
    }
    if intent.z_up {
        config.up_axis = UpAxis::PositiveZUp;
    }
    config.invert_winding = intent.invert_winding;

    Ok(config)
}
