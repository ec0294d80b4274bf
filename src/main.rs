//! vbuf-export - converts 3D models (glTF/GLB/OBJ) to flat,
//! interleaved GPU-ready vertex buffers.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use vbuf_export::{config, encode, import};

#[derive(Parser)]
#[command(name = "vbuf-export")]
#[command(about = "Converts 3D models to flat interleaved GPU vertex buffers")]
#[command(version)]
#[command(after_help = "Without any attribute-selecting option, the default \
profile applies: positions, smooth normals, texture coordinates and \
material-baked colors, with UVs flipped vertically.")]
struct Cli {
    /// Input model file (glTF/GLB/OBJ)
    input: PathBuf,

    /// Output file. Defaults to the input path with a .bin extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export 3D vertex positions
    #[arg(short = 'p', long)]
    positions: bool,

    /// Export normal vectors, generating flat normals when the model
    /// has none. Cannot be combined with --smooth-normals
    #[arg(short = 'n', long)]
    normals: bool,

    /// Export normal vectors, generating smooth normals when the model
    /// has none. Cannot be combined with --normals
    #[arg(short = 'N', long)]
    smooth_normals: bool,

    /// Export texture coordinates. Zero is used if the model has none
    #[arg(short = 'u', long)]
    uvs: bool,

    /// Export the second texture coordinate layer
    #[arg(short = '2', long)]
    uvs2: bool,

    /// Export vertex colors. White is used if the model has none.
    /// Cannot be combined with --material-colors
    #[arg(short = 'c', long)]
    colors: bool,

    /// Bake material colors to vertex colors and export. Cannot be
    /// combined with --colors
    #[arg(short = 'C', long)]
    material_colors: bool,

    /// Export tangent vectors and bitangent signs
    #[arg(short = 't', long)]
    tangents: bool,

    /// Flip texture coordinates on the Y axis
    #[arg(short = 'f', long)]
    flip_uvs: bool,

    /// Invert vertex winding order
    #[arg(short = 'i', long)]
    invert_winding: bool,

    /// Convert the model to a Z-up coordinate system
    #[arg(short = 'z', long)]
    z_up: bool,

    /// Override the output file if it already exists
    #[arg(short = 'y', long)]
    overwrite: bool,
}

impl Cli {
    fn intent(&self) -> config::FormatIntent {
        config::FormatIntent {
            positions: self.positions,
            normals: self.normals,
            smooth_normals: self.smooth_normals,
            uvs: self.uvs,
            uvs2: self.uvs2,
            colors: self.colors,
            material_colors: self.material_colors,
            tangents: self.tangents,
            flip_uvs: self.flip_uvs,
            invert_winding: self.invert_winding,
            z_up: self.z_up,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = config::resolve(&cli.intent())?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("bin"));

    if output.exists() && !cli.overwrite && !confirm_overwrite(&output)? {
        return Ok(());
    }

    let mut scene = import::load_scene(&cli.input)?;
    if scene.meshes.is_empty() {
        tracing::info!("Model has no meshes, quitting");
        return Ok(());
    }
    import::generate_missing_normals(&mut scene, &config);

    tracing::info!("Converting {:?} -> {:?}", cli.input, output);

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    let summary = encode::encode_scene(&mut writer, &scene, &config)?;
    writer.flush()?;

    tracing::info!("Vertex format: {}", summary.format);
    tracing::info!("Vertex stride: {} bytes", summary.stride);
    tracing::info!("Primitive type: {}", summary.primitive_type);
    tracing::info!("Up axis: {}", config.up_axis.label());
    tracing::info!(
        "Invert vertex winding: {}",
        if config.invert_winding { "Yes" } else { "No" }
    );
    tracing::info!(
        "Flip UV vertically: {}",
        if config.flip_uvs { "Yes" } else { "No" }
    );
    tracing::info!(
        "Wrote {} vertices ({} bytes) to {:?}",
        summary.vertex_count,
        summary.vertex_count * summary.stride as u64,
        output
    );

    Ok(())
}

/// Interactive y/n prompt for an existing output file. Closed stdin
/// counts as "no".
fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("Output file {:?} already exists! Override it? (y/n): ", path);
    io::stdout().flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim() {
            "y" | "Y" => return Ok(true),
            "n" | "N" => return Ok(false),
            _ => {}
        }
    }
}
