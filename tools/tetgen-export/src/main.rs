//! tetgen-export - Tetgen .smesh export tool
//!
//! Converts polygon meshes (OBJ, glTF/GLB) into Tetgen piecewise linear
//! complex files (.smesh)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use modules from library
use tetgen_export::{config, mesh, AxisMode, ExportSession};

#[derive(Parser)]
#[command(name = "tetgen-export")]
#[command(about = "Tetgen .smesh export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export meshes to .smesh
    Export {
        /// Input mesh files (OBJ/glTF/GLB)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output .smesh file for the first input; later inputs are written
        /// next to the previous export
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Axis mode: xyz, xzy, xz-y or -xzy (overrides config)
        #[arg(short, long, allow_hyphen_values = true)]
        axis: Option<AxisMode>,

        /// Object (OBJ) or mesh (glTF) name to export
        #[arg(short, long)]
        mesh: Option<String>,

        /// Fan-triangulate polygons before writing
        #[arg(long)]
        triangulate: bool,

        /// Config file (default: user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show or change persisted settings
    Config {
        /// Config file (default: user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Store a new default axis mode
        #[arg(long, allow_hyphen_values = true)]
        swap_axis: Option<String>,
    },
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

    match cli.command {
        Commands::Export {
            inputs,
            output,
            axis,
            mesh: mesh_name,
            triangulate,
            config,
        } => {
            let mut session = ExportSession::new(config::load_or_default(config.as_deref()));
            let mut output = output;

            for input in &inputs {
                let output = output
                    .take()
                    .unwrap_or_else(|| session.suggested_output(input));
                tracing::info!("Converting {:?} -> {:?}", input, output);

                let mut snapshot = mesh::load_mesh(input, mesh_name.as_deref())?;
                if triangulate {
                    snapshot = snapshot.triangulated();
                }

                let request = session.request(output, snapshot, axis)?;
                session
                    .export(request)
                    .with_context(|| format!("Failed to export {:?}", input))?;
            }
            tracing::info!("Done!");
        }

        Commands::Config { config, swap_axis } => {
            let path = config
                .or_else(config::default_config_path)
                .context("No config directory available, pass --config")?;
            let mut settings = config::load_or_default(Some(&path));

            if let Some(value) = swap_axis {
                let mode = settings.set_swap_axis(&value)?;
                settings.save_to(&path)?;
                tracing::info!("Saved swap_axis = {} to {:?}", mode, path);
            }

            println!("config: {}", path.display());
            println!("swap_axis = {:?}", settings.export.swap_axis);
        }
    }

    Ok(())
}
