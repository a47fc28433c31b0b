// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL topology CLI

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use stl_topology::cli::{Reporter, Runner};
use stl_topology::geometry::{analyze, refine, Primitive, RefineOptions};
use stl_topology::io::StlWriter;
use stl_topology::TopologyConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "stl-topology")]
#[command(about = "STL topology engine - indexed vertices, edges, faces and incidence", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./stl-topology.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Weld tolerance override (0 = exact equality)
    #[arg(long, global = true)]
    tolerance: Option<f32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an STL file and print topology statistics
    Inspect {
        /// Input STL file
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the incidence record of one vertex, edge or face
    Incidence {
        /// Input STL file
        input: PathBuf,

        #[command(flatten)]
        target: IncidenceTarget,
    },

    /// Re-encode an STL file through the topology
    Convert {
        /// Input STL file
        input: PathBuf,

        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,

        /// Write ASCII STL
        #[arg(long)]
        ascii: bool,
    },

    /// Subdivide every face into four
    Refine {
        /// Input STL file
        input: PathBuf,

        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of subdivision passes
        #[arg(short, long, default_value = "1")]
        levels: u32,

        /// Project vertices onto a sphere of this radius around the origin
        #[arg(long, value_name = "RADIUS")]
        sphere: Option<f32>,
    },

    /// Write a primitive solid (tetrahedron, octahedron, cube)
    Primitive {
        /// Primitive name
        name: String,

        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,

        /// Size or radius
        #[arg(short, long, default_value = "1.0")]
        size: f32,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct IncidenceTarget {
    /// Vertex id
    #[arg(long)]
    vertex: Option<usize>,

    /// Edge id
    #[arg(long)]
    edge: Option<usize>,

    /// Face id
    #[arg(long)]
    face: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = TopologyConfig::from_file(path)?;
            config.apply_env()?;
            config
        }
        None => TopologyConfig::load()?,
    };
    if let Some(tolerance) = cli.tolerance {
        config.weld_tolerance = tolerance;
        config.validate()?;
    }

    let result = match &cli.command {
        Commands::Inspect { input, json } => inspect_command(&config, input, *json),
        Commands::Incidence { input, target } => incidence_command(&config, input, target),
        Commands::Convert {
            input,
            output,
            ascii,
        } => convert_command(&config, input, output, *ascii, cli.verbose),
        Commands::Refine {
            input,
            output,
            levels,
            sphere,
        } => refine_command(&config, input, output, *levels, *sphere, cli.verbose),
        Commands::Primitive { name, output, size } => {
            primitive_command(&config, name, output, *size)
        }
        Commands::Version => {
            println!("stl-topology v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        Reporter::report_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn inspect_command(config: &TopologyConfig, input: &Path, json: bool) -> Result<()> {
    let result = Runner::new(config.clone()).load(input)?;
    let stats = analyze(&result.mesh);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    Reporter::report_load(&display(input), &result, &stats);
    stats.print();
    Reporter::report_warnings(result.mesh.incidence().warnings());
    Ok(())
}

fn incidence_command(config: &TopologyConfig, input: &Path, target: &IncidenceTarget) -> Result<()> {
    let result = Runner::new(config.clone()).load(input)?;
    let topology = result.mesh.topology();
    let incidence = result.mesh.incidence();

    if let Some(id) = target.vertex {
        let record = incidence
            .vertex(id)
            .with_context(|| format!("Vertex {} out of range (0..{})", id, topology.vertex_count()))?;
        Reporter::report_vertex(id, &topology.vertices()[id], record);
    } else if let Some(id) = target.edge {
        let record = incidence
            .edge(id)
            .with_context(|| format!("Edge {} out of range (0..{})", id, topology.edge_count()))?;
        Reporter::report_edge(id, record);
    } else if let Some(id) = target.face {
        let record = incidence
            .face(id)
            .with_context(|| format!("Face {} out of range (0..{})", id, topology.face_count()))?;
        Reporter::report_face(id, record);
    } else {
        bail!("One of --vertex, --edge or --face is required");
    }

    Ok(())
}

fn writer_for(config: &TopologyConfig, ascii: bool) -> StlWriter {
    let writer = StlWriter::from_config(config);
    if ascii && !writer.is_ascii() {
        StlWriter::ascii()
            .with_header(config.header.clone())
            .with_normals(config.normals)
    } else {
        writer
    }
}

fn convert_command(
    config: &TopologyConfig,
    input: &Path,
    output: &Path,
    ascii: bool,
    verbose: bool,
) -> Result<()> {
    let result = Runner::new(config.clone()).load(input)?;

    if verbose {
        Reporter::report_info(&format!(
            "{} faces, {} unique vertices",
            result.mesh.face_count(),
            result.mesh.vertex_count()
        ));
    }

    writer_for(config, ascii)
        .write(output, &result.mesh.topology().face_triangles())
        .with_context(|| format!("Failed to write {}", display(output)))?;

    Reporter::success(&format!("{} -> {}", display(input), display(output)));
    Ok(())
}

fn refine_command(
    config: &TopologyConfig,
    input: &Path,
    output: &Path,
    levels: u32,
    sphere: Option<f32>,
    verbose: bool,
) -> Result<()> {
    let result = Runner::new(config.clone()).load(input)?;

    let options = RefineOptions {
        levels,
        sphere_radius: sphere,
        weld_tolerance: config.weld_tolerance,
    };
    let refined = refine(&result.mesh, &options);

    if verbose {
        Reporter::report_info(&format!(
            "{} -> {} faces after {} level(s)",
            result.mesh.face_count(),
            refined.face_count(),
            levels
        ));
    }

    StlWriter::from_config(config)
        .write(output, &refined.topology().face_triangles())
        .with_context(|| format!("Failed to write {}", display(output)))?;

    Reporter::success(&format!(
        "Refined {} -> {} ({} faces)",
        display(input),
        display(output),
        refined.face_count()
    ));
    Ok(())
}

fn primitive_command(config: &TopologyConfig, name: &str, output: &Path, size: f32) -> Result<()> {
    let Some(primitive) = Primitive::from_name(name, size) else {
        bail!(
            "Unsupported primitive: {} (expected tetrahedron, octahedron or cube)",
            name
        );
    };

    let triangles = primitive.triangles();
    StlWriter::from_config(config)
        .write(output, &triangles)
        .with_context(|| format!("Failed to write {}", display(output)))?;

    Reporter::success(&format!("Wrote {} triangles to {}", triangles.len(), display(output)));
    Ok(())
}
