//! vcad-draft - drawing views from the command line
//!
//! Builds one of the reference shapes, projects it, and writes the drawing
//! geometry as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use vcad_kernel_brep::{make_box, make_cylinder, make_spline_wire, BSplineCurve, Shape};
use vcad_kernel_drafting::{project_views, DraftingSettings, GeometryObject};
use vcad_kernel_math::{Point3, Vec3};

#[derive(Parser)]
#[command(name = "vcad-draft")]
#[command(about = "Extract 2D drawing views from vcad shapes", long_about = None)]
struct Cli {
    /// TOML file with drafting settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a shape along one direction
    Project {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Direction toward the viewer, as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,1")]
        direction: Vec3,
        /// Drawing X axis, as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "1,0,0")]
        x_axis: Vec3,
        /// Also extract hidden edges
        #[arg(long)]
        hidden: bool,
        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Project the front, top, and right views in parallel
    Views {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Also extract hidden edges
        #[arg(long)]
        hidden: bool,
        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a summary of one projected view
    Info {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Direction toward the viewer, as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,1")]
        direction: Vec3,
        /// Drawing X axis, as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "1,0,0")]
        x_axis: Vec3,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeKind {
    Box,
    Cylinder,
    Spline,
}

#[derive(Args)]
struct ShapeArgs {
    /// Shape to build
    #[arg(long, value_enum, default_value_t = ShapeKind::Box)]
    shape: ShapeKind,
    /// Box size, as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "10,10,10")]
    size: Vec3,
    /// Cylinder radius
    #[arg(long, default_value_t = 5.0)]
    radius: f64,
    /// Cylinder height
    #[arg(long, default_value_t = 10.0)]
    height: f64,
    /// Spline degree
    #[arg(long, default_value_t = 3)]
    degree: usize,
}

/// Standard views as (direction, x axis).
const STANDARD_VIEWS: [(&str, [f64; 3], [f64; 3]); 3] = [
    ("front", [0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
    ("top", [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ("right", [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => DraftingSettings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => DraftingSettings::default(),
    };

    match cli.command {
        Commands::Project {
            shape,
            direction,
            x_axis,
            hidden,
            output,
        } => {
            let shape = build_shape(&shape)?;
            let mut view = GeometryObject::new(settings);
            view.extract_geometry(&shape, direction, x_axis, hidden)?;
            write_json(&serde_json::to_string_pretty(&view)?, output.as_ref())?;
        }
        Commands::Views {
            shape,
            hidden,
            output,
        } => {
            let shape = build_shape(&shape)?;
            let views: Vec<(Vec3, Vec3)> = STANDARD_VIEWS
                .iter()
                .map(|(_, d, x)| (Vec3::from(*d), Vec3::from(*x)))
                .collect();
            let objects = project_views(&shape, &views, &settings, hidden)?;
            let mut named = serde_json::Map::new();
            for ((name, _, _), obj) in STANDARD_VIEWS.iter().zip(objects) {
                named.insert(name.to_string(), serde_json::to_value(obj)?);
            }
            write_json(&serde_json::to_string_pretty(&named)?, output.as_ref())?;
        }
        Commands::Info {
            shape,
            direction,
            x_axis,
        } => {
            let shape = build_shape(&shape)?;
            let mut view = GeometryObject::new(settings);
            view.extract_geometry(&shape, direction, x_axis, true)?;
            show_info(&view);
        }
    }

    Ok(())
}

fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<std::result::Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected 3 comma-separated numbers, got {}", parts.len())),
    }
}

fn build_shape(args: &ShapeArgs) -> Result<Shape> {
    let shape = match args.shape {
        ShapeKind::Box => make_box(args.size.x, args.size.y, args.size.z)?,
        ShapeKind::Cylinder => make_cylinder(args.radius, args.height)?,
        ShapeKind::Spline => {
            // Zig-zag control polygon in the XY plane.
            let count = (args.degree + 1).max(6);
            let points = (0..count)
                .map(|i| Point3::new(2.0 * i as f64, (i % 2) as f64, 0.0))
                .collect();
            make_spline_wire(BSplineCurve::clamped_uniform(points, args.degree)?)?
        }
    };
    Ok(shape)
}

fn write_json(json: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn show_info(view: &GeometryObject) {
    let bbox = view.bounding_box();
    println!("Edges: {}", view.edge_geometry().len());
    println!("  Visible: {}", view.visible_edges().count());
    println!("  Hidden: {}", view.hidden_edges().count());
    println!("Vertices: {}", view.vertex_geometry().len());
    println!("Faces: {}", view.face_geometry().len());
    if bbox.is_valid() {
        println!("Extent: {:.3} x {:.3}", bbox.width(), bbox.height());
    }

    println!("\nEdges:");
    for (edge, reference) in view.edge_geometry().iter().zip(view.edge_references()) {
        println!(
            "  {:?} {:?} (edge {})",
            edge.extract_type(),
            edge.geom().kind(),
            reference
        );
    }
}
