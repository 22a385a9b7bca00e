use clap::Parser;
use curve_svg::{ExportOptions, export_svg, parse_scene};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::Level;

/// Generate an SVG file from the 2D curves of a scene file
#[derive(Parser, Debug)]
#[command(name = "curve-svg", version, about)]
struct Args {
    /// Scene file to read
    input: PathBuf,

    /// Path to output file
    #[arg(short, long, default_value = "output.svg")]
    output: PathBuf,

    /// How many pixels one scene unit represents
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Decimal digits kept for coordinates and angles
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(0..=21))]
    precision: u32,

    /// Write the SVG on one line
    #[arg(short, long)]
    minify: bool,

    /// Log every exported object
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let content = match fs::read_to_string(&args.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input file '{}': {}", args.input.display(), e);
            process::exit(2);
        }
    };

    let scene = match parse_scene(&content) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing scene file: {}", e);
            process::exit(3);
        }
    };

    if scene.curves_2d().next().is_none() {
        eprintln!("You must select a 2D curve: no 2D curve objects in '{}'", args.input.display());
        process::exit(1);
    }

    if !scene.skipped.is_empty() || scene.curves_2d().count() != scene.objects.len() {
        eprintln!("Notice: only 2D curves will be exported");
    }

    let options = ExportOptions {
        scale: args.scale,
        precision: args.precision,
        minify: args.minify,
    };

    let svg = match export_svg(&scene.objects, &options) {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Error exporting SVG: {}", e);
            process::exit(5);
        }
    };

    match fs::write(&args.output, &svg) {
        Ok(_) => {
            println!(
                "Successfully exported '{}' to '{}'",
                args.input.display(),
                args.output.display()
            );
        }
        Err(e) => {
            eprintln!("Error writing output file '{}': {}", args.output.display(), e);
            process::exit(4);
        }
    }
}
