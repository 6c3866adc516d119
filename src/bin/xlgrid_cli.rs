//! CLI tool for xlgrid - renders a sheet model headlessly and prints what was painted
//!
//! Usage:
//!   xlgrid_cli <sheet.json>                          # Paint records to stdout
//!   xlgrid_cli <sheet.json> --scroll-y 400 -o out.json
//!   xlgrid_cli <sheet.json> --commands               # Include draw commands

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use xlgrid::render::{CellPaintRecord, DrawCommand};
use xlgrid::{Callbacks, GridOptions, RecordingSurface, RenderStats, Sheet, SheetCanvas};

#[derive(Parser)]
#[command(about = "Render a JSON sheet model headlessly and print the painted cells.")]
struct Args {
    /// Sheet model as JSON.
    sheet: PathBuf,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Horizontal scroll offset.
    #[arg(long, default_value_t = 0.0)]
    scroll_x: f64,

    /// Vertical scroll offset.
    #[arg(long, default_value_t = 0.0)]
    scroll_y: f64,

    /// Device pixel ratio of the virtual surface.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Rendering options as JSON.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Include the recorded draw commands in the output.
    #[arg(long)]
    commands: bool,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    stats: RenderStats,
    content_width: f64,
    content_height: f64,
    scroll_x: f64,
    scroll_y: f64,
    cells: &'a [CellPaintRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    commands: Option<&'a [DrawCommand]>,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .try_init();

    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> xlgrid::Result<()> {
    let sheet = Sheet::from_json(&fs::read_to_string(&args.sheet)?)?;
    let options = match &args.options {
        Some(path) => GridOptions::from_json(&fs::read_to_string(path)?)?,
        None => GridOptions::default(),
    };

    let mut grid = SheetCanvas::mount(
        sheet,
        RecordingSurface::new(),
        (args.width, args.height),
        args.dpr,
        options,
        Callbacks::default(),
    )?;
    grid.surface_mut().take();
    let stats = grid
        .scroll_to(args.scroll_x, args.scroll_y)
        .unwrap_or_default();

    let (content_width, content_height) = grid.content_size();
    let position = grid.scroll().position();
    let report = Report {
        stats,
        content_width,
        content_height,
        scroll_x: position.scroll_left,
        scroll_y: position.scroll_top,
        cells: grid.cells_info(),
        commands: args.commands.then(|| grid.surface().commands()),
    };
    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
