//! koshi: headless inspector for grid cells.
//!
//! Reads cells as JSON (rows of cells, the same shape the record services
//! produce) and runs them through the grid without a window.
//!
//! Usage:
//!   # Draw-op log of a whole grid
//!   koshi render cells.json --column-width 160
//!
//!   # Row heights at a given column width
//!   koshi measure cells.json --column-width 90
//!
//!   # Kind, accessibility text and data problems per cell
//!   koshi describe cells.json
//!
//!   # What a paste would turn a cell into
//!   echo '{"type":"Number","data":1,"displayData":"1"}' | koshi paste - 42
//!
//! `-` reads from stdin. Logs go to stderr; set RUST_LOG=debug for detail.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kurbo::Rect;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use koshi_grid::{GridCanvas, MonospaceMetrics, PlacedCell, RecordingSurface};
use koshi_types::{Cell, CellLocation};

/// Headless inspector for koshi grid cells.
#[derive(Parser, Debug)]
#[command(name = "koshi")]
#[command(about = "Render, measure and describe koshi grid cells without a window")]
struct Args {
    /// Theme script to use instead of ~/.config/koshi/theme.rhai
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint every cell and print the recorded draw operations
    Render {
        /// JSON file with an array of rows, each an array of cells (- for stdin)
        input: PathBuf,

        #[arg(long, default_value_t = 160.0)]
        column_width: f64,

        /// Frame time in Unix millis (defaults to now)
        #[arg(long)]
        now: Option<u64>,
    },

    /// Print the height of each row
    Measure {
        input: PathBuf,

        #[arg(long, default_value_t = 160.0)]
        column_width: f64,
    },

    /// Print kind, accessibility text and validation result per cell
    Describe { input: PathBuf },

    /// Paste text into a single cell and print the resulting cell
    Paste {
        /// JSON file with one cell (- for stdin)
        cell: PathBuf,
        text: String,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let theme = match &args.theme {
        Some(path) => koshi_grid::load_theme_from_file(path)
            .with_context(|| format!("loading theme {}", path.display()))?,
        None => koshi_grid::load_theme(),
    };
    let canvas = GridCanvas::new(theme);

    match args.command {
        Command::Render {
            input,
            column_width,
            now,
        } => render(&canvas, &read_rows(&input)?, column_width, now),
        Command::Measure {
            input,
            column_width,
        } => {
            for (row, height) in row_heights(&canvas, &read_rows(&input)?, column_width)
                .into_iter()
                .enumerate()
            {
                println!("row {row}: {height:.1}");
            }
            Ok(())
        }
        Command::Describe { input } => {
            describe(&canvas, &read_rows(&input)?);
            Ok(())
        }
        Command::Paste { cell, text } => {
            let cell: Cell = serde_json::from_str(&read_input(&cell)?).context("parsing cell")?;
            match canvas.paste(&text, &cell) {
                Some(pasted) => println!("{}", serde_json::to_string_pretty(&pasted)?),
                None => println!("rejected"),
            }
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).with_context(|| format!("parsing cells from {}", path.display()))
}

fn row_heights(canvas: &GridCanvas, rows: &[Vec<Cell>], column_width: f64) -> Vec<f64> {
    rows.iter()
        .map(|row| {
            let cells: Vec<(f64, &Cell)> = row.iter().map(|c| (column_width, c)).collect();
            canvas.measure_row(&MonospaceMetrics, &cells)
        })
        .collect()
}

fn render(canvas: &GridCanvas, rows: &[Vec<Cell>], column_width: f64, now: Option<u64>) -> Result<()> {
    let heights = row_heights(canvas, rows, column_width);
    let mut placed = Vec::new();
    let mut y = 0.0_f64;
    for (r, (row, &height)) in rows.iter().zip(&heights).enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let x = c as f64 * column_width;
            let rect = Rect::new(x, y, x + column_width, y + height);
            placed.push(PlacedCell::new(CellLocation::new(r, c), rect, cell.clone()));
        }
        y += height;
    }

    let mut surface = RecordingSurface::new();
    let now = now.unwrap_or_else(koshi_types::now_millis);
    let stats = canvas.paint_frame_at(&mut surface, &placed, now);
    for op in surface.ops() {
        println!("{op}");
    }
    info!(
        cells = stats.cells,
        errors = stats.errors,
        highlighted = stats.highlighted,
        pending_images = canvas.take_image_requests().len(),
        "frame painted"
    );
    Ok(())
}

fn describe(canvas: &GridCanvas, rows: &[Vec<Cell>]) {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let location = CellLocation::new(r, c);
            let status = match cell.validate() {
                Ok(()) => "ok".to_string(),
                Err(e) => format!("malformed: {e}"),
            };
            println!(
                "{location}\t{}\t{:?}\t{status}",
                cell.kind(),
                canvas.accessibility_text(cell)
            );
        }
    }
}
