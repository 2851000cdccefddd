//! Plans the rolling order of the pieces listed in a file.

use anyhow::{Context, Result};
use clap::Parser;
use kway::Sequencing;
use kway_demos::{init_tracing, mean_thickness_change, parse_piece};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Reorders pieces in casting order for smooth thickness transitions")]
struct Args {
    /// `orientation` or `endpoints`.
    #[arg(long, default_value_t = Sequencing::Orientation)]
    sequencing: Sequencing,

    /// One piece per line: `id,width,thickness,inner grade,grade,min next,max next,min
    /// tolerated,max tolerated`. Blank lines and lines starting with `#` are skipped.
    pieces: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let input = fs::read_to_string(&args.pieces)
        .with_context(|| format!("reading {}", args.pieces.display()))?;
    let pieces = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .enumerate()
        .map(|(sequence, (line_nr, line))| {
            parse_piece(line, sequence).with_context(|| format!("line {}", line_nr + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(pieces = pieces.len(), sequencing = %args.sequencing, "planning");

    let before = mean_thickness_change(&pieces);
    let planned = args.sequencing.plan(pieces);
    for piece in &planned {
        println!("{}: {} {}", piece.sequence, piece.id, piece.thickness);
    }
    println!("Mean thickness change: {before:.3} -> {:.3}", mean_thickness_change(&planned));
    Ok(())
}
