//! Merges sorted integer lists given on the command line.

use anyhow::{Context, Result};
use clap::Parser;
use kway::{List, Strategy};
use kway_demos::{init_tracing, parse_list, render};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(about = "Merges sorted, comma-separated integer lists")]
struct Args {
    /// `heap` or `pairwise`.
    #[arg(long, default_value_t = Strategy::Heap)]
    strategy: Strategy,

    /// Comma-separated non-decreasing integers; an empty argument is an empty list.
    lists: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let lists = args
        .lists
        .iter()
        .enumerate()
        .map(|(i, l)| parse_list(l).with_context(|| format!("list {i}: `{l}`")))
        .collect::<Result<Vec<_>>>()?;
    debug!(lists = lists.len(), strategy = %args.strategy, "merging");

    let merged = List::merge_k_with(args.strategy, lists);
    println!("{}", render(&merged));
    Ok(())
}
