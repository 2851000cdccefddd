//! Runs parallel writers against one shared map and prints its final size.

use anyhow::{ensure, Result};
use clap::Parser;
use kway::{run_writers, run_writers_async, verify, SharedMap, WriterConfig};
use kway_demos::init_tracing;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Parallel writers upserting overlapping keys into one concurrent map")]
struct Args {
    /// Number of parallel writers.
    #[arg(long, default_value_t = 2)]
    writers: usize,

    /// Number of keys each writer writes.
    #[arg(long, default_value_t = 1000)]
    keys: usize,

    /// Run the writers as tokio tasks instead of threads.
    #[arg(long = "async")]
    use_async: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = WriterConfig {
        writers: args.writers,
        keys_per_writer: args.keys,
    };
    info!(?config, use_async = args.use_async, "running writers");

    let map = Arc::new(SharedMap::default());
    let report = if args.use_async {
        tokio::runtime::Runtime::new()?.block_on(run_writers_async(map.clone(), &config))?
    } else {
        run_writers(&map, &config)?
    };
    info!(writes = report.writes, "all writers finished");
    ensure!(
        verify(&map, &config),
        "map does not hold the expected entries"
    );

    println!("Map size: {}", map.len());
    Ok(())
}
