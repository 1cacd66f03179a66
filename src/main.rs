use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use network_degree_modifier::stats::compare;
use network_degree_modifier::{data, storage, ModifierConfig, TopologyModifier};

#[derive(Parser, Debug)]
#[clap(
    name = "network-degree-modifier",
    about = "Grow or shrink a network toward a target edge count while keeping it connected"
)]
struct Cli {
    /// Path to input edge table (CSV or Parquet) with source and target columns
    #[clap(long)]
    input: PathBuf,

    /// Path for the modified edge table (defaults to modified_<input>)
    #[clap(long)]
    output: Option<PathBuf>,

    /// Multiplier applied to the current edge count (values below 1 shrink)
    #[clap(long, default_value = "1.2")]
    change_factor: f64,

    /// Minimum number of edges in the result
    #[clap(long)]
    min_edges: Option<usize>,

    /// Maximum number of edges in the result (wins over --min-edges)
    #[clap(long)]
    max_edges: Option<usize>,

    /// Base path for the statistics report (.json and .csv are written)
    #[clap(long)]
    stats_output: Option<PathBuf>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

/// `modified_<name>` next to the input file
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "network.csv".to_string());
    input.with_file_name(format!("modified_{}", name))
}

/// `<output stem>_stats` next to the output file
fn default_stats_base(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "network".to_string());
    output.with_file_name(format!("{}_stats", stem))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let output = args.output.clone().unwrap_or_else(|| default_output(&args.input));
    let stats_base = args
        .stats_output
        .clone()
        .unwrap_or_else(|| default_stats_base(&output));

    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", output.display());

    let config = ModifierConfig::new(args.change_factor, args.min_edges, args.max_edges);
    config.validate()?;

    // 1. Load edge table
    let table = data::load_edge_table(&args.input)?;

    // 2. Modify topology
    let modifier = TopologyModifier::new(config);
    let result = modifier.modify(table.edges.iter().map(|(s, t)| (s.as_str(), t.as_str())))?;

    if result.mutation.shortfall() > 0 {
        log::warn!(
            "Target of {} edges not reached: {} short",
            result.target_edges,
            result.mutation.shortfall()
        );
    }

    // 3. Save results
    storage::save_modified_table(&table, &result.edges, &output)?;
    storage::save_statistics(&result, &stats_base)?;

    // 4. Summary
    log::info!("Network Modification Summary:");
    for row in compare(&result.original_stats, &result.new_stats) {
        log::info!(
            "  {:<22} {:>12} -> {:>12} ({})",
            row.metric,
            row.original.to_string(),
            row.modified.to_string(),
            row.change_display()
        );
    }
    log::info!("Modified network saved to: {}", output.display());

    Ok(())
}
