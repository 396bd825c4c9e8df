//! U-BinFit command-line runner.

mod report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use u_binfit_core::{Allocator, ProgressInfo};
use u_binfit_ffi::{build_config, build_inputs, PackRequest, PackResponse};
use u_binfit_packer::{Allocation, GreedyPacker};

#[derive(Parser)]
#[command(name = "ubinfit")]
#[command(about = "Greedy shipment-to-bin allocation")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate a JSON request and print the response
    Pack {
        /// Path to the JSON request file
        request: PathBuf,

        /// Stream one snapshot JSON line per unit commit to stderr
        #[arg(long)]
        progress: bool,

        /// Time limit in milliseconds (overrides the request config)
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Stop after this many unit commits (overrides the request config)
        #[arg(short, long)]
        max_placements: Option<usize>,

        /// Write the response to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the response JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Parse and validate a JSON request without allocating
    Check {
        /// Path to the JSON request file
        request: PathBuf,
    },

    /// Print a commit-by-commit trace and a per-bin fill summary
    Replay {
        /// Path to the JSON request file
        request: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; library `log` records are forwarded to it.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Pack {
            request,
            progress,
            time_limit,
            max_placements,
            output,
            pretty,
        } => {
            let mut request = load_request(&request)?;
            let config = request.config.get_or_insert_with(Default::default);
            if time_limit.is_some() {
                config.time_limit_ms = time_limit;
            }
            if max_placements.is_some() {
                config.max_placements = max_placements;
            }

            let response = pack(request, progress)?;
            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Response saved to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Check { request } => {
            let request = load_request(&request)?;
            let (shipments, bins) = build_inputs(&request)?;
            build_config(request.config.as_ref())?;
            print!("{}", report::describe_inputs(&shipments, &bins));
        }

        Commands::Replay { request } => {
            let request = load_request(&request)?;
            let (shipments, bins) = build_inputs(&request)?;

            let mut allocation = Allocation::new(shipments, bins)?;
            println!(
                "Replaying {} units over {} bins",
                allocation.total_units(),
                allocation.bins().len()
            );
            while let Some(event) = allocation.step() {
                println!("{}", report::trace_line(&event));
            }

            print!("{}", report::fill_summary(&allocation.into_result()));
        }
    }

    Ok(())
}

fn load_request(path: &Path) -> anyhow::Result<PackRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let request: PackRequest = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    tracing::info!(
        shipments = request.shipments.len(),
        bins = request.bins.len(),
        "Loaded request from {}",
        path.display()
    );
    Ok(request)
}

fn pack(request: PackRequest, progress: bool) -> anyhow::Result<PackResponse> {
    let (shipments, bins) = build_inputs(&request)?;
    let packer = GreedyPacker::new(build_config(request.config.as_ref())?);

    let result = if progress {
        let stderr = std::io::stderr();
        let mut on_progress = |info: &ProgressInfo<'_>| {
            if let Err(e) = report::write_snapshot(&mut stderr.lock(), info) {
                tracing::warn!("{:#}", e);
            }
            true
        };
        packer.allocate_with_progress(&shipments, &bins, &mut on_progress)?
    } else {
        packer.allocate(&shipments, &bins)?
    };

    Ok(PackResponse::from(result))
}
