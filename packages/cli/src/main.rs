#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the hotspot analysis tool.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hotspot_map_cli::pipeline::{self, DEFAULT_EPS_METERS, DEFAULT_MIN_PTS, PipelineParams};
use hotspot_map_report::SourceStats;

#[derive(Parser)]
#[command(name = "hotspot_map", about = "Crime incident hotspot analysis tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and write static charts plus a Markdown summary
    Report {
        /// Path to the incident CSV file
        input: PathBuf,
        /// Output directory for report artifacts
        #[arg(long, default_value = "report")]
        out: PathBuf,
        /// DBSCAN neighborhood radius in meters
        #[arg(long, default_value_t = DEFAULT_EPS_METERS)]
        eps: f64,
        /// DBSCAN minimum neighbor count
        #[arg(long, default_value_t = DEFAULT_MIN_PTS)]
        min_pts: usize,
    },
    /// Run the pipeline once, then serve the interactive dashboard API
    Serve {
        /// Path to the incident CSV file
        input: PathBuf,
        /// Directory of frontend static files to serve at `/`
        #[arg(long)]
        static_dir: Option<PathBuf>,
        /// DBSCAN neighborhood radius in meters
        #[arg(long, default_value_t = DEFAULT_EPS_METERS)]
        eps: f64,
        /// DBSCAN minimum neighbor count
        #[arg(long, default_value_t = DEFAULT_MIN_PTS)]
        min_pts: usize,
    },
    /// Load and clean only, then print a dataset summary
    Inspect {
        /// Path to the incident CSV file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            out,
            eps,
            min_pts,
        } => {
            let params = PipelineParams {
                eps_meters: eps,
                min_pts,
            };
            let output = pipeline::run(&input, &params)?;
            let artifacts = hotspot_map_report::generate_report(
                &output.snapshot,
                SourceStats {
                    total_rows: output.total_rows,
                    dropped_missing_coords: output.dropped_missing_coords,
                },
                &out,
            )?;
            log::info!("Report complete: {} artifact(s)", artifacts.files.len());
        }
        Commands::Serve {
            input,
            static_dir,
            eps,
            min_pts,
        } => {
            let params = PipelineParams {
                eps_meters: eps,
                min_pts,
            };
            let output = pipeline::run(&input, &params)?;
            let snapshot = Arc::new(output.snapshot);

            // The server uses actix-web's runtime, so run it in a blocking
            // task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(hotspot_map_server::run_server(snapshot, static_dir))
            })
            .await??;
        }
        Commands::Inspect { input } => {
            let outcome = hotspot_map_ingest::load_incidents(&input)?;
            println!("{:<28} COUNT", "METRIC");
            println!("{}", "-".repeat(40));
            println!("{:<28} {}", "rows read", outcome.total_rows);
            println!(
                "{:<28} {}",
                "dropped (no coordinates)", outcome.dropped_missing_coords
            );
            println!("{:<28} {}", "cleaned incidents", outcome.incidents.len());

            let categories: std::collections::BTreeSet<&str> = outcome
                .incidents
                .iter()
                .map(|i| i.category.as_str())
                .collect();
            println!("{:<28} {}", "distinct categories", categories.len());
        }
    }

    Ok(())
}
