// Copyright 2026 Tablehop Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tablehop::cli;
use tablehop::extract::frame::DEFAULT_TRUSTED_ORIGIN;

#[derive(Parser)]
#[command(
    name = "tablehop",
    about = "Tablehop — two-hop table harvester for script-rendered listing sites",
    version,
    after_help = "Run 'tablehop <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest a listing site into a workbook
    Run {
        /// Root listing page URL
        url: String,
        /// Output workbook path
        #[arg(long, default_value = "tables.xlsx")]
        out: PathBuf,
        /// Origin prefix a frame source must carry to be trusted
        #[arg(long, default_value = DEFAULT_TRUSTED_ORIGIN)]
        frame_origin: String,
        /// Navigation timeout in milliseconds
        #[arg(long, default_value = "30000")]
        nav_timeout_ms: u64,
        /// Upper bound on the render settle wait in milliseconds
        #[arg(long, default_value = "10000")]
        settle_timeout_ms: u64,
        /// Also dump fetched manual texts as files into this directory
        #[arg(long)]
        manual_dir: Option<PathBuf>,
    },
    /// Check environment and diagnose issues
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "tablehop=debug"
    } else if cli.quiet {
        "tablehop=warn"
    } else {
        "tablehop=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            url,
            out,
            frame_origin,
            nav_timeout_ms,
            settle_timeout_ms,
            manual_dir,
        } => {
            cli::run_cmd::run(cli::run_cmd::RunArgs {
                listing_url: url,
                output_path: out,
                trusted_frame_origin: frame_origin,
                nav_timeout_ms,
                settle_timeout_ms,
                manual_dir,
                json: cli.json,
                quiet: cli.quiet,
            })
            .await
        }
        Commands::Doctor => cli::doctor::run().await,
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
