//! `tablehop run <url>` — harvest a listing site into a workbook.

use crate::export::xlsx::XlsxSink;
use crate::fetch::RenderOptions;
use crate::pipeline::{Pipeline, RunRequest};
use crate::progress::{self, ProgressEventKind};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

/// Settings collected from the command line.
pub struct RunArgs {
    pub listing_url: String,
    pub output_path: PathBuf,
    pub trusted_frame_origin: String,
    pub nav_timeout_ms: u64,
    pub settle_timeout_ms: u64,
    pub manual_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Run the harvest command.
pub async fn run(args: RunArgs) -> Result<()> {
    let renderer: Arc<dyn Renderer> = Arc::new(
        ChromiumRenderer::new()
            .await
            .context("failed to start browser")?,
    );
    info!("Chromium renderer initialized");

    let request = RunRequest {
        listing_url: args.listing_url,
        output_path: args.output_path,
        trusted_frame_origin: args.trusted_frame_origin,
        render: RenderOptions {
            nav_timeout_ms: args.nav_timeout_ms,
            settle_timeout_ms: args.settle_timeout_ms,
            ..RenderOptions::default()
        },
        manual_dir: args.manual_dir,
    };

    let (tx, rx) = progress::channel();
    let display = if args.quiet || args.json {
        drop(rx);
        None
    } else {
        Some(tokio::spawn(render_progress(rx)))
    };

    let pipeline = Pipeline::new(Arc::clone(&renderer)).with_progress(tx);
    let mut sink = XlsxSink::new();
    let result = pipeline.run(&request, &mut sink).await;

    if let Some(handle) = display {
        // The sender lives in `pipeline`; dropping it ends the display task.
        drop(pipeline);
        let _ = handle.await;
    }
    let _ = renderer.shutdown().await;

    let summary = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !args.quiet {
        println!(
            "Processed {} of {} items ({} skipped) in {:.1}s",
            summary.processed,
            summary.total,
            summary.skipped,
            summary.elapsed_ms as f64 / 1000.0
        );
        println!("Wrote {}", request.output_path.display());
    }

    Ok(())
}

/// Drive an indicatif bar from pipeline progress events.
async fn render_progress(mut rx: progress::ProgressReceiver) {
    let mut bar: Option<ProgressBar> = None;

    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        };

        match event.event {
            ProgressEventKind::ListingFetched { item_count, .. } => {
                let b = ProgressBar::new(item_count as u64);
                b.set_style(
                    ProgressStyle::with_template("[{bar:30}] {pos}/{len} {msg}")
                        .expect("static template")
                        .progress_chars("=> "),
                );
                bar = Some(b);
            }
            ProgressEventKind::ItemStarted { name, .. } => {
                if let Some(b) = &bar {
                    b.set_message(name);
                }
            }
            ProgressEventKind::ItemCompleted { .. } => {
                if let Some(b) = &bar {
                    b.inc(1);
                }
            }
            ProgressEventKind::ItemSkipped { name, reason } => {
                if let Some(b) = &bar {
                    b.inc(1);
                    b.println(format!("skipped {name}: {reason}"));
                }
            }
            ProgressEventKind::RunCompleted { .. } => {
                if let Some(b) = bar.take() {
                    b.finish_and_clear();
                }
                break;
            }
        }
    }
}
