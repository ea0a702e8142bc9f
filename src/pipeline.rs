// Copyright 2026 Tablehop Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pipeline driver: sequence the whole harvest over the listing.
//!
//! Items are processed strictly one at a time, in listing order. Per-item
//! failures (a fetch error, a detail page without a qualifying frame, a
//! frame without a table) are skips: logged, counted, and the run moves
//! on. Only two failures are fatal: the root listing page cannot be
//! fetched, or the workbook cannot be written.

use crate::assemble::{assemble, write_record};
use crate::enrich::{Enricher, ManualCache};
use crate::error::HarvestError;
use crate::export::TableSink;
use crate::extract::frame::resolve_frame_source;
use crate::extract::listing::{extract_listing, ListingItem};
use crate::extract::table::parse_table;
use crate::fetch::{fetch_rendered, RenderOptions};
use crate::progress::{emit, ProgressEventKind, ProgressSender};
use crate::renderer::Renderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Everything one harvest run needs to know.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Root listing page.
    pub listing_url: String,
    /// Workbook output path.
    pub output_path: PathBuf,
    /// Origin prefix a frame source must carry to be trusted.
    pub trusted_frame_origin: String,
    /// Rendering/settle timing.
    pub render: RenderOptions,
    /// When set, fetched manual texts are also dumped as files here.
    pub manual_dir: Option<PathBuf>,
}

/// Outcome counters for a completed run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub elapsed_ms: u64,
}

/// Why an item was skipped. Skips are outcomes, not errors; the run
/// continues.
#[derive(Debug)]
enum Skip {
    FrameSourceMissing,
    TableMissing,
    Fetch(HarvestError),
    Sink(HarvestError),
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FrameSourceMissing => write!(f, "no qualifying frame source on detail page"),
            Self::TableMissing => write!(f, "frame document contains no table"),
            Self::Fetch(e) => write!(f, "{e}"),
            Self::Sink(e) => write!(f, "sink rejected record: {e}"),
        }
    }
}

/// The harvest pipeline.
pub struct Pipeline {
    renderer: Arc<dyn Renderer>,
    progress: Option<ProgressSender>,
}

impl Pipeline {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            progress: None,
        }
    }

    /// Attach a progress event channel.
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Run the harvest: listing → per-item chain → workbook write.
    pub async fn run(
        &self,
        request: &RunRequest,
        sink: &mut dyn TableSink,
    ) -> Result<RunSummary, HarvestError> {
        let start = Instant::now();
        let mut seq = 0u64;

        // Fatal if the root listing cannot be fetched.
        let listing = fetch_rendered(self.renderer.as_ref(), &request.listing_url, &request.render)
            .await?;
        let items = extract_listing(&listing.html, &listing.url);
        info!("extracted {} items from {}", items.len(), listing.url);
        emit(
            &self.progress,
            &mut seq,
            ProgressEventKind::ListingFetched {
                url: listing.url.clone(),
                item_count: items.len(),
            },
        );

        let mut cache = ManualCache::new();
        let mut processed = 0usize;
        let mut skipped = 0usize;

        for (index, item) in items.iter().enumerate() {
            emit(
                &self.progress,
                &mut seq,
                ProgressEventKind::ItemStarted {
                    name: item.name.clone(),
                    index,
                    total: items.len(),
                },
            );

            match self.process_item(request, item, &mut cache, sink).await {
                Ok(()) => {
                    processed += 1;
                    info!("processed {processed} of {} ({})", items.len(), item.name);
                    emit(
                        &self.progress,
                        &mut seq,
                        ProgressEventKind::ItemCompleted {
                            name: item.name.clone(),
                            done: processed + skipped,
                            total: items.len(),
                        },
                    );
                }
                Err(skip) => {
                    skipped += 1;
                    warn!("skipping {}: {skip}", item.name);
                    emit(
                        &self.progress,
                        &mut seq,
                        ProgressEventKind::ItemSkipped {
                            name: item.name.clone(),
                            reason: skip.to_string(),
                        },
                    );
                }
            }
        }

        // Fatal if the workbook cannot be written.
        sink.write(&request.output_path)?;

        let summary = RunSummary {
            total: items.len(),
            processed,
            skipped,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "run complete: {} of {} processed, {} skipped, {}ms",
            summary.processed, summary.total, summary.skipped, summary.elapsed_ms
        );
        emit(
            &self.progress,
            &mut seq,
            ProgressEventKind::RunCompleted {
                total: summary.total,
                processed: summary.processed,
                skipped: summary.skipped,
                elapsed_ms: summary.elapsed_ms,
            },
        );

        Ok(summary)
    }

    /// Walk one item's indirection chain: detail page → frame source →
    /// frame document → table → enriched record.
    async fn process_item(
        &self,
        request: &RunRequest,
        item: &ListingItem,
        cache: &mut ManualCache,
        sink: &mut dyn TableSink,
    ) -> Result<(), Skip> {
        let renderer = self.renderer.as_ref();

        let detail = fetch_rendered(renderer, &item.detail_url, &request.render)
            .await
            .map_err(Skip::Fetch)?;

        let Some(frame_src) = resolve_frame_source(&detail.html, &request.trusted_frame_origin)
        else {
            return Err(Skip::FrameSourceMissing);
        };

        let frame = fetch_rendered(renderer, &frame_src, &request.render)
            .await
            .map_err(Skip::Fetch)?;

        let Some(table) = parse_table(&frame.html) else {
            return Err(Skip::TableMissing);
        };

        let enricher = Enricher::new(renderer, &request.render)
            .with_manual_dir(request.manual_dir.as_deref());
        let (values, annotations) = enricher.enrich_table(&item.name, &table, cache).await;

        let record = assemble(item, &table, values, annotations);
        write_record(sink, &record).map_err(Skip::Sink)
    }
}
