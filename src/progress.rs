// Copyright 2026 Tablehop Contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress event types and broadcast channel for run telemetry.
//!
//! The pipeline emits `ProgressEvent`s as it works through the listing;
//! they flow through a `tokio::sync::broadcast` channel to all
//! subscribers (progress bar, logs). When no subscriber exists, events
//! are silently dropped.

use serde::{Deserialize, Serialize};

/// A progress event emitted during a harvest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Monotonically increasing sequence number.
    pub seq: u64,
    /// The kind of progress event.
    pub event: ProgressEventKind,
}

/// The specific kind of progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressEventKind {
    /// The listing page was fetched and items were extracted.
    ListingFetched { url: String, item_count: usize },
    /// Processing of one listing item began.
    ItemStarted {
        name: String,
        index: usize,
        total: usize,
    },
    /// One item was fully processed into an output unit.
    ItemCompleted {
        name: String,
        done: usize,
        total: usize,
    },
    /// One item was skipped; the run continues.
    ItemSkipped { name: String, reason: String },
    /// The run finished and the workbook was written.
    RunCompleted {
        total: usize,
        processed: usize,
        skipped: usize,
        elapsed_ms: u64,
    },
}

/// Sender handle for emitting progress events.
pub type ProgressSender = tokio::sync::broadcast::Sender<ProgressEvent>;

/// Receiver handle for consuming progress events.
pub type ProgressReceiver = tokio::sync::broadcast::Receiver<ProgressEvent>;

/// Create a new progress broadcast channel with a bounded buffer.
///
/// 256 events cover a typical run (one event per listing item plus a
/// handful of lifecycle events).
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::broadcast::channel(256)
}

/// Convenience helper: emit a progress event, silently ignoring send
/// errors (which occur when no receivers are listening).
pub fn emit(tx: &Option<ProgressSender>, seq: &mut u64, event: ProgressEventKind) {
    if let Some(ref sender) = tx {
        *seq += 1;
        let _ = sender.send(ProgressEvent { seq: *seq, event });
    }
}
