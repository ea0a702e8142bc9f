//! Renderer abstraction for browser-based page rendering.
//!
//! The pipeline needs exactly four capabilities from a browsing context:
//! navigate, evaluate a script, serialize the document, and close. The
//! `Renderer`/`RenderContext` traits pin that surface so the Chromium
//! binding can be swapped for a scripted fake in tests.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new isolated browsing context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
    /// Number of currently active contexts. Every fetch must return this
    /// to its pre-call value: contexts are scoped, never leaked.
    fn active_contexts(&self) -> usize;
}

/// A single browsing context (tab).
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL, bounded by a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<()>;
    /// Execute JavaScript in the page and return the result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;
    /// Serialize the full document element.
    async fn html(&self) -> Result<String>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}
