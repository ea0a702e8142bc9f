//! Rendered-DOM fetching: navigate, provoke lazy content, wait for the
//! page to settle, serialize.
//!
//! The settle wait is a quiescence poll rather than a blind sleep: the
//! serialized-document length is sampled at a fixed interval until two
//! consecutive samples agree, bounded by a settle timeout. A page that
//! never settles is serialized as-is with a warning.
//!
//! Every fetch opens its own browsing context and closes it on all exit
//! paths, success or failure.

use crate::error::HarvestError;
use crate::renderer::{RenderContext, Renderer};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A DOM snapshot of a URL after client-side rendering settled.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// The URL the snapshot was taken from.
    pub url: String,
    /// Serialized document element.
    pub html: String,
}

/// Timing knobs for a rendered fetch.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Navigation timeout in milliseconds.
    pub nav_timeout_ms: u64,
    /// Upper bound on the settle wait in milliseconds.
    pub settle_timeout_ms: u64,
    /// Interval between quiescence samples in milliseconds.
    pub poll_interval_ms: u64,
    /// Vertical scroll issued after navigation to provoke lazy content.
    pub scroll_nudge_px: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            nav_timeout_ms: 30_000,
            settle_timeout_ms: 10_000,
            poll_interval_ms: 250,
            scroll_nudge_px: 1_000,
        }
    }
}

/// Fetch the fully rendered DOM of `url`.
///
/// The browsing context is closed unconditionally before this returns.
pub async fn fetch_rendered(
    renderer: &dyn Renderer,
    url: &str,
    opts: &RenderOptions,
) -> Result<RenderedDocument, HarvestError> {
    let mut ctx = renderer
        .new_context()
        .await
        .map_err(|e| HarvestError::fetch(url, e))?;

    let result = render_in_context(ctx.as_mut(), url, opts).await;

    if let Err(e) = ctx.close().await {
        warn!("failed to close browsing context for {url}: {e:#}");
    }

    let html = result.map_err(|e| HarvestError::fetch(url, e))?;
    Ok(RenderedDocument {
        url: url.to_string(),
        html,
    })
}

async fn render_in_context(
    ctx: &mut dyn RenderContext,
    url: &str,
    opts: &RenderOptions,
) -> anyhow::Result<String> {
    ctx.navigate(url, opts.nav_timeout_ms).await?;

    // Fire-and-forget, like a user flicking the scroll wheel. Some pages
    // only hydrate below-the-fold content on scroll.
    if let Err(e) = ctx
        .evaluate(&format!("window.scrollBy(0, {})", opts.scroll_nudge_px))
        .await
    {
        debug!("scroll nudge failed for {url}: {e:#}");
    }

    wait_for_quiescence(ctx, url, opts).await?;

    ctx.html().await
}

/// Sample the serialized-document length until it stops changing.
///
/// Returns once two consecutive samples match or the settle timeout
/// elapses. The timeout is logged, not an error: a busy page still gets
/// serialized.
async fn wait_for_quiescence(
    ctx: &dyn RenderContext,
    url: &str,
    opts: &RenderOptions,
) -> anyhow::Result<()> {
    let deadline = Instant::now() + Duration::from_millis(opts.settle_timeout_ms);
    let mut last_len: Option<u64> = None;

    loop {
        tokio::time::sleep(Duration::from_millis(opts.poll_interval_ms)).await;

        let len = ctx
            .evaluate("document.documentElement.outerHTML.length")
            .await?
            .as_u64()
            .unwrap_or(0);

        if last_len == Some(len) {
            debug!("render settled for {url} at {len} bytes");
            return Ok(());
        }
        last_len = Some(len);

        if Instant::now() >= deadline {
            warn!(
                "render did not settle within {}ms for {url}, serializing current DOM",
                opts.settle_timeout_ms
            );
            return Ok(());
        }
    }
}
