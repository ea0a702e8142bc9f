//! Error taxonomy for the harvest pipeline.
//!
//! Only failures that carry run- or item-level consequences are errors.
//! A detail page without a qualifying frame, or a frame without a table,
//! is an absent result (`Option::None`) that the driver logs and skips.
//! A cell that looks like an anchor but fails to parse falls back to its
//! raw value inside the classifier and never surfaces here.

use std::path::PathBuf;

/// Errors produced by the harvest pipeline.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Navigation, evaluation, or serialization failed for a URL.
    ///
    /// Fatal when the URL is the root listing page; item-scoped (skip)
    /// for detail and frame pages; log-only for manual annotation fetches.
    #[error("fetch failed for {url}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The export sink rejected an operation or the workbook write failed.
    #[error("export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// The export sink was handed an unknown unit handle.
    #[error("unknown output unit {0}")]
    UnknownUnit(usize),

    /// Filesystem error (manual text dump, output directory).
    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarvestError {
    /// Wrap a transport-level failure, tagging it with the URL being fetched.
    pub fn fetch(url: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_carries_url() {
        let err = HarvestError::fetch("https://example.test/a", anyhow::anyhow!("boom"));
        assert!(err.to_string().contains("https://example.test/a"));
    }

    #[test]
    fn test_fetch_error_preserves_source() {
        let err = HarvestError::fetch("https://example.test/a", anyhow::anyhow!("boom"));
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("boom"));
    }
}
