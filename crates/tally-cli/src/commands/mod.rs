//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `backend` - Text-generation backend diagnostics
//! - `extract` - Document extraction and normalization
//! - `insights` - Insight generation from snapshot files
//! - `tax` - Quick estimate and full optimization

pub mod backend;
pub mod extract;
pub mod insights;
pub mod tax;

// Re-export command functions for main.rs
pub use backend::*;
pub use extract::*;
pub use insights::*;
pub use tax::*;

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tally_core::{DocumentSource, FinancialSnapshot};

/// Subject identifier for local single-user invocations
pub(crate) const LOCAL_SUBJECT: &str = "local";

/// Document source backed by the local filesystem. The "URL" is a path.
pub(crate) struct FileSource;

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self, url: &str) -> tally_core::Result<Vec<u8>> {
        tokio::fs::read(url)
            .await
            .map_err(|e| tally_core::Error::SourceUnavailable(format!("{}: {}", url, e)))
    }
}

/// Infer a MIME type from the file extension when the caller gave none.
pub(crate) fn resolve_mime(file: &Path, explicit: Option<&str>) -> Result<String> {
    if let Some(mime) = explicit {
        return Ok(mime.to_string());
    }
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "csv" => "text/csv",
        _ => anyhow::bail!(
            "Cannot infer MIME type from '{}'; pass --mime explicitly",
            file.display()
        ),
    };
    Ok(mime.to_string())
}

/// Load a budgets/investments snapshot from a JSON file.
pub(crate) fn load_snapshot(path: &Path) -> Result<FinancialSnapshot> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("Invalid snapshot JSON in {}", path.display()))
}
