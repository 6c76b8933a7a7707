//! Document extraction command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;
use tally_core::{
    extract_text_from_mime, AIClient, AnalysisInput, AnalysisMode, AnalysisOutcome,
    FieldExtractor, InMemoryStorage, Pipeline,
};

use super::{resolve_mime, FileSource, LOCAL_SUBJECT};

/// Extract and normalize financial fields from a local document
pub async fn cmd_extract(file: &Path, mime: Option<&str>, raw: bool) -> Result<()> {
    let mime = resolve_mime(file, mime)?;
    let client = AIClient::from_env().context(
        "No text-generation backend configured; set OLLAMA_HOST (or AI_BACKEND/OPENAI_COMPATIBLE_HOST)",
    )?;

    if raw {
        // Raw mode surfaces the field map before any coercion
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let text = extract_text_from_mime(&bytes, &mime)?;
        let fields = FieldExtractor::new(client).extract(&text).await?;
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    let pipeline = Pipeline::new(FileSource, InMemoryStorage::new(), Some(client));
    let output = pipeline
        .run(
            LOCAL_SUBJECT,
            AnalysisInput::Document {
                url: file.display().to_string(),
                mime,
            },
            AnalysisMode::Normalize,
        )
        .await?;

    if let Some(err) = &output.persistence_error {
        warn!(error = %err, "Records computed but not persisted");
    }
    let AnalysisOutcome::Records(records) = output.outcome else {
        anyhow::bail!("Unexpected pipeline outcome");
    };
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
