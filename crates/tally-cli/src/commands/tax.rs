//! Tax estimate and optimization command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{
    AIClient, AnalysisInput, AnalysisMode, AnalysisOutcome, FinancialSnapshot, InMemoryStorage,
    Pipeline, QuickScope,
};

use crate::cli::EstimateScope;

use super::{load_snapshot, resolve_mime, FileSource, LOCAL_SUBJECT};

/// Quick flat-rate estimate over a local document
pub async fn cmd_estimate(
    file: &Path,
    mime: Option<&str>,
    scope: EstimateScope,
    credits: f64,
) -> Result<()> {
    let mime = resolve_mime(file, mime)?;
    let client = AIClient::from_env().context(
        "No text-generation backend configured; set OLLAMA_HOST (or AI_BACKEND/OPENAI_COMPATIBLE_HOST)",
    )?;
    let scope = match scope {
        EstimateScope::Personal => QuickScope::Personal,
        EstimateScope::Business => QuickScope::Business,
        EstimateScope::Combined => QuickScope::Combined,
    };

    let pipeline = Pipeline::new(FileSource, InMemoryStorage::new(), Some(client));
    let output = pipeline
        .run(
            LOCAL_SUBJECT,
            AnalysisInput::Document {
                url: file.display().to_string(),
                mime,
            },
            AnalysisMode::QuickEstimate { scope, credits },
        )
        .await?;

    let AnalysisOutcome::QuickEstimate(estimate) = output.outcome else {
        anyhow::bail!("Unexpected pipeline outcome");
    };

    println!("Quick Tax Estimate");
    println!("==================");
    println!("  Gross tax:             ${:.2}", estimate.gross_tax);
    println!("  After deductions:      ${:.2}", estimate.tax_after_deductions);
    println!("  After credits:         ${:.2}", estimate.tax);
    println!("  Estimated savings:     ${:.2}", estimate.savings);
    if !estimate.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &estimate.recommendations {
            println!("  - {}", rec);
        }
    }
    Ok(())
}

/// Full bracket-based optimization over a local document plus an optional
/// budgets/investments snapshot file
pub async fn cmd_optimize(file: &Path, mime: Option<&str>, snapshot: Option<&Path>) -> Result<()> {
    let mime = resolve_mime(file, mime)?;
    let client = AIClient::from_env().context(
        "No text-generation backend configured; set OLLAMA_HOST (or AI_BACKEND/OPENAI_COMPATIBLE_HOST)",
    )?;

    let snapshot = match snapshot {
        Some(path) => load_snapshot(path)?,
        None => FinancialSnapshot::default(),
    };
    let storage = InMemoryStorage::new();
    storage.put_snapshot(LOCAL_SUBJECT, snapshot);

    let pipeline = Pipeline::new(FileSource, storage, Some(client));
    let output = pipeline
        .run(
            LOCAL_SUBJECT,
            AnalysisInput::Document {
                url: file.display().to_string(),
                mime,
            },
            AnalysisMode::Optimize,
        )
        .await?;

    let AnalysisOutcome::Tax(result) = output.outcome else {
        anyhow::bail!("Unexpected pipeline outcome");
    };

    println!("Tax Optimization");
    println!("================");
    for row in &result.comparison {
        println!("  {:<22} ${:.2}", format!("{}:", row.label), row.amount);
    }
    println!(
        "\n  Federal ${:.2} / State ${:.2} (confidence {:.0}%)",
        result.breakdown.federal,
        result.breakdown.state,
        result.confidence * 100.0
    );
    if !result.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &result.recommendations {
            println!("  - {}", rec);
        }
    }
    Ok(())
}
