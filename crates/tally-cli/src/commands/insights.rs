//! Insight generation command implementation

use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use tally_core::{insights, InsightFilter};

use super::load_snapshot;

/// Generate prioritized insights from a snapshot file
pub fn cmd_insights(snapshot: &Path, kind: &str) -> Result<()> {
    let filter = InsightFilter::from_str(kind).map_err(|e| anyhow::anyhow!(e))?;
    let snapshot = load_snapshot(snapshot)?;

    let results = insights::generate(&snapshot, filter);
    if results.is_empty() {
        println!("No insights for the requested categories.");
        return Ok(());
    }

    for insight in &results {
        println!(
            "[{}] ({}) {}",
            insight.priority, insight.kind, insight.title
        );
        println!("    {}", insight.description);
        println!("    Impact: {}", insight.impact);
        println!("    → {}\n", insight.recommendation);
    }
    Ok(())
}
