//! Composite financial-health insight
//!
//! Scores four weighted bands (savings rate, portfolio ROI, emergency-fund
//! coverage, diversification) out of 100 and always emits exactly one
//! insight when requested.

use crate::models::FinancialSnapshot;

use super::budget::savings_rate;
use super::types::{Insight, InsightKind, Priority};

/// Compute the health score out of 100.
///
/// Band tiers: savings rate contributes up to 30 points, ROI up to 25,
/// emergency-fund coverage up to 25, diversification up to 20.
pub fn health_score(snapshot: &FinancialSnapshot) -> u32 {
    let income = snapshot.budget_income();
    let expenses = snapshot.budget_expenses();
    let savings = income - expenses;
    let rate = savings_rate(income, expenses);

    let savings_points = if rate >= 20.0 {
        30
    } else if rate >= 10.0 {
        20
    } else if rate > 0.0 {
        10
    } else {
        0
    };

    let roi = snapshot.portfolio_roi();
    let roi_points = if roi > 10.0 {
        25
    } else if roi > 0.0 {
        15
    } else {
        0
    };

    // Coverage is months of expenses the savings would fund; with no
    // expenses at all, any savings counts as full coverage
    let coverage_points = if expenses <= 0.0 {
        if savings > 0.0 {
            25
        } else {
            0
        }
    } else {
        let coverage = savings / expenses;
        if coverage >= 3.0 {
            25
        } else if coverage >= 1.0 {
            15
        } else {
            0
        }
    };

    let diversification_points = match snapshot.distinct_asset_types() {
        n if n >= 3 => 20,
        2 => 10,
        _ => 0,
    };

    savings_points + roi_points + coverage_points + diversification_points
}

/// Produce the single general insight.
pub fn analyze(snapshot: &FinancialSnapshot) -> Insight {
    let score = health_score(snapshot);

    let (label, priority, recommendation) = if score >= 80 {
        (
            "excellent",
            Priority::Low,
            "Keep doing what you are doing and review quarterly",
        )
    } else if score >= 60 {
        (
            "good",
            Priority::Low,
            "Shore up the weakest area to move into the excellent band",
        )
    } else if score >= 40 {
        (
            "fair",
            Priority::Medium,
            "Focus on savings rate and emergency-fund coverage first",
        )
    } else {
        (
            "needs improvement",
            Priority::High,
            "Start with a budget review; small recurring cuts move this score quickly",
        )
    };

    Insight::new(
        InsightKind::General,
        priority,
        "Financial Health Score",
        format!("Your overall financial health is {} ({}/100)", label, score),
        recommendation,
        format!("Score: {}/100", score),
    )
}
