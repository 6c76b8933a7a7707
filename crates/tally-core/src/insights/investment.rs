//! Investment insight rules
//!
//! Fixed-order predicate->insight rules over the investment positions of a
//! snapshot.

use crate::models::{FinancialSnapshot, RiskLevel};

use super::types::{Insight, InsightKind, Priority};

/// Portfolios with fewer distinct asset types than this are under-diversified
const MIN_ASSET_TYPES: usize = 3;
/// High-risk holdings above this share of value trigger the risk insight
const HIGH_RISK_SHARE: f64 = 0.60;
/// ROI above this percentage is flagged as strong performance
const STRONG_ROI: f64 = 10.0;
/// Stock allocation above this share of value triggers the concentration insight
const STOCK_SHARE: f64 = 0.80;

/// Run the investment rules in order.
pub fn analyze(snapshot: &FinancialSnapshot) -> Vec<Insight> {
    if snapshot.investments.is_empty() {
        return Vec::new();
    }

    let value = snapshot.portfolio_value();
    let mut insights = Vec::new();

    // Diversification across asset types
    let asset_types = snapshot.distinct_asset_types();
    if asset_types < MIN_ASSET_TYPES {
        insights.push(Insight::new(
            InsightKind::Investment,
            Priority::High,
            "Limited Portfolio Diversification",
            format!(
                "Your portfolio holds only {} asset type{}",
                asset_types,
                if asset_types == 1 { "" } else { "s" }
            ),
            "Spread holdings across at least 3 asset types to reduce risk",
            "Concentrated portfolios are exposed to single-market downturns",
        ));
    }

    // Risk profile
    if value > 0.0 {
        let high_risk_value: f64 = snapshot
            .investments
            .iter()
            .filter(|p| p.risk == RiskLevel::High)
            .map(|p| p.current_value)
            .sum();
        let high_risk_share = high_risk_value / value;
        if high_risk_share > HIGH_RISK_SHARE {
            insights.push(Insight::new(
                InsightKind::Investment,
                Priority::Medium,
                "High Risk Exposure",
                format!(
                    "{:.0}% of your portfolio is in high-risk holdings",
                    high_risk_share * 100.0
                ),
                "Rebalance part of the portfolio into lower-risk assets",
                format!("${:.2} currently at high risk", high_risk_value),
            ));
        }
    }

    // Performance band: negative and strong are mutually exclusive, the
    // 0-10% band emits nothing
    let roi = snapshot.portfolio_roi();
    if roi < 0.0 {
        insights.push(Insight::new(
            InsightKind::Investment,
            Priority::High,
            "Negative Portfolio Returns",
            format!("Your portfolio is down {:.1}% on invested capital", -roi),
            "Review underperforming positions and your allocation strategy",
            format!(
                "${:.2} below invested capital",
                snapshot.total_invested() - value
            ),
        ));
    } else if roi > STRONG_ROI {
        insights.push(Insight::new(
            InsightKind::Investment,
            Priority::Low,
            "Strong Portfolio Performance",
            format!("Your portfolio has returned {:.1}%", roi),
            "Keep the current allocation and rebalance periodically",
            format!("${:.2} above invested capital", value - snapshot.total_invested()),
        ));
    }

    // Stock concentration
    if value > 0.0 {
        let stock_value: f64 = snapshot
            .investments
            .iter()
            .filter(|p| p.asset_type.to_lowercase().starts_with("stock"))
            .map(|p| p.current_value)
            .sum();
        let stock_share = stock_value / value;
        if stock_share > STOCK_SHARE {
            insights.push(Insight::new(
                InsightKind::Investment,
                Priority::Medium,
                "Heavy Stock Allocation",
                format!("Stocks make up {:.0}% of your portfolio", stock_share * 100.0),
                "Add bonds or other asset classes to dampen volatility",
                format!("${:.2} allocated to stocks", stock_value),
            ));
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentPosition;

    fn position(asset_type: &str, invested: f64, value: f64, risk: RiskLevel) -> InvestmentPosition {
        InvestmentPosition {
            asset_type: asset_type.to_string(),
            amount_invested: invested,
            current_value: value,
            risk,
            tax_savings_potential: None,
        }
    }

    fn snapshot(investments: Vec<InvestmentPosition>) -> FinancialSnapshot {
        FinancialSnapshot {
            budgets: vec![],
            investments,
        }
    }

    #[test]
    fn test_diversification_insight_under_three_types() {
        // 90% concentrated in one asset type, two types total
        let snap = snapshot(vec![
            position("stocks", 9000.0, 9000.0, RiskLevel::Medium),
            position("bonds", 1000.0, 1000.0, RiskLevel::Low),
        ]);
        let insights = analyze(&snap);
        assert!(insights
            .iter()
            .any(|i| i.title == "Limited Portfolio Diversification"));
    }

    #[test]
    fn test_no_diversification_insight_at_three_types() {
        let snap = snapshot(vec![
            position("stocks", 1.0, 1.0, RiskLevel::Medium),
            position("bonds", 1.0, 1.0, RiskLevel::Low),
            position("real_estate", 1.0, 1.0, RiskLevel::Medium),
        ]);
        let insights = analyze(&snap);
        assert!(!insights
            .iter()
            .any(|i| i.title == "Limited Portfolio Diversification"));
    }

    #[test]
    fn test_high_risk_exposure() {
        let snap = snapshot(vec![
            position("crypto", 7000.0, 7000.0, RiskLevel::High),
            position("bonds", 3000.0, 3000.0, RiskLevel::Low),
            position("cash", 0.0, 0.0, RiskLevel::Low),
        ]);
        let insights = analyze(&snap);
        let risk = insights.iter().find(|i| i.title == "High Risk Exposure");
        assert!(risk.is_some());
        assert_eq!(risk.unwrap().priority, Priority::Medium);
    }

    #[test]
    fn test_negative_roi_warning() {
        let snap = snapshot(vec![
            position("stocks", 10_000.0, 8_000.0, RiskLevel::Medium),
            position("bonds", 1.0, 1.0, RiskLevel::Low),
            position("gold", 1.0, 1.0, RiskLevel::Low),
        ]);
        let insights = analyze(&snap);
        assert!(insights.iter().any(|i| i.title == "Negative Portfolio Returns"));
        assert!(!insights
            .iter()
            .any(|i| i.title == "Strong Portfolio Performance"));
    }

    #[test]
    fn test_moderate_roi_is_silent() {
        // ROI of 5%: neither warning nor praise
        let snap = snapshot(vec![
            position("stocks", 1000.0, 1050.0, RiskLevel::Medium),
            position("bonds", 1000.0, 1050.0, RiskLevel::Low),
            position("gold", 1000.0, 1050.0, RiskLevel::Low),
        ]);
        let insights = analyze(&snap);
        assert!(!insights.iter().any(|i| i.title.contains("Portfolio Returns")
            || i.title.contains("Portfolio Performance")));
    }

    #[test]
    fn test_stock_concentration() {
        let snap = snapshot(vec![
            position("stocks", 9000.0, 9000.0, RiskLevel::Medium),
            position("bonds", 500.0, 500.0, RiskLevel::Low),
            position("gold", 500.0, 500.0, RiskLevel::Low),
        ]);
        let insights = analyze(&snap);
        assert!(insights.iter().any(|i| i.title == "Heavy Stock Allocation"));
    }

    #[test]
    fn test_empty_portfolio_emits_nothing() {
        assert!(analyze(&snapshot(vec![])).is_empty());
    }
}
