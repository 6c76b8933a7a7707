//! Insight generator
//!
//! Pure function over a financial snapshot. Each category's rules run in a
//! fixed sequence (budget, then investment, then general), and the final
//! ordering is a stable sort by priority only, so equal-priority insights
//! keep their generation order.

pub mod budget;
pub mod general;
pub mod investment;
pub mod types;

pub use types::{Insight, InsightKind, Priority};

use tracing::debug;

use crate::models::FinancialSnapshot;

/// Which insight categories a caller requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightFilter {
    Budget,
    Investment,
    General,
    All,
}

impl InsightFilter {
    fn includes(&self, kind: InsightKind) -> bool {
        match self {
            InsightFilter::All => true,
            InsightFilter::Budget => kind == InsightKind::Budget,
            InsightFilter::Investment => kind == InsightKind::Investment,
            InsightFilter::General => kind == InsightKind::General,
        }
    }
}

impl std::str::FromStr for InsightFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget" => Ok(InsightFilter::Budget),
            "investment" => Ok(InsightFilter::Investment),
            "general" => Ok(InsightFilter::General),
            "all" => Ok(InsightFilter::All),
            _ => Err(format!("Unknown insight filter: {}", s)),
        }
    }
}

/// Generate prioritized insights for the requested categories.
pub fn generate(snapshot: &FinancialSnapshot, filter: InsightFilter) -> Vec<Insight> {
    let mut insights = Vec::new();

    if filter.includes(InsightKind::Budget) {
        insights.extend(budget::analyze(snapshot));
    }
    if filter.includes(InsightKind::Investment) {
        insights.extend(investment::analyze(snapshot));
    }
    if filter.includes(InsightKind::General) {
        insights.push(general::analyze(snapshot));
    }

    // Stable: equal priorities keep generation order
    insights.sort_by_key(|i| std::cmp::Reverse(i.priority.rank()));

    debug!(count = insights.len(), "Insight generation complete");
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTransaction, InvestmentPosition, RiskLevel, TransactionKind};
    use chrono::NaiveDate;

    fn mixed_snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            budgets: vec![
                BudgetTransaction {
                    category: "Salary".into(),
                    kind: TransactionKind::Income,
                    amount: 1000.0,
                    date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                    deductible: false,
                },
                BudgetTransaction {
                    category: "Rent".into(),
                    kind: TransactionKind::Expense,
                    amount: 950.0,
                    date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
                    deductible: false,
                },
            ],
            investments: vec![InvestmentPosition {
                asset_type: "stocks".into(),
                amount_invested: 900.0,
                current_value: 1000.0,
                risk: RiskLevel::High,
                tax_savings_potential: None,
            }],
        }
    }

    #[test]
    fn test_priority_ordering_no_low_before_high_or_medium() {
        let insights = generate(&mixed_snapshot(), InsightFilter::All);
        let mut seen_lower = false;
        for insight in &insights {
            if insight.priority != Priority::High {
                seen_lower = true;
            } else {
                assert!(!seen_lower, "high priority insight after a lower one");
            }
        }
        // No low insight may precede a high or medium one
        let first_low = insights.iter().position(|i| i.priority == Priority::Low);
        if let Some(first_low) = first_low {
            assert!(insights[first_low..]
                .iter()
                .all(|i| i.priority == Priority::Low));
        }
    }

    #[test]
    fn test_equal_priority_keeps_generation_order() {
        // Budget high-priority insights precede investment high-priority
        // ones, which precede a high-priority general insight
        let insights = generate(&mixed_snapshot(), InsightFilter::All);
        let highs: Vec<InsightKind> = insights
            .iter()
            .filter(|i| i.priority == Priority::High)
            .map(|i| i.kind)
            .collect();
        let budget_pos = highs.iter().position(|k| *k == InsightKind::Budget);
        let investment_pos = highs.iter().position(|k| *k == InsightKind::Investment);
        if let (Some(b), Some(inv)) = (budget_pos, investment_pos) {
            assert!(b < inv);
        }
    }

    #[test]
    fn test_filter_restricts_kinds() {
        let insights = generate(&mixed_snapshot(), InsightFilter::Budget);
        assert!(insights.iter().all(|i| i.kind == InsightKind::Budget));

        let insights = generate(&mixed_snapshot(), InsightFilter::General);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::General);
    }

    #[test]
    fn test_all_includes_general_exactly_once() {
        let insights = generate(&mixed_snapshot(), InsightFilter::All);
        assert_eq!(
            insights
                .iter()
                .filter(|i| i.kind == InsightKind::General)
                .count(),
            1
        );
    }
}
