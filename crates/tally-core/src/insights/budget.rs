//! Budget insight rules
//!
//! Independent predicate->insight rules over the budget transactions of a
//! snapshot, evaluated in a fixed sequence. Nothing here mutates the
//! snapshot; a snapshot with no budget data yields no budget insights.

use std::collections::HashMap;

use crate::models::{FinancialSnapshot, TransactionKind};

use super::types::{Insight, InsightKind, Priority};

/// Savings rates below this emit the low-savings insight
const LOW_SAVINGS_RATE: f64 = 10.0;
/// Savings rates at or above this emit the excellent-savings insight
const EXCELLENT_SAVINGS_RATE: f64 = 20.0;
/// A single category above this share of expenses is flagged as concentrated
const CONCENTRATION_SHARE: f64 = 0.40;
/// Months of expenses an emergency fund should cover
const EMERGENCY_FUND_MULTIPLE: f64 = 3.0;

/// Savings rate as a percentage; 0 when there is no income.
pub fn savings_rate(income: f64, expenses: f64) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }
    (income - expenses) / income * 100.0
}

/// Run the budget rules in order.
pub fn analyze(snapshot: &FinancialSnapshot) -> Vec<Insight> {
    if snapshot.budgets.is_empty() {
        return Vec::new();
    }

    let income = snapshot.budget_income();
    let expenses = snapshot.budget_expenses();
    let savings = income - expenses;
    let rate = savings_rate(income, expenses);

    let mut insights = Vec::new();

    // Savings-rate band: low and excellent are mutually exclusive, the
    // 10-20 band emits nothing
    if rate < LOW_SAVINGS_RATE {
        insights.push(Insight::new(
            InsightKind::Budget,
            Priority::Low,
            "Low Savings Rate",
            format!(
                "You are saving {:.1}% of your income, below the recommended 10% minimum",
                rate
            ),
            "Review recurring expenses and set up an automatic transfer to savings",
            format!("Raising the rate to 10% would add ${:.2}/period to savings",
                (income * 0.10 - savings).max(0.0)
            ),
        ));
    } else if rate >= EXCELLENT_SAVINGS_RATE {
        insights.push(Insight::new(
            InsightKind::Budget,
            Priority::Low,
            "Excellent Savings Rate",
            format!("You are saving {:.1}% of your income", rate),
            "Consider putting surplus savings to work in tax-advantaged accounts",
            "Sustained high savings compounds significantly over time",
        ));
    }

    // Expense concentration in one category
    if expenses > 0.0 {
        let mut by_category: HashMap<&str, f64> = HashMap::new();
        for tx in &snapshot.budgets {
            if tx.kind == TransactionKind::Expense {
                *by_category.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
            }
        }
        if let Some((category, amount)) = by_category
            .into_iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        {
            let share = amount / expenses;
            if share > CONCENTRATION_SHARE {
                insights.push(Insight::new(
                    InsightKind::Budget,
                    Priority::Medium,
                    "High Spending Concentration",
                    format!(
                        "{} accounts for {:.0}% of your expenses",
                        category,
                        share * 100.0
                    ),
                    format!("Look for ways to reduce {} spending", category),
                    format!("${:.2} spent in a single category this period", amount),
                ));
            }
        }
    }

    // Emergency fund coverage
    if savings < expenses * EMERGENCY_FUND_MULTIPLE {
        insights.push(Insight::new(
            InsightKind::Budget,
            Priority::High,
            "Emergency Fund Below Target",
            format!(
                "Savings of ${:.2} cover less than {} months of expenses",
                savings.max(0.0),
                EMERGENCY_FUND_MULTIPLE
            ),
            "Build an emergency fund covering at least 3 months of expenses",
            format!(
                "Target: ${:.2}",
                expenses * EMERGENCY_FUND_MULTIPLE
            ),
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetTransaction;
    use chrono::NaiveDate;

    fn tx(category: &str, kind: TransactionKind, amount: f64) -> BudgetTransaction {
        BudgetTransaction {
            category: category.to_string(),
            kind,
            amount,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            deductible: false,
        }
    }

    fn snapshot(budgets: Vec<BudgetTransaction>) -> FinancialSnapshot {
        FinancialSnapshot {
            budgets,
            investments: vec![],
        }
    }

    #[test]
    fn test_savings_rate_zero_income() {
        assert_eq!(savings_rate(0.0, 500.0), 0.0);
    }

    #[test]
    fn test_low_savings_rate_emits_only_low_insight() {
        // income 1000, expenses 950: rate is 5%
        let snap = snapshot(vec![
            tx("Salary", TransactionKind::Income, 1000.0),
            tx("Rent", TransactionKind::Expense, 950.0),
        ]);
        let insights = analyze(&snap);

        let low = insights.iter().find(|i| i.title == "Low Savings Rate");
        assert!(low.is_some());
        assert_eq!(low.unwrap().priority, Priority::Low);
        assert!(!insights.iter().any(|i| i.title == "Excellent Savings Rate"));
    }

    #[test]
    fn test_excellent_savings_rate() {
        let snap = snapshot(vec![
            tx("Salary", TransactionKind::Income, 1000.0),
            tx("Rent", TransactionKind::Expense, 700.0),
        ]);
        let insights = analyze(&snap);
        assert!(insights.iter().any(|i| i.title == "Excellent Savings Rate"));
        assert!(!insights.iter().any(|i| i.title == "Low Savings Rate"));
    }

    #[test]
    fn test_middle_band_is_silent() {
        // rate exactly 15%
        let snap = snapshot(vec![
            tx("Salary", TransactionKind::Income, 1000.0),
            tx("Rent", TransactionKind::Expense, 850.0),
        ]);
        let insights = analyze(&snap);
        assert!(!insights.iter().any(|i| i.title.contains("Savings Rate")));
    }

    #[test]
    fn test_concentration_insight() {
        let snap = snapshot(vec![
            tx("Salary", TransactionKind::Income, 5000.0),
            tx("Rent", TransactionKind::Expense, 500.0),
            tx("Dining", TransactionKind::Expense, 100.0),
            tx("Dining", TransactionKind::Expense, 100.0),
        ]);
        // Rent is 500 of 700 expenses (71%)
        let insights = analyze(&snap);
        let concentration = insights
            .iter()
            .find(|i| i.title == "High Spending Concentration")
            .unwrap();
        assert!(concentration.description.contains("Rent"));
        assert_eq!(concentration.priority, Priority::Medium);
    }

    #[test]
    fn test_emergency_fund_insight() {
        let snap = snapshot(vec![
            tx("Salary", TransactionKind::Income, 1200.0),
            tx("Rent", TransactionKind::Expense, 1000.0),
        ]);
        // savings 200 < 3000
        let insights = analyze(&snap);
        assert!(insights
            .iter()
            .any(|i| i.title == "Emergency Fund Below Target"));
    }

    #[test]
    fn test_empty_budget_emits_nothing() {
        assert!(analyze(&snapshot(vec![])).is_empty());
    }
}
