//! Optimization-opportunity detection and the full optimization run
//!
//! Opportunities are an ordered list of independent rules: each one computes
//! a non-negative dollar amount from the records and snapshot, carries its
//! own assumed marginal rate, and renders its own recommendation line. The
//! fixed evaluation order is load-bearing - recommendations follow it, not
//! the amounts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    BusinessFinanceRecord, ComparisonRow, FinancialSnapshot, PersonalFinanceRecord, TaxBreakdown,
    TaxOptimizationResult,
};

use super::{liability_for, round2};

/// Assumed ordinary marginal rate applied to most opportunity categories
pub const ORDINARY_RATE: f64 = 0.25;
/// Lower assumed rate for tax-advantaged investment opportunities
pub const INVESTMENT_RATE: f64 = 0.15;
/// Deductible business expenses are assumed reasonable up to this share of revenue
pub const BUSINESS_EXPENSE_CEILING: f64 = 0.30;
/// Annual retirement contribution cap
pub const RETIREMENT_CAP: f64 = 23_000.0;
/// Assumed reasonable retirement contribution as a share of income
pub const RETIREMENT_FRACTION: f64 = 0.15;
/// Annual health savings account cap
pub const HSA_CAP: f64 = 4_150.0;
/// Assumed reasonable health savings as a share of income
pub const HSA_FRACTION: f64 = 0.05;
/// Fixed confidence score attached to every optimization result
pub const CONFIDENCE: f64 = 0.85;
/// Fixed split of the optimized liability for the breakdown chart
pub const FEDERAL_SHARE: f64 = 0.80;
pub const STATE_SHARE: f64 = 0.20;

/// The five opportunity categories, in fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    AdditionalDeductions,
    TaxAdvantagedInvestments,
    BusinessExpenseHeadroom,
    RetirementContribution,
    HealthSavings,
}

impl OpportunityKind {
    /// Evaluation order
    pub const ALL: [OpportunityKind; 5] = [
        OpportunityKind::AdditionalDeductions,
        OpportunityKind::TaxAdvantagedInvestments,
        OpportunityKind::BusinessExpenseHeadroom,
        OpportunityKind::RetirementContribution,
        OpportunityKind::HealthSavings,
    ];

    /// Assumed marginal rate for this category
    pub fn rate(&self) -> f64 {
        match self {
            OpportunityKind::TaxAdvantagedInvestments => INVESTMENT_RATE,
            _ => ORDINARY_RATE,
        }
    }

    /// Recommendation line naming the dollar amount
    fn recommendation(&self, amount: f64) -> String {
        match self {
            OpportunityKind::AdditionalDeductions => format!(
                "Claim ${:.2} in deductible expenses you have paid but not yet deducted",
                amount
            ),
            OpportunityKind::TaxAdvantagedInvestments => format!(
                "Shift holdings into tax-advantaged accounts for an estimated ${:.2} in unused tax savings",
                amount
            ),
            OpportunityKind::BusinessExpenseHeadroom => format!(
                "Review business spending: up to ${:.2} of typical deductible expenses appear unclaimed",
                amount
            ),
            OpportunityKind::RetirementContribution => format!(
                "Contribute up to ${:.2} more to retirement accounts this year",
                amount
            ),
            OpportunityKind::HealthSavings => format!(
                "Fund a health savings account with up to ${:.2}",
                amount
            ),
        }
    }
}

/// One detected opportunity: a category plus a non-negative dollar amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub kind: OpportunityKind,
    pub amount: f64,
}

impl Opportunity {
    /// Estimated tax reduction from acting on this opportunity
    pub fn tax_reduction(&self) -> f64 {
        self.amount * self.kind.rate()
    }
}

/// Evaluate the five opportunity rules in fixed order.
///
/// Every amount is clamped to >= 0; a rule that does not apply contributes
/// an amount of 0 and is filtered out.
pub fn detect_opportunities(
    personal: &PersonalFinanceRecord,
    business: &BusinessFinanceRecord,
    snapshot: &FinancialSnapshot,
) -> Vec<Opportunity> {
    let income = personal.total_income() + business.revenue;

    OpportunityKind::ALL
        .iter()
        .map(|kind| {
            let amount = match kind {
                OpportunityKind::AdditionalDeductions => {
                    snapshot.deductible_expenses() - personal.total_deductions()
                }
                OpportunityKind::TaxAdvantagedInvestments => snapshot
                    .investments
                    .iter()
                    .filter_map(|p| p.tax_savings_potential)
                    .sum(),
                OpportunityKind::BusinessExpenseHeadroom => {
                    business.revenue * BUSINESS_EXPENSE_CEILING - business.total_expenses()
                }
                OpportunityKind::RetirementContribution => {
                    RETIREMENT_CAP.min(income * RETIREMENT_FRACTION)
                }
                OpportunityKind::HealthSavings => HSA_CAP.min(income * HSA_FRACTION),
            };
            Opportunity {
                kind: *kind,
                amount: round2(amount.max(0.0)),
            }
        })
        .filter(|o| o.amount > 0.0)
        .collect()
}

/// Run the full estimation and optimization pass.
pub fn optimize(
    personal: &PersonalFinanceRecord,
    business: &BusinessFinanceRecord,
    snapshot: &FinancialSnapshot,
) -> TaxOptimizationResult {
    let total_income = personal.total_income() + business.revenue;
    let total_deductions = personal.total_deductions() + business.total_expenses();
    let taxable = (total_income - total_deductions).max(0.0);
    let current_tax = liability_for(taxable);

    let opportunities = detect_opportunities(personal, business, snapshot);
    let total_reduction: f64 = opportunities.iter().map(|o| o.tax_reduction()).sum();

    let optimized_tax = round2((current_tax - total_reduction).max(0.0));
    let potential_savings = round2(current_tax - optimized_tax);

    debug!(
        current = current_tax,
        optimized = optimized_tax,
        opportunities = opportunities.len(),
        "Optimization run complete"
    );

    let recommendations = opportunities
        .iter()
        .map(|o| o.kind.recommendation(o.amount))
        .collect();

    TaxOptimizationResult {
        current_tax,
        optimized_tax,
        potential_savings,
        recommendations,
        breakdown: TaxBreakdown {
            federal: round2(optimized_tax * FEDERAL_SHARE),
            state: round2(optimized_tax * STATE_SHARE),
        },
        comparison: vec![
            ComparisonRow {
                label: "Current".to_string(),
                amount: current_tax,
            },
            ComparisonRow {
                label: "Optimized".to_string(),
                amount: optimized_tax,
            },
            ComparisonRow {
                label: "Savings".to_string(),
                amount: potential_savings,
            },
        ],
        confidence: CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTransaction, InvestmentPosition, RiskLevel, TransactionKind};
    use chrono::NaiveDate;

    fn expense(category: &str, amount: f64, deductible: bool) -> BudgetTransaction {
        BudgetTransaction {
            category: category.to_string(),
            kind: TransactionKind::Expense,
            amount,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            deductible,
        }
    }

    #[test]
    fn test_zero_income_zero_everything() {
        let result = optimize(
            &PersonalFinanceRecord::default(),
            &BusinessFinanceRecord::default(),
            &FinancialSnapshot::default(),
        );
        assert_eq!(result.current_tax, 0.0);
        assert_eq!(result.optimized_tax, 0.0);
        assert_eq!(result.potential_savings, 0.0);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_optimized_never_exceeds_current() {
        let personal = PersonalFinanceRecord {
            salary_income: 95_000.0,
            ..Default::default()
        };
        let business = BusinessFinanceRecord {
            revenue: 40_000.0,
            rent: 5_000.0,
            ..Default::default()
        };
        let snapshot = FinancialSnapshot {
            budgets: vec![expense("Charity", 2_000.0, true)],
            investments: vec![InvestmentPosition {
                asset_type: "retirement_fund".into(),
                amount_invested: 10_000.0,
                current_value: 11_000.0,
                risk: RiskLevel::Low,
                tax_savings_potential: Some(1_500.0),
            }],
        };

        let result = optimize(&personal, &business, &snapshot);
        assert!(result.optimized_tax <= result.current_tax);
        assert!(result.potential_savings >= 0.0);
        assert!(
            (result.potential_savings - (result.current_tax - result.optimized_tax)).abs() < 0.01
        );
    }

    #[test]
    fn test_opportunity_amounts_clamped_non_negative() {
        // Deductions already exceed deductible-flagged spending; business
        // expenses already exceed the ceiling
        let personal = PersonalFinanceRecord {
            salary_income: 50_000.0,
            charitable_donations: 10_000.0,
            ..Default::default()
        };
        let business = BusinessFinanceRecord {
            revenue: 10_000.0,
            rent: 9_000.0,
            ..Default::default()
        };
        let snapshot = FinancialSnapshot {
            budgets: vec![expense("Charity", 500.0, true)],
            investments: vec![],
        };

        let opportunities = detect_opportunities(&personal, &business, &snapshot);
        for o in &opportunities {
            assert!(o.amount > 0.0);
        }
        assert!(!opportunities
            .iter()
            .any(|o| o.kind == OpportunityKind::AdditionalDeductions));
        assert!(!opportunities
            .iter()
            .any(|o| o.kind == OpportunityKind::BusinessExpenseHeadroom));
    }

    #[test]
    fn test_retirement_and_hsa_caps() {
        let personal = PersonalFinanceRecord {
            salary_income: 1_000_000.0,
            ..Default::default()
        };
        let opportunities = detect_opportunities(
            &personal,
            &BusinessFinanceRecord::default(),
            &FinancialSnapshot::default(),
        );

        let retirement = opportunities
            .iter()
            .find(|o| o.kind == OpportunityKind::RetirementContribution)
            .unwrap();
        assert_eq!(retirement.amount, RETIREMENT_CAP);

        let hsa = opportunities
            .iter()
            .find(|o| o.kind == OpportunityKind::HealthSavings)
            .unwrap();
        assert_eq!(hsa.amount, HSA_CAP);
    }

    #[test]
    fn test_recommendations_follow_rule_order_not_magnitude() {
        let personal = PersonalFinanceRecord {
            salary_income: 80_000.0,
            ..Default::default()
        };
        let business = BusinessFinanceRecord {
            revenue: 200_000.0,
            ..Default::default()
        };
        let snapshot = FinancialSnapshot {
            budgets: vec![expense("Medical", 1_000.0, true)],
            investments: vec![InvestmentPosition {
                asset_type: "ira".into(),
                amount_invested: 5_000.0,
                current_value: 5_200.0,
                risk: RiskLevel::Low,
                tax_savings_potential: Some(700.0),
            }],
        };

        let result = optimize(&personal, &business, &snapshot);
        // Business headroom (60,000) dwarfs the deduction gap (1,000), but
        // the deduction line still comes first
        assert!(result.recommendations[0].contains("deductible expenses"));
        assert!(result.recommendations[1].contains("tax-advantaged"));
        assert!(result.recommendations[2].contains("business"));
    }

    #[test]
    fn test_investment_rate_is_lower() {
        assert!(OpportunityKind::TaxAdvantagedInvestments.rate() < ORDINARY_RATE);
        assert_eq!(OpportunityKind::HealthSavings.rate(), ORDINARY_RATE);
    }

    #[test]
    fn test_breakdown_and_comparison_shape() {
        let personal = PersonalFinanceRecord {
            salary_income: 120_000.0,
            ..Default::default()
        };
        let result = optimize(
            &personal,
            &BusinessFinanceRecord::default(),
            &FinancialSnapshot::default(),
        );

        assert!(
            (result.breakdown.federal + result.breakdown.state - result.optimized_tax).abs() < 0.02
        );
        assert_eq!(result.comparison.len(), 3);
        assert_eq!(result.comparison[0].label, "Current");
        assert_eq!(result.comparison[2].amount, result.potential_savings);
        assert_eq!(result.confidence, CONFIDENCE);
    }
}
