//! Flat-rate quick estimate
//!
//! Lighter-weight variant used when a full optimization run is not
//! requested. Applies one flat rate per domain and fixed threshold rules
//! for recommendations. Deliberately not reconciled with the bracket-based
//! optimizer: the two variants keep separate rate constants.

use serde::{Deserialize, Serialize};

use crate::models::{BusinessFinanceRecord, PersonalFinanceRecord};

use super::round2;

/// Flat rate applied to personal taxable income
pub const PERSONAL_FLAT_RATE: f64 = 0.25;
/// Flat rate applied to business net income
pub const BUSINESS_FLAT_RATE: f64 = 0.21;

/// Deductions below this share of income trigger a recommendation
const LOW_DEDUCTION_THRESHOLD: f64 = 0.15;
/// Retirement contributions below this share of income trigger a recommendation
const LOW_RETIREMENT_THRESHOLD: f64 = 0.10;
/// Business expenses below this share of revenue trigger a recommendation
const LOW_BUSINESS_EXPENSE_THRESHOLD: f64 = 0.20;

/// Which domain(s) a quick estimate covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickScope {
    Personal,
    Business,
    Combined,
}

/// Result of a quick estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickEstimate {
    /// Liability on gross income, before deductions and credits
    pub gross_tax: f64,
    /// Liability after deductions reduce the taxed base
    pub tax_after_deductions: f64,
    /// Final liability after credits subtract from the tax itself
    pub tax: f64,
    /// gross_tax - tax
    pub savings: f64,
    /// Threshold-rule recommendations, fixed order
    pub recommendations: Vec<String>,
}

/// Compute a flat-rate estimate for the requested scope.
///
/// Deductions reduce the taxed base (clamped at zero); credits subtract
/// from the resulting tax (also clamped at zero).
pub fn quick_estimate(
    personal: &PersonalFinanceRecord,
    business: &BusinessFinanceRecord,
    scope: QuickScope,
    credits: f64,
) -> QuickEstimate {
    let (gross_tax, tax_after_deductions) = match scope {
        QuickScope::Personal => personal_tax(personal),
        QuickScope::Business => business_tax(business),
        QuickScope::Combined => {
            let (pg, pd) = personal_tax(personal);
            let (bg, bd) = business_tax(business);
            (pg + bg, pd + bd)
        }
    };

    let tax = round2((tax_after_deductions - credits.max(0.0)).max(0.0));
    let gross_tax = round2(gross_tax);
    let tax_after_deductions = round2(tax_after_deductions);

    QuickEstimate {
        gross_tax,
        tax_after_deductions,
        tax,
        savings: round2(gross_tax - tax),
        recommendations: threshold_recommendations(personal, business, scope),
    }
}

fn personal_tax(personal: &PersonalFinanceRecord) -> (f64, f64) {
    let income = personal.total_income();
    let base = (income - personal.total_deductions()).max(0.0);
    (income * PERSONAL_FLAT_RATE, base * PERSONAL_FLAT_RATE)
}

fn business_tax(business: &BusinessFinanceRecord) -> (f64, f64) {
    let base = (business.revenue - business.total_expenses()).max(0.0);
    (business.revenue * BUSINESS_FLAT_RATE, base * BUSINESS_FLAT_RATE)
}

/// Fixed threshold rules, evaluated in order; zero-income domains are silent.
fn threshold_recommendations(
    personal: &PersonalFinanceRecord,
    business: &BusinessFinanceRecord,
    scope: QuickScope,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if matches!(scope, QuickScope::Personal | QuickScope::Combined) {
        let income = personal.total_income();
        if income > 0.0 {
            if personal.total_deductions() < income * LOW_DEDUCTION_THRESHOLD {
                recommendations.push(
                    "Deductions are below 15% of income; review eligible deductions".to_string(),
                );
            }
            if personal.retirement_contributions < income * LOW_RETIREMENT_THRESHOLD {
                recommendations.push(
                    "Retirement contributions are below 10% of income; consider increasing them"
                        .to_string(),
                );
            }
            if personal.charitable_donations == 0.0 {
                recommendations
                    .push("No charitable donations recorded this period".to_string());
            }
        }
    }

    if matches!(scope, QuickScope::Business | QuickScope::Combined)
        && business.revenue > 0.0
        && business.total_expenses() < business.revenue * LOW_BUSINESS_EXPENSE_THRESHOLD
    {
        recommendations.push(
            "Business expenses are below 20% of revenue; check for untracked deductible costs"
                .to_string(),
        );
    }

    recommendations
}
