//! Canonical data model for the extraction and tax pipeline
//!
//! Everything here is a transient, request-scoped value: records are built
//! at the start of a pipeline invocation and handed to the storage
//! collaborator (or discarded) at the end. The one aggregate the core does
//! not own is [`FinancialSnapshot`], which belongs to the caller and is only
//! read here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unvalidated key-value data produced by any extraction method.
///
/// May be partial or malformed; repairing it is the normalizer's job.
pub type RawFieldMap = serde_json::Map<String, serde_json::Value>;

/// How a financial record was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Direct document upload
    Upload,
    /// Optical character recognition
    Ocr,
    /// CRM import
    Crm,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Upload => "upload",
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Crm => "crm",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtractionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(ExtractionMethod::Upload),
            "ocr" => Ok(ExtractionMethod::Ocr),
            "crm" => Ok(ExtractionMethod::Crm),
            _ => Err(format!("Unknown extraction method: {}", s)),
        }
    }
}

/// Immutable record of how a financial record was obtained.
///
/// Attached once per extraction event. A re-extraction produces a new
/// `Provenance`, never an update of an old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub method: ExtractionMethod,
    /// Reference identifier, e.g. the SHA-256 of uploaded document bytes
    pub reference: Option<String>,
    /// Provider name for CRM/OCR sources
    pub provider: Option<String>,
}

impl Provenance {
    pub fn new(method: ExtractionMethod) -> Self {
        Self {
            method,
            reference: None,
            provider: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

/// Personal financial facts for one subject.
///
/// Every field is a finite number; missing or unparseable inputs normalize
/// to exactly 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalFinanceRecord {
    pub salary_income: f64,
    pub freelance_income: f64,
    pub investment_income: f64,
    pub rental_income: f64,
    pub capital_gains: f64,
    pub retirement_contributions: f64,
    pub mortgage_interest: f64,
    pub property_taxes: f64,
    pub charitable_donations: f64,
    pub medical_expenses: f64,
    pub childcare_costs: f64,
    pub education_expenses: f64,
    pub other_deductions: f64,
}

impl PersonalFinanceRecord {
    /// Sum of income-like fields
    pub fn total_income(&self) -> f64 {
        self.salary_income
            + self.freelance_income
            + self.investment_income
            + self.rental_income
            + self.capital_gains
    }

    /// Sum of deduction-like fields
    pub fn total_deductions(&self) -> f64 {
        self.retirement_contributions
            + self.mortgage_interest
            + self.property_taxes
            + self.charitable_donations
            + self.medical_expenses
            + self.childcare_costs
            + self.education_expenses
            + self.other_deductions
    }
}

/// Business financial facts for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessFinanceRecord {
    pub revenue: f64,
    pub employee_costs: f64,
    pub equipment: f64,
    pub rent: f64,
    pub utilities: f64,
    pub marketing: f64,
    pub travel_expenses: f64,
    pub office_supplies: f64,
    pub professional_services: f64,
    pub insurance: f64,
    pub other_expenses: f64,
}

impl BusinessFinanceRecord {
    /// Sum of expense fields
    pub fn total_expenses(&self) -> f64 {
        self.employee_costs
            + self.equipment
            + self.rent
            + self.utilities
            + self.marketing
            + self.travel_expenses
            + self.office_supplies
            + self.professional_services
            + self.insurance
            + self.other_expenses
    }
}

/// Signed direction of a budget transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

/// One budget transaction in a subject's snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTransaction {
    pub category: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: NaiveDate,
    /// Whether the expense could be claimed as a tax deduction
    #[serde(default)]
    pub deductible: bool,
}

/// Risk classification of an investment position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

/// One investment position in a subject's snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPosition {
    pub asset_type: String,
    pub amount_invested: f64,
    pub current_value: f64,
    pub risk: RiskLevel,
    /// Explicit tax-saving potential, when the position carries one
    /// (e.g. unrealized contribution room on a tax-advantaged account)
    #[serde(default)]
    pub tax_savings_potential: Option<f64>,
}

/// All budget transactions and investment positions for one subject.
///
/// Owned by the external storage collaborator; the core only reads a given
/// snapshot per invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub budgets: Vec<BudgetTransaction>,
    pub investments: Vec<InvestmentPosition>,
}

impl FinancialSnapshot {
    /// Total of income transactions
    pub fn budget_income(&self) -> f64 {
        self.budgets
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount)
            .sum()
    }

    /// Total of expense transactions
    pub fn budget_expenses(&self) -> f64 {
        self.budgets
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| t.amount)
            .sum()
    }

    /// Total of deductible-flagged expense transactions
    pub fn deductible_expenses(&self) -> f64 {
        self.budgets
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense && t.deductible)
            .map(|t| t.amount)
            .sum()
    }

    /// Sum of current values across all positions
    pub fn portfolio_value(&self) -> f64 {
        self.investments.iter().map(|p| p.current_value).sum()
    }

    /// Sum of invested amounts across all positions
    pub fn total_invested(&self) -> f64 {
        self.investments.iter().map(|p| p.amount_invested).sum()
    }

    /// Portfolio return on investment as a percentage (0 when nothing invested)
    pub fn portfolio_roi(&self) -> f64 {
        let invested = self.total_invested();
        if invested <= 0.0 {
            return 0.0;
        }
        (self.portfolio_value() - invested) / invested * 100.0
    }

    /// Number of distinct asset types held
    pub fn distinct_asset_types(&self) -> usize {
        let mut types: Vec<&str> = self
            .investments
            .iter()
            .map(|p| p.asset_type.as_str())
            .collect();
        types.sort_unstable();
        types.dedup();
        types.len()
    }
}

/// Named portion of the optimized liability, for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub federal: f64,
    pub state: f64,
}

/// One row of the before/after comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub amount: f64,
}

/// Result of one optimization run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxOptimizationResult {
    pub current_tax: f64,
    pub optimized_tax: f64,
    /// current_tax - optimized_tax, never negative by construction
    pub potential_savings: f64,
    /// One line per triggered opportunity, in fixed rule order
    pub recommendations: Vec<String>,
    pub breakdown: TaxBreakdown,
    pub comparison: Vec<ComparisonRow>,
    pub confidence: f64,
}
