//! Tally Core Library
//!
//! Shared functionality for the Tally financial analysis pipeline:
//! - Document-to-text conversion for PDF, word-processing, spreadsheet,
//!   and delimited formats
//! - Pluggable text-generation backends (Ollama, OpenAI-compatible, mock)
//! - Structured field extraction from converted document text
//! - Value normalization into typed personal/business records
//! - Progressive-bracket tax estimation and optimization
//! - Rule-based budget, investment, and general insights
//! - The pipeline entry point tying the stages together

pub mod ai;
pub mod document;
pub mod error;
pub mod extract;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod storage;
pub mod tax;

pub use ai::{AIClient, MockBackend, OllamaBackend, OpenAICompatibleBackend, TextGenBackend};
pub use document::{extract_text, extract_text_from_mime, DocumentFormat, DocumentSource, HttpDocumentSource};
pub use error::{Error, Result};
pub use extract::{FieldExtractor, DEFAULT_MAX_CHARS};
pub use insights::{Insight, InsightFilter, InsightKind, Priority};
pub use models::{
    BudgetTransaction, BusinessFinanceRecord, ComparisonRow, ExtractionMethod, FinancialSnapshot,
    InvestmentPosition, PersonalFinanceRecord, Provenance, RawFieldMap, RiskLevel, TaxBreakdown,
    TaxOptimizationResult, TransactionKind,
};
pub use normalize::{normalize, NormalizedRecords, BUSINESS_FIELDS, PERSONAL_FIELDS};
pub use pipeline::{AnalysisInput, AnalysisMode, AnalysisOutcome, Pipeline, PipelineOutput};
pub use storage::{InMemoryStorage, Storage};
pub use tax::{
    liability_for, optimize, quick_estimate, Opportunity, OpportunityKind, QuickEstimate,
    QuickScope,
};
