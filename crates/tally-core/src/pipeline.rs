//! Pipeline entry point
//!
//! Single produced interface: accept a document reference or a raw field
//! map plus a target analysis mode, and return a normalized record set, a
//! tax result, or an insight sequence. Transport (HTTP, RPC, in-process)
//! is the integrating system's business.
//!
//! Persistence runs after computation; a storage failure is reported on
//! the output, never allowed to invalidate an already-computed result.

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::ai::AIClient;
use crate::document::{extract_text_from_mime, DocumentSource};
use crate::error::{Error, Result};
use crate::extract::{FieldExtractor, DEFAULT_MAX_CHARS};
use crate::insights::{self, Insight, InsightFilter};
use crate::models::{
    ExtractionMethod, Provenance, RawFieldMap, TaxOptimizationResult,
};
use crate::normalize::{normalize, NormalizedRecords};
use crate::storage::Storage;
use crate::tax::{optimize, quick_estimate, QuickEstimate, QuickScope};

/// What the caller hands the pipeline
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    /// A document to fetch, convert, and extract
    Document { url: String, mime: String },
    /// Already-extracted raw fields from an alternative source (OCR, CRM)
    RawFields {
        fields: RawFieldMap,
        provenance: Provenance,
    },
}

/// Requested analysis
#[derive(Debug, Clone, Copy)]
pub enum AnalysisMode {
    /// Normalize only; persist and return the records
    Normalize,
    /// Flat-rate estimate over the normalized records
    QuickEstimate { scope: QuickScope, credits: f64 },
    /// Full bracket liability plus the optimization search
    Optimize,
    /// Rule-based insights over the stored snapshot (the input document,
    /// if any, is not consulted)
    Insights(InsightFilter),
}

/// The result payload of one invocation
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Records(NormalizedRecords),
    QuickEstimate(QuickEstimate),
    Tax(TaxOptimizationResult),
    Insights(Vec<Insight>),
}

/// Outcome plus the persistence status of this invocation
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub outcome: AnalysisOutcome,
    /// Set when the computation succeeded but persisting it did not
    pub persistence_error: Option<String>,
}

/// The assembled pipeline with its collaborators.
pub struct Pipeline<D: DocumentSource, S: Storage> {
    source: D,
    storage: S,
    ai: Option<AIClient>,
    max_chars: usize,
}

impl<D: DocumentSource, S: Storage> Pipeline<D, S> {
    pub fn new(source: D, storage: S, ai: Option<AIClient>) -> Self {
        Self {
            source,
            storage,
            ai,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Override the extraction character budget
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Access the storage collaborator
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Run one invocation for one subject.
    pub async fn run(
        &self,
        subject: &str,
        input: AnalysisInput,
        mode: AnalysisMode,
    ) -> Result<PipelineOutput> {
        match mode {
            AnalysisMode::Insights(filter) => {
                let snapshot = self.storage.fetch_snapshot(subject).await?;
                let insights = insights::generate(&snapshot, filter);
                Ok(PipelineOutput {
                    outcome: AnalysisOutcome::Insights(insights),
                    persistence_error: None,
                })
            }
            AnalysisMode::Normalize => {
                let records = self.normalize_input(input).await?;
                let persistence_error = self.persist_records(subject, &records).await;
                Ok(PipelineOutput {
                    outcome: AnalysisOutcome::Records(records),
                    persistence_error,
                })
            }
            AnalysisMode::QuickEstimate { scope, credits } => {
                let records = self.normalize_input(input).await?;
                let estimate =
                    quick_estimate(&records.personal, &records.business, scope, credits);
                Ok(PipelineOutput {
                    outcome: AnalysisOutcome::QuickEstimate(estimate),
                    persistence_error: None,
                })
            }
            AnalysisMode::Optimize => {
                let records = self.normalize_input(input).await?;
                let snapshot = self.storage.fetch_snapshot(subject).await?;
                let result = optimize(&records.personal, &records.business, &snapshot);

                let mut persistence_error = self.persist_records(subject, &records).await;
                if persistence_error.is_none() {
                    persistence_error = match self.storage.save_tax_result(subject, &result).await
                    {
                        Ok(()) => None,
                        Err(e) => {
                            warn!(subject, error = %e, "Failed to persist tax result");
                            Some(e.to_string())
                        }
                    };
                }

                Ok(PipelineOutput {
                    outcome: AnalysisOutcome::Tax(result),
                    persistence_error,
                })
            }
        }
    }

    /// Turn either input form into normalized records with provenance.
    async fn normalize_input(&self, input: AnalysisInput) -> Result<NormalizedRecords> {
        match input {
            AnalysisInput::RawFields { fields, provenance } => {
                Ok(normalize(&fields, provenance))
            }
            AnalysisInput::Document { url, mime } => {
                let bytes = self.source.fetch(&url).await?;
                let reference = hex::encode(Sha256::digest(&bytes));
                let text = extract_text_from_mime(&bytes, &mime)?;
                debug!(url = %url, chars = text.len(), "Document converted to text");

                let client = self.ai.clone().ok_or_else(|| {
                    Error::ServiceConfig("No text-generation backend configured".into())
                })?;
                let extractor = FieldExtractor::new(client).with_max_chars(self.max_chars);
                let fields = extractor.extract(&text).await?;

                let provenance =
                    Provenance::new(ExtractionMethod::Upload).with_reference(reference);
                Ok(normalize(&fields, provenance))
            }
        }
    }

    async fn persist_records(
        &self,
        subject: &str,
        records: &NormalizedRecords,
    ) -> Option<String> {
        match self.storage.save_records(subject, records).await {
            Ok(()) => None,
            Err(e) => {
                warn!(subject, error = %e, "Failed to persist normalized records");
                Some(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticSource(Vec<u8>);

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl DocumentSource for DownSource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Err(Error::SourceUnavailable(url.to_string()))
        }
    }

    fn raw_input() -> AnalysisInput {
        let mut fields = RawFieldMap::new();
        fields.insert("salary_income".into(), json!("1000"));
        fields.insert("freelance_income".into(), json!(200));
        fields.insert("property_taxes".into(), json!("$300.50"));
        AnalysisInput::RawFields {
            fields,
            provenance: Provenance::new(ExtractionMethod::Crm).with_provider("hubspot"),
        }
    }

    #[tokio::test]
    async fn test_normalize_mode_persists_and_returns() {
        let storage = InMemoryStorage::new();
        let pipeline = Pipeline::new(StaticSource(vec![]), storage, None);

        let output = pipeline
            .run("alice", raw_input(), AnalysisMode::Normalize)
            .await
            .unwrap();

        assert!(output.persistence_error.is_none());
        let AnalysisOutcome::Records(records) = output.outcome else {
            panic!("expected records");
        };
        assert_eq!(records.personal.salary_income, 1000.0);
        assert_eq!(records.personal.property_taxes, 300.5);
        assert_eq!(records.provenance.method, ExtractionMethod::Crm);

        assert!(pipeline.storage.records_for("alice").is_some());
    }

    #[tokio::test]
    async fn test_document_mode_without_backend_is_config_error() {
        let csv = b"field,value\nsalary_income,1000\n".to_vec();
        let pipeline = Pipeline::new(StaticSource(csv), InMemoryStorage::new(), None);

        let err = pipeline
            .run(
                "alice",
                AnalysisInput::Document {
                    url: "https://docs/doc.csv".into(),
                    mime: "text/csv".into(),
                },
                AnalysisMode::Normalize,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceConfig(_)));
    }

    #[tokio::test]
    async fn test_document_mode_full_run_with_mock_backend() {
        let csv = b"description,amount\nsalary,75000\n".to_vec();
        let ai = AIClient::mock_with_response(
            r#"Extracted: {"salary_income": "75,000", "revenue": null}"#,
        );
        let pipeline = Pipeline::new(StaticSource(csv), InMemoryStorage::new(), Some(ai));

        let output = pipeline
            .run(
                "alice",
                AnalysisInput::Document {
                    url: "https://docs/doc.csv".into(),
                    mime: "text/csv".into(),
                },
                AnalysisMode::Normalize,
            )
            .await
            .unwrap();

        let AnalysisOutcome::Records(records) = output.outcome else {
            panic!("expected records");
        };
        assert_eq!(records.personal.salary_income, 75000.0);
        // null degraded to 0, not an error
        assert_eq!(records.business.revenue, 0.0);
        assert_eq!(records.provenance.method, ExtractionMethod::Upload);
        // Upload provenance carries the content hash
        assert_eq!(records.provenance.reference.as_ref().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_source_failure_is_terminal() {
        let pipeline = Pipeline::new(DownSource, InMemoryStorage::new(), Some(AIClient::mock()));
        let err = pipeline
            .run(
                "alice",
                AnalysisInput::Document {
                    url: "https://docs/doc.pdf".into(),
                    mime: "application/pdf".into(),
                },
                AnalysisMode::Optimize,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_optimize_mode_uses_stored_snapshot() {
        let storage = InMemoryStorage::new();
        storage.put_snapshot("alice", crate::models::FinancialSnapshot::default());
        let pipeline = Pipeline::new(StaticSource(vec![]), storage, None);

        let mut fields = RawFieldMap::new();
        fields.insert("salary_income".into(), json!(120_000));
        let output = pipeline
            .run(
                "alice",
                AnalysisInput::RawFields {
                    fields,
                    provenance: Provenance::new(ExtractionMethod::Ocr),
                },
                AnalysisMode::Optimize,
            )
            .await
            .unwrap();

        let AnalysisOutcome::Tax(result) = output.outcome else {
            panic!("expected tax result");
        };
        assert!(result.current_tax > 0.0);
        assert!(result.optimized_tax <= result.current_tax);
        assert!(pipeline.storage.tax_result_for("alice").is_some());
    }

    #[tokio::test]
    async fn test_insights_mode_ignores_input() {
        let storage = InMemoryStorage::new();
        let pipeline = Pipeline::new(DownSource, storage, None);

        // DownSource would fail any fetch; insights never touch it
        let output = pipeline
            .run(
                "alice",
                AnalysisInput::Document {
                    url: "https://unreachable".into(),
                    mime: "application/pdf".into(),
                },
                AnalysisMode::Insights(InsightFilter::All),
            )
            .await
            .unwrap();

        let AnalysisOutcome::Insights(insights) = output.outcome else {
            panic!("expected insights");
        };
        // Empty snapshot still produces the general insight
        assert_eq!(insights.len(), 1);
    }
}
