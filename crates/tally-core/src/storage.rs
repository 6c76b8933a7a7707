//! Storage collaborator boundary
//!
//! Persistent storage lives outside this core. The pipeline talks to it
//! through this trait and treats every failure as an opaque
//! `Persistence` error: no retries, no schema assumptions beyond the
//! record shapes passed across the boundary.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{FinancialSnapshot, TaxOptimizationResult};
use crate::normalize::NormalizedRecords;

/// External storage collaborator, scoped per subject.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the budget/investment snapshot for one subject
    async fn fetch_snapshot(&self, subject: &str) -> Result<FinancialSnapshot>;

    /// Persist normalized records for one subject
    async fn save_records(&self, subject: &str, records: &NormalizedRecords) -> Result<()>;

    /// Persist an optimization result for one subject
    async fn save_tax_result(&self, subject: &str, result: &TaxOptimizationResult) -> Result<()>;
}

/// In-memory storage for tests and the CLI.
#[derive(Default)]
pub struct InMemoryStorage {
    snapshots: Mutex<HashMap<String, FinancialSnapshot>>,
    records: Mutex<HashMap<String, NormalizedRecords>>,
    tax_results: Mutex<HashMap<String, TaxOptimizationResult>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a snapshot for a subject
    pub fn put_snapshot(&self, subject: &str, snapshot: FinancialSnapshot) {
        self.snapshots
            .lock()
            .expect("snapshot lock poisoned")
            .insert(subject.to_string(), snapshot);
    }

    /// Read back persisted records (test helper)
    pub fn records_for(&self, subject: &str) -> Option<NormalizedRecords> {
        self.records
            .lock()
            .expect("records lock poisoned")
            .get(subject)
            .cloned()
    }

    /// Read back a persisted tax result (test helper)
    pub fn tax_result_for(&self, subject: &str) -> Option<TaxOptimizationResult> {
        self.tax_results
            .lock()
            .expect("tax results lock poisoned")
            .get(subject)
            .cloned()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn fetch_snapshot(&self, subject: &str) -> Result<FinancialSnapshot> {
        Ok(self
            .snapshots
            .lock()
            .map_err(|_| Error::Persistence("snapshot lock poisoned".into()))?
            .get(subject)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_records(&self, subject: &str, records: &NormalizedRecords) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| Error::Persistence("records lock poisoned".into()))?
            .insert(subject.to_string(), records.clone());
        Ok(())
    }

    async fn save_tax_result(&self, subject: &str, result: &TaxOptimizationResult) -> Result<()> {
        self.tax_results
            .lock()
            .map_err(|_| Error::Persistence("tax results lock poisoned".into()))?
            .insert(subject.to_string(), result.clone());
        Ok(())
    }
}
