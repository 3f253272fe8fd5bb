//! In-memory record store for dry runs and tests

use super::{RecordStore, StoreError};
use crate::normalize::Beneficiary;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Keeps committed records in process memory, keyed by table name
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Beneficiary>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one table's rows
    pub async fn rows(&self, table: &str) -> Vec<Beneficiary> {
        self.tables
            .lock()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn row_count(&self, table: &str) -> usize {
        self.tables.lock().await.get(table).map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_many(
        &self,
        table: &str,
        records: &[Beneficiary],
    ) -> Result<Option<usize>, StoreError> {
        let mut tables = self.tables.lock().await;
        tables
            .entry(table.to_string())
            .or_default()
            .extend_from_slice(records);
        Ok(Some(records.len()))
    }
}
