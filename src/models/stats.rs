use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of one indexing batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    pub documents: u64,
    pub embedded: u64,
    pub already_indexed: u64,
    pub failed: u64,
    pub cancelled: bool,
    pub duration_ms: u64,
}

impl IndexReport {
    /// Documents that were looked at before the batch ended.
    pub fn processed(&self) -> u64 {
        self.embedded + self.already_indexed + self.failed
    }
}

/// Summary of what the vector store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_documents: u64,
    pub files_by_extension: BTreeMap<String, u64>,
    pub dimension: usize,
    pub database_size_mb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_counts_every_outcome() {
        let report = IndexReport {
            documents: 10,
            embedded: 4,
            already_indexed: 3,
            failed: 1,
            cancelled: true,
            duration_ms: 0,
        };
        assert_eq!(report.processed(), 8);
    }
}
