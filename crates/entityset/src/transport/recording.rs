//! In-memory transport that records what it is given.

use std::sync::{Mutex, PoisonError};

use crate::entity::EntitySet;
use crate::error::{IngestError, Result};

use super::{IngestReceipt, IngestTransport};

/// Transport that stores every accepted request instead of sending it.
///
/// Used by tests and by `--dry-run`.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<(String, EntitySet)>>,
    rejected_identity: Option<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer HTTP 400 for any set containing `identity`.
    pub fn reject_identity(mut self, identity: impl Into<String>) -> Self {
        self.rejected_identity = Some(identity.into());
        self
    }

    /// Accepted requests as `(dataset_id, set)`, in arrival order.
    pub fn requests(&self) -> Vec<(String, EntitySet)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every entity accepted so far, flattened.
    pub fn entity_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, set)| set.len())
            .sum()
    }
}

impl IngestTransport for RecordingTransport {
    fn ingest(&self, dataset_id: &str, set: &EntitySet) -> Result<IngestReceipt> {
        if let Some(rejected) = &self.rejected_identity {
            if set.entities.iter().any(|e| &e.identity == rejected) {
                return Err(IngestError::HttpStatus {
                    status: 400,
                    body: format!("entity '{}' rejected", rejected),
                });
            }
        }

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((dataset_id.to_string(), set.clone()));

        Ok(IngestReceipt {
            dataset_id: dataset_id.to_string(),
            requests: 1,
            entities: set.len(),
            jobs: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_empty_set() {
        let transport = RecordingTransport::new();
        let receipt = transport.ingest("ds-1", &EntitySet::default()).unwrap();

        assert_eq!(receipt.dataset_id, "ds-1");
        assert_eq!(receipt.entities, 0);
        assert_eq!(transport.requests()[0].0, "ds-1");
        assert_eq!(transport.entity_count(), 0);
        assert_eq!(transport.name(), "recording");
    }
}
