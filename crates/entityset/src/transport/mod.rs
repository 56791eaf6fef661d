//! Ingest transport: hands finished entity sets to a datastore.
//!
//! The engine never talks to the network itself. It produces one complete
//! [`EntitySet`] per batch and passes it to an [`IngestTransport`].
//!
//! # Implementations
//!
//! - [`HttpTransport`]: blocking HTTPS client with retry and job polling
//! - [`RecordingTransport`]: keeps everything in memory (tests, dry runs)
//!
//! # Example
//!
//! ```no_run
//! use entityset::transport::{HttpTransport, IngestTransport, TransportConfig};
//! use entityset::{IngestOptions, Normalizer};
//!
//! let normalizer = Normalizer::new(IngestOptions::new().auto_confirm(true));
//! let (set, _) = normalizer.normalize_file("people.csv").unwrap();
//!
//! let transport = HttpTransport::new(TransportConfig::new("dev-app.conduce.com", "key")).unwrap();
//! let receipt = transport.ingest("dataset-id", &set).unwrap();
//! println!("{} entities in {} requests", receipt.entities, receipt.requests);
//! ```

mod http;
mod recording;

pub use http::{backoff_delay, compose_uri, HttpTransport, TransportConfig};
pub use recording::RecordingTransport;

use serde::Serialize;

use crate::entity::EntitySet;
use crate::error::Result;

/// What a transport reports after a successful ingest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReceipt {
    pub dataset_id: String,
    /// Requests that were accepted.
    pub requests: usize,
    /// Entities sent.
    pub entities: usize,
    /// Asynchronous jobs that were waited on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<String>,
}

impl IngestReceipt {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            ..Default::default()
        }
    }

    fn absorb(&mut self, other: IngestReceipt) {
        self.requests += other.requests;
        self.entities += other.entities;
        self.jobs.extend(other.jobs);
    }
}

/// How a set is split into requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IngestMode {
    /// The whole set in one request.
    #[default]
    Batch,
    /// One request per entity, to locate entities the service rejects.
    PerEntity,
}

/// Trait for ingest transports.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait IngestTransport: Send + Sync {
    /// Add every entity of `set` to the dataset.
    fn ingest(&self, dataset_id: &str, set: &EntitySet) -> Result<IngestReceipt>;

    /// Name of this transport (for logging).
    fn name(&self) -> &str;
}

/// Ingest `set` through `transport`, honouring `mode`.
pub fn ingest_set(
    transport: &dyn IngestTransport,
    dataset_id: &str,
    set: &EntitySet,
    mode: IngestMode,
) -> Result<IngestReceipt> {
    tracing::info!(
        transport = transport.name(),
        dataset = dataset_id,
        entities = set.len(),
        ?mode,
        "ingesting entity set"
    );

    match mode {
        IngestMode::Batch => transport.ingest(dataset_id, set),
        IngestMode::PerEntity => {
            let mut receipt = IngestReceipt::new(dataset_id);
            let total = set.len();

            for (index, entity) in set.entities.iter().enumerate() {
                let single = EntitySet::new(vec![entity.clone()]);
                match transport.ingest(dataset_id, &single) {
                    Ok(r) => receipt.absorb(r),
                    Err(e) => {
                        tracing::error!(index, identity = %entity.identity, error = %e, "entity rejected");
                        return Err(e);
                    }
                }
                tracing::info!("ingested entity {} of {}", index + 1, total);
            }

            Ok(receipt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CanonicalEntity, Geometry, Point, SENTINEL_MAX, SENTINEL_MIN};
    use crate::error::IngestError;

    fn entity(identity: &str) -> CanonicalEntity {
        CanonicalEntity {
            identity: identity.to_string(),
            kind: "thing".to_string(),
            timestamp_ms: SENTINEL_MIN,
            endtime_ms: SENTINEL_MAX,
            geometry: Geometry::Point(Point::new(0.0, 0.0, 0.0)),
            attrs: Vec::new(),
        }
    }

    #[test]
    fn test_batch_mode_is_one_request() {
        let transport = RecordingTransport::new();
        let set = EntitySet::new(vec![entity("a"), entity("b")]);

        let receipt = ingest_set(&transport, "ds", &set, IngestMode::Batch).unwrap();
        assert_eq!(receipt.requests, 1);
        assert_eq!(receipt.entities, 2);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_per_entity_mode() {
        let transport = RecordingTransport::new();
        let set = EntitySet::new(vec![entity("a"), entity("b"), entity("c")]);

        let receipt = ingest_set(&transport, "ds", &set, IngestMode::PerEntity).unwrap();
        assert_eq!(receipt.requests, 3);
        assert_eq!(receipt.entities, 3);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].1.entities[0].identity, "c");
    }

    #[test]
    fn test_per_entity_stops_at_rejected_entity() {
        let transport = RecordingTransport::new().reject_identity("b");
        let set = EntitySet::new(vec![entity("a"), entity("b"), entity("c")]);

        let err = ingest_set(&transport, "ds", &set, IngestMode::PerEntity).unwrap_err();
        assert!(matches!(err, IngestError::HttpStatus { status: 400, .. }));
        assert_eq!(transport.requests().len(), 1);
    }
}
