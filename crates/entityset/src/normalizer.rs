//! Main Normalizer struct and public API.

use std::path::Path;

use crate::builder::{
    build_strict_with, EntityBuilder, IdentityGenerator, StrictVariant, UuidGenerator,
};
use crate::entity::EntitySet;
use crate::error::Result;
use crate::inference::{
    map_roles, resolve_roles, score_record, AutoConfirm, ConfirmMapping, RoleAssignment, ScoreTable,
};
use crate::input::{RawRecord, ReaderConfig, RecordReader, SourceMetadata};
use crate::options::IngestOptions;

/// Turns batches of raw records into canonical entity sets.
///
/// One run scores the first record, resolves and confirms a role mapping,
/// then applies it to every record of the batch.
pub struct Normalizer {
    options: IngestOptions,
    reader: RecordReader,
    confirmer: Box<dyn ConfirmMapping>,
    ids: Box<dyn IdentityGenerator>,
}

impl Normalizer {
    /// Create a normalizer that accepts every mapping and generates UUIDs.
    pub fn new(options: IngestOptions) -> Self {
        Self {
            options,
            reader: RecordReader::new(),
            confirmer: Box::new(AutoConfirm),
            ids: Box::new(UuidGenerator),
        }
    }

    /// Ask `confirmer` before a mapping is used (unless `auto_confirm` is set).
    pub fn with_confirmer(mut self, confirmer: impl ConfirmMapping + 'static) -> Self {
        self.confirmer = Box::new(confirmer);
        self
    }

    /// Use a different source for generated identities.
    pub fn with_identity_generator(mut self, ids: impl IdentityGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Read files with a custom reader configuration.
    pub fn with_reader_config(mut self, config: ReaderConfig) -> Self {
        self.reader = RecordReader::with_config(config);
        self
    }

    /// The options this normalizer applies.
    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Score the batch and resolve a mapping without asking for confirmation.
    ///
    /// Returns `None` for an empty batch.
    pub fn plan(&self, records: &[RawRecord]) -> Option<(ScoreTable, RoleAssignment)> {
        let sample = records.first()?;
        let table = score_record(sample);
        let assignment = resolve_roles(&table, &self.options);
        Some((table, assignment))
    }

    /// Infer a mapping from the first record and build every record with it.
    pub fn normalize_records(&self, records: &[RawRecord]) -> Result<EntitySet> {
        let Some(sample) = records.first() else {
            return Ok(EntitySet::default());
        };

        let table = score_record(sample);
        let assignment = map_roles(&table, &self.options, self.confirmer.as_ref())?;

        EntityBuilder::new(&assignment, &self.options)
            .with_identity_generator(self.ids.as_ref())
            .build(records)
    }

    /// Read a CSV or JSON file and normalize its records.
    pub fn normalize_file(&self, path: impl AsRef<Path>) -> Result<(EntitySet, SourceMetadata)> {
        let (records, source) = self.reader.read_file(path)?;
        let set = self.normalize_records(&records)?;
        Ok((set, source))
    }

    /// Validate pre-typed records from a file in strict mode.
    ///
    /// Only the timezone option applies; nothing is inferred or confirmed.
    pub fn normalize_strict_file(
        &self,
        path: impl AsRef<Path>,
        variant: StrictVariant,
    ) -> Result<(EntitySet, SourceMetadata)> {
        let (records, source) = self.reader.read_file(path)?;
        let set = build_strict_with(&records, variant, self.options.timezone)?;
        Ok((set, source))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}
