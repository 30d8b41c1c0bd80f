//! Match ledger
//!
//! Collects match records from one or more sources (replay-derived matches,
//! manually entered extra games) into a single time-ordered sequence.

use crate::types::MatchRecord;
use serde::{Deserialize, Serialize};

/// Time-ordered sequence of match records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchLedger {
    records: Vec<MatchRecord>,
}

impl MatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from one source, sorted by timestamp
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        let mut ledger = Self::new();
        ledger.push_stream(records);
        ledger
    }

    /// Merge several sources into one ledger.
    ///
    /// The merge is stable: records with equal timestamps keep their order
    /// within a source, and earlier sources come before later ones. Records
    /// without a timestamp sort first so the pipeline rejects them up front.
    pub fn merge<S, I>(streams: S) -> Self
    where
        S: IntoIterator<Item = I>,
        I: IntoIterator<Item = MatchRecord>,
    {
        let mut ledger = Self::new();
        for stream in streams {
            ledger.records.extend(stream);
        }
        ledger.sort();
        ledger
    }

    /// Add another source, keeping the ledger sorted
    pub fn push_stream<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        self.records.extend(records);
        self.sort();
    }

    fn sort(&mut self) {
        self.records.sort_by_key(|record| record.timestamp);
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for MatchLedger {
    type Item = MatchRecord;
    type IntoIter = std::vec::IntoIter<MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
