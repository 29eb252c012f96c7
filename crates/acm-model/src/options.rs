//! Configuration options for panel generation and processing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::PeriodKind;

/// Default number of persons expanded per cross-join chunk.
pub const DEFAULT_PERSONS_PER_CHUNK: usize = 50_000;

/// Options controlling how a source export is turned into a processed panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// First day of the observation window.
    pub start: NaiveDate,
    /// Last day of the observation window (inclusive).
    pub end: NaiveDate,
    /// Period granularity; decides the recency window and person-year scaling.
    pub period_kind: PeriodKind,
    /// Persons expanded per cross-join chunk.
    ///
    /// Bounds peak memory to roughly `persons_per_chunk * periods` rows.
    pub persons_per_chunk: usize,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2022, 12, 30).unwrap_or_default(),
            period_kind: PeriodKind::default(),
            persons_per_chunk: DEFAULT_PERSONS_PER_CHUNK,
        }
    }
}

impl ProcessingOptions {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    pub fn with_period_kind(mut self, kind: PeriodKind) -> Self {
        self.period_kind = kind;
        self
    }

    /// Set the chunk size; zero is bumped to one.
    pub fn with_persons_per_chunk(mut self, persons: usize) -> Self {
        self.persons_per_chunk = persons.max(1);
        self
    }
}
