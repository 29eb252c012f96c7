//! Canonical per-person attributes shared by every source export.

use serde::{Deserialize, Serialize};

/// Sentinel written for persons who never die inside the window.
///
/// Larger than any real period index, so comparisons against it always read
/// as "still alive".
pub const MAX_PERIOD: i64 = 1_000;

/// Sentinel written for persons who died before the window starts.
pub const BEFORE_WINDOW: i64 = -1;

/// Number of vaccine doses tracked per person.
pub const DOSE_COUNT: usize = 4;

/// Death position of a person relative to the period window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathIndex {
    /// Died before the first period, or the death label did not resolve.
    BeforeWindow,
    /// Died in the period with this index.
    At(i64),
    /// Never died, or died after the last period.
    NotInWindow,
}

impl DeathIndex {
    /// Integer encoding stored in the `death_index` column.
    pub fn to_sentinel(self) -> i64 {
        match self {
            DeathIndex::BeforeWindow => BEFORE_WINDOW,
            DeathIndex::At(index) => index,
            DeathIndex::NotInWindow => MAX_PERIOD,
        }
    }
}

/// One source row after canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPerson {
    /// 1-based position of the source row.
    pub person_id: u32,
    /// Birth period label as found in (or derived from) the source.
    pub birth_label: Option<String>,
    /// Period index of doses one to four, `None` when absent or unmapped.
    pub doses: [Option<i64>; DOSE_COUNT],
    pub death: DeathIndex,
}

impl CanonicalPerson {
    pub fn new(person_id: u32) -> Self {
        Self {
            person_id,
            birth_label: None,
            doses: [None; DOSE_COUNT],
            death: DeathIndex::NotInWindow,
        }
    }

    pub fn with_birth_label(mut self, label: Option<String>) -> Self {
        self.birth_label = label;
        self
    }

    pub fn with_doses(mut self, doses: [Option<i64>; DOSE_COUNT]) -> Self {
        self.doses = doses;
        self
    }

    pub fn with_death(mut self, death: DeathIndex) -> Self {
        self.death = death;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_sentinels() {
        assert_eq!(DeathIndex::BeforeWindow.to_sentinel(), -1);
        assert_eq!(DeathIndex::NotInWindow.to_sentinel(), 1_000);
        assert_eq!(DeathIndex::At(17).to_sentinel(), 17);
    }

    #[test]
    fn builder_defaults_to_survivor() {
        let person = CanonicalPerson::new(7).with_doses([Some(3), None, Some(9), None]);
        assert_eq!(person.death, DeathIndex::NotInWindow);
        assert_eq!(person.doses, [Some(3), None, Some(9), None]);
        assert!(person.birth_label.is_none());
    }
}
