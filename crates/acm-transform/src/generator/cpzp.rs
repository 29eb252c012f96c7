//! Weekly CPZP export: every date is already an ISO week label.

use chrono::NaiveDate;
use polars::prelude::{DataFrame, PolarsResult, StringChunked};
use tracing::warn;

use acm_common::non_blank;
use acm_common::sources::cpzp;
use acm_model::{CanonicalPerson, DOSE_COUNT, DeathIndex, SourceKind};

use super::{PersonPeriodGenerator, resolve_death};
use crate::error::Result;
use crate::period::TimePeriodIndex;

#[derive(Debug, Clone)]
pub struct CpzpGenerator {
    periods: TimePeriodIndex,
}

impl CpzpGenerator {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self::with_periods(TimePeriodIndex::weeks(start, end))
    }

    pub fn with_periods(periods: TimePeriodIndex) -> Self {
        Self { periods }
    }

    /// Blank cells and labels outside the window both become `None`.
    fn dose_index(&self, label: Option<&str>) -> Option<i64> {
        non_blank(label)?;
        label.and_then(|label| self.periods.index_of(label))
    }

    fn death_index(&self, label: Option<&str>) -> DeathIndex {
        match (non_blank(label), label) {
            (Some(_), Some(label)) => resolve_death(label, &self.periods),
            _ => DeathIndex::NotInWindow,
        }
    }
}

impl PersonPeriodGenerator for CpzpGenerator {
    fn source(&self) -> SourceKind {
        SourceKind::Cpzp
    }

    fn periods(&self) -> &TimePeriodIndex {
        &self.periods
    }

    fn read_persons(&self, source: &DataFrame) -> Result<Vec<CanonicalPerson>> {
        let births = source.column(cpzp::BIRTH_WEEK)?.str()?;
        let deaths = source.column(cpzp::DEATH_WEEK)?.str()?;
        let dose_columns = cpzp::DOSE_WEEKS[..DOSE_COUNT]
            .iter()
            .map(|name| source.column(name).and_then(|column| column.str()))
            .collect::<PolarsResult<Vec<&StringChunked>>>()?;

        let mut unmapped = 0usize;
        let mut doses: Vec<[Option<i64>; DOSE_COUNT]> = vec![[None; DOSE_COUNT]; source.height()];
        for (position, column) in dose_columns.into_iter().enumerate() {
            for (row, label) in column.into_iter().enumerate() {
                let index = self.dose_index(label);
                if index.is_none() && non_blank(label).is_some() {
                    unmapped += 1;
                }
                doses[row][position] = index;
            }
        }
        if unmapped > 0 {
            warn!(
                source = %SourceKind::Cpzp,
                unmapped,
                "dose weeks outside the period window were dropped"
            );
        }

        let persons = births
            .into_iter()
            .zip(deaths)
            .zip(doses)
            .enumerate()
            .map(|(row, ((birth, death), doses))| {
                CanonicalPerson::new(row as u32 + 1)
                    .with_birth_label(birth.map(str::to_string))
                    .with_doses(doses)
                    .with_death(self.death_index(death))
            })
            .collect();
        Ok(persons)
    }
}
