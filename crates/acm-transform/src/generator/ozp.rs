//! Monthly OZP export: years and months arrive as separate integer columns.

use chrono::NaiveDate;
use polars::prelude::{DataFrame, Int64Chunked};
use tracing::warn;

use acm_common::sources::ozp;
use acm_model::{CanonicalPerson, DOSE_COUNT, DeathIndex, SourceKind};

use super::{PersonPeriodGenerator, resolve_death};
use crate::error::Result;
use crate::period::{TimePeriodIndex, month_label};

#[derive(Debug, Clone)]
pub struct OzpGenerator {
    periods: TimePeriodIndex,
}

fn label(year: Option<i64>, month: Option<i64>) -> Option<String> {
    Some(month_label(year?, month?))
}

fn year_month<'a>(
    source: &'a DataFrame,
    year: &str,
    month: &str,
) -> Result<(&'a Int64Chunked, &'a Int64Chunked)> {
    Ok((source.column(year)?.i64()?, source.column(month)?.i64()?))
}

impl OzpGenerator {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self::with_periods(TimePeriodIndex::months(start, end))
    }

    pub fn with_periods(periods: TimePeriodIndex) -> Self {
        Self { periods }
    }

    fn death_index(&self, year: Option<i64>, month: Option<i64>) -> DeathIndex {
        match label(year, month) {
            Some(label) => resolve_death(&label, &self.periods),
            None => DeathIndex::NotInWindow,
        }
    }
}

impl PersonPeriodGenerator for OzpGenerator {
    fn source(&self) -> SourceKind {
        SourceKind::Ozp
    }

    fn periods(&self) -> &TimePeriodIndex {
        &self.periods
    }

    fn read_persons(&self, source: &DataFrame) -> Result<Vec<CanonicalPerson>> {
        let (birth_years, birth_months) = year_month(source, ozp::BIRTH_YEAR, ozp::BIRTH_MONTH)?;
        let (death_years, death_months) = year_month(source, ozp::DEATH_YEAR, ozp::DEATH_MONTH)?;

        let mut unmapped = 0usize;
        let mut doses: Vec<[Option<i64>; DOSE_COUNT]> = vec![[None; DOSE_COUNT]; source.height()];
        for position in 0..DOSE_COUNT {
            let (years, months) =
                year_month(source, ozp::DOSE_YEARS[position], ozp::DOSE_MONTHS[position])?;
            for (row, (year, month)) in years.into_iter().zip(months).enumerate() {
                let Some(label) = label(year, month) else {
                    continue;
                };
                let index = self.periods.index_of(&label);
                if index.is_none() {
                    unmapped += 1;
                }
                doses[row][position] = index;
            }
        }
        if unmapped > 0 {
            warn!(
                source = %SourceKind::Ozp,
                unmapped,
                "dose months outside the period window were dropped"
            );
        }

        let births = birth_years.into_iter().zip(birth_months);
        let deaths = death_years.into_iter().zip(death_months);
        let persons = births
            .zip(deaths)
            .zip(doses)
            .enumerate()
            .map(|(row, (((birth_year, birth_month), (death_year, death_month)), doses))| {
                CanonicalPerson::new(row as u32 + 1)
                    .with_birth_label(label(birth_year, birth_month))
                    .with_doses(doses)
                    .with_death(self.death_index(death_year, death_month))
            })
            .collect();
        Ok(persons)
    }
}
