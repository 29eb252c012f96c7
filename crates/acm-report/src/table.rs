//! Rates for every stratum present in a processed table.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::debug;

use acm_model::{AgeBand, PeriodKind, SurvivalStatus, VaccinationStatus, columns};

use crate::error::{ReportError, Result};
use crate::incidence::{IncidenceStratum, incidence_rate, rate_columns};

/// Every combination of the age bands and vaccination statuses present in a
/// table, sorted by age band, then vaccination status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    pub period_kind: PeriodKind,
    pub strata: Vec<IncidenceStratum>,
}

#[derive(Default)]
struct Counts {
    alive: usize,
    deaths: usize,
}

impl RateTable {
    /// Counts every (age band, vaccination status) pair in one pass.
    ///
    /// The strata form the full grid of bands and statuses seen in the table;
    /// pairs without rows are listed with zero counts and a zero rate.
    pub fn build(processed: &DataFrame, period_kind: PeriodKind) -> Result<Self> {
        let (bands, survival, vaccination) = rate_columns(processed)?;
        let mut counts: BTreeMap<(AgeBand, VaccinationStatus), Counts> = BTreeMap::new();
        let mut seen_bands = BTreeSet::new();
        let mut seen_statuses = BTreeSet::new();

        for ((band, status), code) in bands.into_iter().zip(survival).zip(vaccination) {
            let (Some(band), Some(code)) = (band, code) else {
                continue;
            };
            let band = band.parse::<AgeBand>().map_err(|_| ReportError::UnknownValue {
                column: columns::AGE_BAND,
                value: band.to_string(),
            })?;
            let vaccination_status =
                VaccinationStatus::from_code(code).map_err(|_| ReportError::UnknownValue {
                    column: columns::VACCINATION_STATUS,
                    value: code.to_string(),
                })?;
            seen_bands.insert(band);
            seen_statuses.insert(vaccination_status);
            let entry = counts.entry((band, vaccination_status)).or_default();
            match status.map(str::parse::<SurvivalStatus>) {
                Some(Ok(SurvivalStatus::Alive)) => entry.alive += 1,
                Some(Ok(SurvivalStatus::DiedThisPeriod)) => entry.deaths += 1,
                _ => {}
            }
        }

        let periods_per_year = period_kind.periods_per_year();
        let mut strata = Vec::with_capacity(seen_bands.len() * seen_statuses.len());
        for &age_band in &seen_bands {
            for &vaccination_status in &seen_statuses {
                let (alive, deaths) = counts
                    .get(&(age_band, vaccination_status))
                    .map_or((0, 0), |counts| (counts.alive, counts.deaths));
                strata.push(IncidenceStratum {
                    age_band,
                    vaccination_status,
                    rate: incidence_rate(alive, deaths, periods_per_year),
                    death_count: deaths,
                    alive_count: alive,
                });
            }
        }
        debug!(strata = strata.len(), "built rate table");
        Ok(Self {
            period_kind,
            strata,
        })
    }

    pub fn get(
        &self,
        age_band: AgeBand,
        vaccination_status: VaccinationStatus,
    ) -> Option<&IncidenceStratum> {
        self.strata.iter().find(|stratum| {
            stratum.age_band == age_band && stratum.vaccination_status == vaccination_status
        })
    }

    /// Deaths across all strata.
    pub fn total_deaths(&self) -> usize {
        self.strata.iter().map(|stratum| stratum.death_count).sum()
    }
}
