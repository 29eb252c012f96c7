//! Incidence rate per (age band, vaccination status) stratum.
//!
//! The rate is deaths per alive person-period, scaled to deaths per 100 000
//! person-years.

use polars::prelude::{DataFrame, Int32Chunked, StringChunked};
use serde::Serialize;

use acm_common::processed_contract;
use acm_model::{AgeBand, PeriodKind, SurvivalStatus, VaccinationStatus, columns};

use crate::error::Result;

/// Person-years the rate is expressed per.
pub const RATE_SCALE: f64 = 100_000.0;

/// Columns a rate calculation reads; others are ignored.
pub const RATE_COLUMNS: [&str; 3] = [
    columns::AGE_BAND,
    columns::SURVIVAL_STATUS,
    columns::VACCINATION_STATUS,
];

/// Mortality of one stratum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncidenceStratum {
    pub age_band: AgeBand,
    pub vaccination_status: VaccinationStatus,
    /// Deaths per 100 000 person-years; zero when no alive rows exist.
    pub rate: f64,
    pub death_count: usize,
    pub alive_count: usize,
}

/// `deaths / alive × 100 000 × periods_per_year`, or zero without alive rows.
pub fn incidence_rate(alive_count: usize, death_count: usize, periods_per_year: u32) -> f64 {
    if alive_count == 0 {
        return 0.0;
    }
    death_count as f64 / alive_count as f64 * RATE_SCALE * f64::from(periods_per_year)
}

/// Typed views of the columns a rate calculation reads.
pub(crate) fn rate_columns(
    processed: &DataFrame,
) -> Result<(&StringChunked, &StringChunked, &Int32Chunked)> {
    processed_contract().validate_subset(processed, &RATE_COLUMNS)?;
    Ok((
        processed.column(columns::AGE_BAND)?.str()?,
        processed.column(columns::SURVIVAL_STATUS)?.str()?,
        processed.column(columns::VACCINATION_STATUS)?.i32()?,
    ))
}

/// Rate for a single stratum of a processed table.
pub fn compute_rate(
    processed: &DataFrame,
    age_band: AgeBand,
    vaccination_status: VaccinationStatus,
    period_kind: PeriodKind,
) -> Result<IncidenceStratum> {
    let (bands, survival, vaccination) = rate_columns(processed)?;
    let band_label = age_band.as_str();
    let code = vaccination_status.code();

    let mut alive_count = 0;
    let mut death_count = 0;
    for ((band, status), vaccinated) in bands.into_iter().zip(survival).zip(vaccination) {
        if band != Some(band_label) || vaccinated != Some(code) {
            continue;
        }
        match status {
            Some(status) if status == SurvivalStatus::Alive.as_str() => alive_count += 1,
            Some(status) if status == SurvivalStatus::DiedThisPeriod.as_str() => death_count += 1,
            _ => {}
        }
    }

    Ok(IncidenceStratum {
        age_band,
        vaccination_status,
        rate: incidence_rate(alive_count, death_count, period_kind.periods_per_year()),
        death_count,
        alive_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn processed(rows: &[(&str, &str, i32)]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                columns::AGE_BAND.into(),
                rows.iter().map(|row| row.0).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::SURVIVAL_STATUS.into(),
                rows.iter().map(|row| row.1).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::VACCINATION_STATUS.into(),
                rows.iter().map(|row| row.2).collect::<Vec<_>>(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn weekly_and_monthly_scaling() {
        let df = processed(&[
            ("80+", "alive", 0),
            ("80+", "alive", 0),
            ("80+", "died_now", 0),
            ("80+", "died_now", 0),
            ("80+", "after_death", 0),
            ("60-69", "died_now", 0),
            ("80+", "died_now", 10),
        ]);
        let weekly = compute_rate(
            &df,
            AgeBand::Age80Plus,
            VaccinationStatus::Unvaccinated,
            PeriodKind::Week,
        )
        .unwrap();
        assert_eq!(weekly.rate, 5_200_000.0);
        assert_eq!(weekly.death_count, 2);
        assert_eq!(weekly.alive_count, 2);

        let monthly = compute_rate(
            &df,
            AgeBand::Age80Plus,
            VaccinationStatus::Unvaccinated,
            PeriodKind::Month,
        )
        .unwrap();
        assert_eq!(monthly.rate, 1_200_000.0);
    }

    #[test]
    fn no_alive_rows_gives_zero_rate() {
        let df = processed(&[("70-79", "died_now", 31), ("70-79", "died_now", 31)]);
        let stratum = compute_rate(
            &df,
            AgeBand::Age70To79,
            VaccinationStatus::PastDose3,
            PeriodKind::Week,
        )
        .unwrap();
        assert_eq!(stratum.rate, 0.0);
        assert_eq!(stratum.death_count, 2);
    }

    #[test]
    fn empty_table_gives_zero() {
        let df = processed(&[]);
        let stratum = compute_rate(
            &df,
            AgeBand::Age60To69,
            VaccinationStatus::Unvaccinated,
            PeriodKind::Week,
        )
        .unwrap();
        assert_eq!(stratum.rate, 0.0);
        assert_eq!(stratum.death_count, 0);
    }

    #[test]
    fn requires_rate_columns() {
        let df = DataFrame::new(vec![Column::new(columns::AGE_BAND.into(), ["80+"])]).unwrap();
        let result = compute_rate(
            &df,
            AgeBand::Age80Plus,
            VaccinationStatus::Unvaccinated,
            PeriodKind::Week,
        );
        assert!(result.is_err());
    }
}
