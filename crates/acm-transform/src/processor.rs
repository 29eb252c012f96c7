//! Classification of person-period tables.
//!
//! Rows under 60 are dropped here; the remaining rows are reduced to the
//! processed layout consumed by rate calculation.

use polars::prelude::{Column, DataFrame};
use tracing::debug;

use acm_common::{person_period_contract, processed_contract};
use acm_model::{
    AgeBand, DOSE_COUNT, PeriodKind, SurvivalStatus, VaccinationStatus, columns,
};

use crate::classify::{age_band, survival_status, vaccination_status};
use crate::error::Result;

/// Classifies every row of a person-period table and projects the result.
///
/// The input must follow the person-period layout exactly. `period_kind`
/// selects the vaccination recency window. Rows with null keys are kept: a
/// null death or period index reads as alive and unvaccinated.
pub fn process(person_periods: &DataFrame, period_kind: PeriodKind) -> Result<DataFrame> {
    person_period_contract().validate(person_periods)?;

    let recency_window = period_kind.recency_window();
    let ids = person_periods.column(columns::PERSON_ID)?.u32()?;
    let births = person_periods.column(columns::BIRTH_LABEL)?.str()?;
    let deaths = person_periods.column(columns::DEATH_INDEX)?.i64()?;
    let labels = person_periods.column(columns::PERIOD_LABEL)?.str()?;
    let indices = person_periods.column(columns::PERIOD_INDEX)?.i64()?;
    let mut dose_values: Vec<Vec<Option<i64>>> = Vec::with_capacity(DOSE_COUNT);
    for name in columns::DOSES {
        dose_values.push(person_periods.column(name)?.i64()?.into_iter().collect());
    }

    let mut person_ids = Vec::new();
    let mut period_labels = Vec::new();
    let mut age_bands = Vec::new();
    let mut survival = Vec::new();
    let mut vaccination = Vec::new();

    let rows = ids
        .into_iter()
        .zip(births)
        .zip(deaths)
        .zip(labels)
        .zip(indices)
        .enumerate();
    for (row, ((((id, birth), death), label), index)) in rows {
        // Null labels have no age and fall into the oldest band.
        let band = label.map_or(AgeBand::Age80Plus, |label| age_band(birth, label));
        if band == AgeBand::Under60 {
            continue;
        }
        let doses: [Option<i64>; DOSE_COUNT] = std::array::from_fn(|dose| dose_values[dose][row]);
        let status = match (index, death) {
            (Some(index), Some(death)) => survival_status(index, death),
            _ => SurvivalStatus::Alive,
        };
        let exposure = index.map_or(VaccinationStatus::Unvaccinated, |index| {
            vaccination_status(index, &doses, recency_window)
        });

        person_ids.push(id);
        period_labels.push(label);
        age_bands.push(band.as_str());
        survival.push(status.as_str());
        vaccination.push(exposure.code());
    }

    let processed = DataFrame::new(vec![
        Column::new(columns::PERSON_ID.into(), person_ids),
        Column::new(columns::PERIOD_LABEL.into(), period_labels),
        Column::new(columns::AGE_BAND.into(), age_bands),
        Column::new(columns::SURVIVAL_STATUS.into(), survival),
        Column::new(columns::VACCINATION_STATUS.into(), vaccination),
    ])?;
    debug_assert!(processed_contract().check(&processed).is_empty());

    debug!(
        input_rows = person_periods.height(),
        output_rows = processed.height(),
        period_kind = %period_kind,
        "classified person-period rows"
    );
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acm_model::CanonicalPerson;
    use chrono::NaiveDate;

    use crate::generator::cross_join;
    use crate::period::TimePeriodIndex;

    fn weeks() -> TimePeriodIndex {
        TimePeriodIndex::weeks(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 31).unwrap(),
        )
    }

    #[test]
    fn drops_under_sixty_rows() {
        let persons = vec![
            CanonicalPerson::new(1).with_birth_label(Some("1990W01".to_string())),
            CanonicalPerson::new(2).with_birth_label(Some("1945W01".to_string())),
            CanonicalPerson::new(3),
        ];
        let periods = weeks();
        let table = cross_join(&persons, &periods).unwrap();
        let processed = process(&table, PeriodKind::Week).unwrap();

        assert_eq!(processed.height(), 2 * periods.len());
        assert!(processed_contract().validate(&processed).is_ok());
        let bands = processed.column(columns::AGE_BAND).unwrap().str().unwrap();
        assert!(bands.into_iter().all(|band| band != Some("<60")));
    }

    #[test]
    fn keeps_rows_with_null_keys() {
        let no_dose: Vec<Option<i64>> = vec![None; 3];
        let df = DataFrame::new(vec![
            Column::new(columns::PERSON_ID.into(), [Some(1u32), Some(1), None]),
            Column::new(columns::BIRTH_LABEL.into(), ["1950W01"; 3]),
            Column::new(columns::DOSE_1.into(), no_dose.clone()),
            Column::new(columns::DOSE_2.into(), no_dose.clone()),
            Column::new(columns::DOSE_3.into(), no_dose.clone()),
            Column::new(columns::DOSE_4.into(), no_dose),
            Column::new(columns::DEATH_INDEX.into(), [Some(1_000i64), None, Some(1_000)]),
            Column::new(
                columns::PERIOD_LABEL.into(),
                [Some("2021W01"), Some("2021W02"), None],
            ),
            Column::new(columns::PERIOD_INDEX.into(), [Some(1i64), Some(2), None]),
        ])
        .unwrap();

        let processed = process(&df, PeriodKind::Week).unwrap();

        assert_eq!(processed.height(), 3);
        let survival = processed.column(columns::SURVIVAL_STATUS).unwrap().str().unwrap();
        assert!(survival.into_iter().all(|status| status == Some("alive")));
        let bands = processed.column(columns::AGE_BAND).unwrap().str().unwrap();
        assert_eq!(
            bands.into_iter().collect::<Vec<_>>(),
            [Some("70-79"), Some("70-79"), Some("80+")]
        );
        let vaccination = processed
            .column(columns::VACCINATION_STATUS)
            .unwrap()
            .i32()
            .unwrap();
        assert!(vaccination.into_iter().all(|code| code == Some(0)));
        assert_eq!(processed.column(columns::PERSON_ID).unwrap().null_count(), 1);
    }

    #[test]
    fn rejects_non_canonical_input() {
        let df = DataFrame::new(vec![Column::new("person_id".into(), [1u32])]).unwrap();
        assert!(process(&df, PeriodKind::Week).is_err());
    }
}
