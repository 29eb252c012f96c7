//! Per-row status classifiers.
//!
//! All three are pure functions of a single person-period row.

use acm_model::{AgeBand, DOSE_COUNT, SurvivalStatus, VaccinationStatus};

use crate::period::{label_subperiod, label_year};

/// Completed years between the birth period and `period_label`.
///
/// A period whose week or month is earlier in the year than the birth
/// period's has not reached the birthday yet. `None` when the birth label is
/// missing or either label does not parse.
pub fn age_at(birth_label: Option<&str>, period_label: &str) -> Option<i64> {
    let birth = birth_label?;
    let years = label_year(period_label)? - label_year(birth)?;
    let before_birthday = label_subperiod(period_label)? < label_subperiod(birth)?;
    Some(years - i64::from(before_birthday))
}

/// Age band at the period; an unknown age falls into [`AgeBand::Age80Plus`].
pub fn age_band(birth_label: Option<&str>, period_label: &str) -> AgeBand {
    age_at(birth_label, period_label).map_or(AgeBand::Age80Plus, AgeBand::from_age)
}

pub fn survival_status(period_index: i64, death_index: i64) -> SurvivalStatus {
    match period_index.cmp(&death_index) {
        std::cmp::Ordering::Less => SurvivalStatus::Alive,
        std::cmp::Ordering::Equal => SurvivalStatus::DiedThisPeriod,
        std::cmp::Ordering::Greater => SurvivalStatus::AfterDeath,
    }
}

/// Exposure at `period_index` given the period indices of doses one to four.
///
/// Doses are checked by number, highest first; the first dose already given
/// at this period decides the status, regardless of the order doses were
/// actually given in.
pub fn vaccination_status(
    period_index: i64,
    doses: &[Option<i64>; DOSE_COUNT],
    recency_window: i64,
) -> VaccinationStatus {
    for (position, dose) in doses.iter().enumerate().rev() {
        let Some(dose) = *dose else {
            continue;
        };
        if period_index >= dose {
            // position is below DOSE_COUNT
            let number = (position + 1) as u8;
            return VaccinationStatus::for_dose(number, period_index - dose, recency_window);
        }
    }
    VaccinationStatus::Unvaccinated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_counts_the_birthday_period() {
        assert_eq!(age_at(Some("1950W10"), "2020W10"), Some(70));
        assert_eq!(age_at(Some("1950W10"), "2020W09"), Some(69));
        assert_eq!(age_at(Some("1961M06"), "2021M05"), Some(59));
        assert_eq!(age_at(Some("2022W10"), "2021W01"), Some(-2));
    }

    #[test]
    fn unknown_age_is_oldest_band() {
        assert_eq!(age_at(None, "2021W01"), None);
        assert_eq!(age_band(None, "2021W01"), AgeBand::Age80Plus);
        assert_eq!(age_band(Some("unknown"), "2021W01"), AgeBand::Age80Plus);
        assert_eq!(age_band(Some("1950W"), "2021W01"), AgeBand::Age80Plus);
    }

    #[test]
    fn age_band_boundaries() {
        assert_eq!(age_band(Some("1961W01"), "2021W01"), AgeBand::Age60To69);
        assert_eq!(age_band(Some("1961W02"), "2021W01"), AgeBand::Under60);
        assert_eq!(age_band(Some("1951W01"), "2021W01"), AgeBand::Age70To79);
        assert_eq!(age_band(Some("1941W01"), "2021W01"), AgeBand::Age80Plus);
        assert_eq!(age_band(Some("2030W01"), "2021W01"), AgeBand::Under60);
    }

    #[test]
    fn survival_relative_to_death() {
        assert_eq!(survival_status(4, 5), SurvivalStatus::Alive);
        assert_eq!(survival_status(5, 5), SurvivalStatus::DiedThisPeriod);
        assert_eq!(survival_status(6, 5), SurvivalStatus::AfterDeath);
        assert_eq!(survival_status(0, -1), SurvivalStatus::AfterDeath);
        assert_eq!(survival_status(104, 1_000), SurvivalStatus::Alive);
    }

    #[test]
    fn vaccination_priority_table() {
        let doses = [Some(2), Some(8), Some(14), Some(20)];
        let expected = |period: i64| match period {
            1 => VaccinationStatus::Unvaccinated,
            2..=5 => VaccinationStatus::RecentDose1,
            6..=7 => VaccinationStatus::PastDose1,
            8..=11 => VaccinationStatus::RecentDose2,
            12..=13 => VaccinationStatus::PastDose2,
            14..=17 => VaccinationStatus::RecentDose3,
            18..=19 => VaccinationStatus::PastDose3,
            _ => VaccinationStatus::Dose4OrHigher,
        };
        for period in 1..=20 {
            assert_eq!(
                vaccination_status(period, &doses, 4),
                expected(period),
                "period {period}"
            );
        }
    }

    #[test]
    fn monthly_window_is_one_period() {
        let doses = [Some(3), None, None, None];
        assert_eq!(vaccination_status(3, &doses, 1), VaccinationStatus::RecentDose1);
        assert_eq!(vaccination_status(4, &doses, 1), VaccinationStatus::PastDose1);
    }

    #[test]
    fn priority_follows_dose_number_not_date() {
        // Dose 2 recorded before dose 1 still wins once reached.
        let doses = [Some(10), Some(5), None, None];
        assert_eq!(vaccination_status(6, &doses, 4), VaccinationStatus::RecentDose2);
        assert_eq!(vaccination_status(12, &doses, 4), VaccinationStatus::PastDose2);
        assert_eq!(vaccination_status(4, &doses, 4), VaccinationStatus::Unvaccinated);
    }

    #[test]
    fn missing_lower_doses_do_not_matter() {
        let doses = [None, None, Some(7), None];
        assert_eq!(vaccination_status(7, &doses, 4), VaccinationStatus::RecentDose3);
        assert_eq!(vaccination_status(6, &doses, 4), VaccinationStatus::Unvaccinated);
    }
}
