//! Categorical values carried by classified person-period rows.
//!
//! Each enum has a stable textual (or numeric) encoding used in processed
//! tables, so values written by one run can be read back by another.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Age band of a person at a given period.
///
/// Variants are declared youngest first so that the derived ordering sorts
/// bands the way reports list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    /// Younger than 60, including negative ages (birth after the period).
    #[serde(rename = "<60")]
    Under60,
    #[serde(rename = "60-69")]
    Age60To69,
    #[serde(rename = "70-79")]
    Age70To79,
    #[serde(rename = "80+")]
    Age80Plus,
}

impl AgeBand {
    pub const ALL: [AgeBand; 4] = [
        AgeBand::Under60,
        AgeBand::Age60To69,
        AgeBand::Age70To79,
        AgeBand::Age80Plus,
    ];

    /// Band for an age in whole years.
    pub fn from_age(age: i64) -> Self {
        if age < 60 {
            AgeBand::Under60
        } else if age < 70 {
            AgeBand::Age60To69
        } else if age < 80 {
            AgeBand::Age70To79
        } else {
            AgeBand::Age80Plus
        }
    }

    /// Label stored in the `age_band` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBand::Under60 => "<60",
            AgeBand::Age60To69 => "60-69",
            AgeBand::Age70To79 => "70-79",
            AgeBand::Age80Plus => "80+",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeBand {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeBand::ALL
            .into_iter()
            .find(|band| band.as_str() == s.trim())
            .ok_or_else(|| ModelError::UnknownAgeBand(s.to_string()))
    }
}

/// Survival status of a person at a given period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalStatus {
    /// Still at risk during the period.
    Alive,
    /// Died during the period.
    #[serde(rename = "died_now")]
    DiedThisPeriod,
    /// Period lies after the death period.
    AfterDeath,
}

impl SurvivalStatus {
    pub const ALL: [SurvivalStatus; 3] = [
        SurvivalStatus::Alive,
        SurvivalStatus::DiedThisPeriod,
        SurvivalStatus::AfterDeath,
    ];

    /// Label stored in the `survival_status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurvivalStatus::Alive => "alive",
            SurvivalStatus::DiedThisPeriod => "died_now",
            SurvivalStatus::AfterDeath => "after_death",
        }
    }
}

impl fmt::Display for SurvivalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurvivalStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SurvivalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ModelError::UnknownSurvivalStatus(s.to_string()))
    }
}

/// Vaccination exposure at a given period.
///
/// "Recent" means fewer periods than the recency window have elapsed since the
/// dose; "past" means the window has been exhausted. The fourth dose has no
/// recency split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VaccinationStatus {
    #[serde(rename = "UNVACCINATED")]
    Unvaccinated,
    #[serde(rename = "RECENT_DOSE_1")]
    RecentDose1,
    #[serde(rename = "PAST_DOSE_1")]
    PastDose1,
    #[serde(rename = "RECENT_DOSE_2")]
    RecentDose2,
    #[serde(rename = "PAST_DOSE_2")]
    PastDose2,
    #[serde(rename = "RECENT_DOSE_3")]
    RecentDose3,
    #[serde(rename = "PAST_DOSE_3")]
    PastDose3,
    #[serde(rename = "DOSE_4_OR_HIGHER")]
    Dose4OrHigher,
}

impl VaccinationStatus {
    pub const ALL: [VaccinationStatus; 8] = [
        VaccinationStatus::Unvaccinated,
        VaccinationStatus::RecentDose1,
        VaccinationStatus::PastDose1,
        VaccinationStatus::RecentDose2,
        VaccinationStatus::PastDose2,
        VaccinationStatus::RecentDose3,
        VaccinationStatus::PastDose3,
        VaccinationStatus::Dose4OrHigher,
    ];

    /// Numeric code stored in the `vaccination_status` column.
    ///
    /// Tens digit is the dose number, units digit is 0 for recent and 1 for past.
    pub fn code(&self) -> i32 {
        match self {
            VaccinationStatus::Unvaccinated => 0,
            VaccinationStatus::RecentDose1 => 10,
            VaccinationStatus::PastDose1 => 11,
            VaccinationStatus::RecentDose2 => 20,
            VaccinationStatus::PastDose2 => 21,
            VaccinationStatus::RecentDose3 => 30,
            VaccinationStatus::PastDose3 => 31,
            VaccinationStatus::Dose4OrHigher => 40,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, ModelError> {
        VaccinationStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(ModelError::UnknownVaccinationCode(code))
    }

    /// Recent or past status for a dose, given periods elapsed since it.
    pub fn for_dose(dose: u8, elapsed: i64, recency_window: i64) -> Self {
        let recent = elapsed < recency_window;
        match (dose, recent) {
            (1, true) => VaccinationStatus::RecentDose1,
            (1, false) => VaccinationStatus::PastDose1,
            (2, true) => VaccinationStatus::RecentDose2,
            (2, false) => VaccinationStatus::PastDose2,
            (3, true) => VaccinationStatus::RecentDose3,
            (3, false) => VaccinationStatus::PastDose3,
            (0, _) => VaccinationStatus::Unvaccinated,
            _ => VaccinationStatus::Dose4OrHigher,
        }
    }

    /// Human-readable name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            VaccinationStatus::Unvaccinated => "UNVACCINATED",
            VaccinationStatus::RecentDose1 => "RECENT_DOSE_1",
            VaccinationStatus::PastDose1 => "PAST_DOSE_1",
            VaccinationStatus::RecentDose2 => "RECENT_DOSE_2",
            VaccinationStatus::PastDose2 => "PAST_DOSE_2",
            VaccinationStatus::RecentDose3 => "RECENT_DOSE_3",
            VaccinationStatus::PastDose3 => "PAST_DOSE_3",
            VaccinationStatus::Dose4OrHigher => "DOSE_4_OR_HIGHER",
        }
    }
}

impl fmt::Display for VaccinationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VaccinationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        VaccinationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownVaccinationStatus(s.to_string()))
    }
}

/// Granularity of the discrete time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// ISO weeks, labelled `YYYYWww`.
    #[default]
    Week,
    /// Calendar months, labelled `YYYYMmm`.
    Month,
}

impl PeriodKind {
    /// Periods after a dose during which exposure counts as recent.
    pub fn recency_window(&self) -> i64 {
        match self {
            PeriodKind::Week => 4,
            PeriodKind::Month => 1,
        }
    }

    /// Periods per year used to scale incidence to person-years.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PeriodKind::Week => 52,
            PeriodKind::Month => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" | "w" => Ok(PeriodKind::Week),
            "month" | "monthly" | "m" => Ok(PeriodKind::Month),
            _ => Err(ModelError::UnknownPeriodKind(s.to_string())),
        }
    }
}

/// Supported source exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Weekly export: ISO week labels stored as text.
    Cpzp,
    /// Monthly export: years and months stored as separate integer columns.
    Ozp,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Cpzp, SourceKind::Ozp];

    pub fn period_kind(&self) -> PeriodKind {
        match self {
            SourceKind::Cpzp => PeriodKind::Week,
            SourceKind::Ozp => PeriodKind::Month,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SourceKind::Cpzp => "CPZP",
            SourceKind::Ozp => "OZP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SourceKind::Cpzp => "Weekly insurer export (ISO week labels)",
            SourceKind::Ozp => "Monthly insurer export (year and month columns)",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownSource(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_band_thresholds() {
        assert_eq!(AgeBand::from_age(-3), AgeBand::Under60);
        assert_eq!(AgeBand::from_age(59), AgeBand::Under60);
        assert_eq!(AgeBand::from_age(60), AgeBand::Age60To69);
        assert_eq!(AgeBand::from_age(69), AgeBand::Age60To69);
        assert_eq!(AgeBand::from_age(70), AgeBand::Age70To79);
        assert_eq!(AgeBand::from_age(79), AgeBand::Age70To79);
        assert_eq!(AgeBand::from_age(80), AgeBand::Age80Plus);
        assert_eq!(AgeBand::from_age(120), AgeBand::Age80Plus);
    }

    #[test]
    fn vaccination_codes_round_trip() {
        for status in VaccinationStatus::ALL {
            assert_eq!(VaccinationStatus::from_code(status.code()), Ok(status));
        }
        assert_eq!(
            VaccinationStatus::from_code(12),
            Err(ModelError::UnknownVaccinationCode(12))
        );
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!("80+".parse::<AgeBand>(), Ok(AgeBand::Age80Plus));
        assert_eq!(
            "died_now".parse::<SurvivalStatus>(),
            Ok(SurvivalStatus::DiedThisPeriod)
        );
        assert_eq!(
            "recent_dose_2".parse::<VaccinationStatus>(),
            Ok(VaccinationStatus::RecentDose2)
        );
        assert_eq!("ozp".parse::<SourceKind>(), Ok(SourceKind::Ozp));
        assert!("fortnight".parse::<PeriodKind>().is_err());
    }

    #[test]
    fn period_kind_constants() {
        assert_eq!(PeriodKind::Week.recency_window(), 4);
        assert_eq!(PeriodKind::Month.recency_window(), 1);
        assert_eq!(PeriodKind::Week.periods_per_year(), 52);
        assert_eq!(PeriodKind::Month.periods_per_year(), 12);
        assert_eq!(SourceKind::Cpzp.period_kind(), PeriodKind::Week);
        assert_eq!(SourceKind::Ozp.period_kind(), PeriodKind::Month);
    }
}
