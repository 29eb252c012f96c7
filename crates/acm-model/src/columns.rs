//! Column names of the canonical and processed tables.

pub const PERSON_ID: &str = "person_id";
pub const BIRTH_LABEL: &str = "birth_label";
pub const DOSE_1: &str = "dose1";
pub const DOSE_2: &str = "dose2";
pub const DOSE_3: &str = "dose3";
pub const DOSE_4: &str = "dose4";
pub const DEATH_INDEX: &str = "death_index";
pub const PERIOD_LABEL: &str = "period_label";
pub const PERIOD_INDEX: &str = "period_index";

pub const AGE_BAND: &str = "age_band";
pub const SURVIVAL_STATUS: &str = "survival_status";
pub const VACCINATION_STATUS: &str = "vaccination_status";

/// Dose columns in dose-number order.
pub const DOSES: [&str; 4] = [DOSE_1, DOSE_2, DOSE_3, DOSE_4];

/// Columns of a person-period table, in contract order.
pub const PERSON_PERIOD: [&str; 9] = [
    PERSON_ID,
    BIRTH_LABEL,
    DOSE_1,
    DOSE_2,
    DOSE_3,
    DOSE_4,
    DEATH_INDEX,
    PERIOD_LABEL,
    PERIOD_INDEX,
];

/// Columns of a processed table, in contract order.
pub const PROCESSED: [&str; 5] = [
    PERSON_ID,
    PERIOD_LABEL,
    AGE_BAND,
    SURVIVAL_STATUS,
    VACCINATION_STATUS,
];
