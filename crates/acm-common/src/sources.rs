//! Column layouts of the supported source exports.
//!
//! Column names are the headers of the insurer exports and must be matched
//! verbatim, including diacritics.

use polars::prelude::DataType;

use acm_model::SourceKind;

use crate::contract::{ColumnSpec, TableContract};

/// Weekly export with ISO week labels stored as text.
pub mod cpzp {
    pub const BIRTH_WEEK: &str = "tyden_narozeni";
    pub const GENDER: &str = "POHLAVI";
    pub const DOSE_WEEKS: [&str; 5] = [
        "vakcina1_tyden",
        "vakcina2_tyden",
        "vakcina3_tyden",
        "vakcina4_tyden",
        "vakcina5_tyden",
    ];
    pub const DOSE_CODES: [&str; 5] = [
        "vakcina1_kod",
        "vakcina2_kod",
        "vakcina3_kod",
        "vakcina4_kod",
        "vakcina5_kod",
    ];
    pub const DEATH_WEEK: &str = "tyden_umrti";
}

/// Monthly export with years and months in separate integer columns.
pub mod ozp {
    pub const INSURANCE_ID: &str = "Id poj.";
    pub const GENDER: &str = "Pohlaví";
    pub const BIRTH_YEAR: &str = "Rok Narození";
    pub const BIRTH_MONTH: &str = "Měsíc Narození";
    pub const DEATH_YEAR: &str = "Rok Úmrtí";
    pub const DEATH_MONTH: &str = "Měsíc Úmrtí";
    pub const DOSE_CODES: [&str; 7] = [
        "Kód Vakcína 1",
        "Kód Vakcína 2",
        "Kód Vakcína 3",
        "Kód Vakcína 4",
        "Kód Vakcína 5",
        "Kód Vakcína 6",
        "Kód Vakcína 7",
    ];
    pub const DOSE_YEARS: [&str; 7] = [
        "Rok Vakcína 1",
        "Rok Vakcína 2",
        "Rok Vakcína 3",
        "Rok Vakcína 4",
        "Rok Vakcína 5",
        "Rok Vakcína 6",
        "Rok Vakcína 7",
    ];
    pub const DOSE_MONTHS: [&str; 7] = [
        "Měsíc Vakcína 1",
        "Měsíc Vakcína 2",
        "Měsíc Vakcína 3",
        "Měsíc Vakcína 4",
        "Měsíc Vakcína 5",
        "Měsíc Vakcína 6",
        "Měsíc Vakcína 7",
    ];
    /// Doses from this one onwards are exported as text.
    pub const FIRST_TEXT_DOSE: usize = 5;
}

/// CPZP contract: thirteen text columns.
pub fn cpzp_contract() -> TableContract {
    let mut columns = vec![
        ColumnSpec::new(cpzp::BIRTH_WEEK, DataType::String),
        ColumnSpec::new(cpzp::GENDER, DataType::String),
    ];
    for (week, code) in cpzp::DOSE_WEEKS.into_iter().zip(cpzp::DOSE_CODES) {
        columns.push(ColumnSpec::new(week, DataType::String));
        columns.push(ColumnSpec::new(code, DataType::String));
    }
    columns.push(ColumnSpec::new(cpzp::DEATH_WEEK, DataType::String));
    TableContract::new("CPZP", columns)
}

/// OZP contract: integer columns, except doses five to seven which are text.
pub fn ozp_contract() -> TableContract {
    let mut columns = vec![
        ColumnSpec::new(ozp::INSURANCE_ID, DataType::Int64),
        ColumnSpec::new(ozp::GENDER, DataType::Int64),
        ColumnSpec::new(ozp::BIRTH_YEAR, DataType::Int64),
        ColumnSpec::new(ozp::BIRTH_MONTH, DataType::Int64),
        ColumnSpec::new(ozp::DEATH_YEAR, DataType::Int64),
        ColumnSpec::new(ozp::DEATH_MONTH, DataType::Int64),
    ];
    for dose in 0..ozp::DOSE_CODES.len() {
        let dtype = if dose + 1 >= ozp::FIRST_TEXT_DOSE {
            DataType::String
        } else {
            DataType::Int64
        };
        columns.push(ColumnSpec::new(ozp::DOSE_CODES[dose], dtype.clone()));
        columns.push(ColumnSpec::new(ozp::DOSE_YEARS[dose], dtype.clone()));
        columns.push(ColumnSpec::new(ozp::DOSE_MONTHS[dose], dtype));
    }
    TableContract::new("OZP", columns)
}

/// Contract for a source export.
pub fn source_contract(kind: SourceKind) -> TableContract {
    match kind {
        SourceKind::Cpzp => cpzp_contract(),
        SourceKind::Ozp => ozp_contract(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpzp_layout() {
        let contract = cpzp_contract();
        assert_eq!(contract.columns.len(), 13);
        assert_eq!(contract.columns[0].name, "tyden_narozeni");
        assert_eq!(contract.columns[2].name, "vakcina1_tyden");
        assert_eq!(contract.columns[3].name, "vakcina1_kod");
        assert_eq!(contract.columns[12].name, "tyden_umrti");
        assert!(
            contract
                .columns
                .iter()
                .all(|column| column.dtype == DataType::String)
        );
    }

    #[test]
    fn ozp_layout() {
        let contract = ozp_contract();
        assert_eq!(contract.columns.len(), 27);
        assert_eq!(contract.dtype_of("Rok Vakcína 4"), Some(&DataType::Int64));
        assert_eq!(contract.dtype_of("Rok Vakcína 5"), Some(&DataType::String));
        assert_eq!(contract.dtype_of("Měsíc Vakcína 7"), Some(&DataType::String));
        assert_eq!(contract.columns[26].name, "Měsíc Vakcína 7");
    }
}
