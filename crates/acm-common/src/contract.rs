//! Declared table contracts and exact schema checking.
//!
//! A contract is an ordered list of column names and Polars dtypes. A table
//! follows the contract only when its columns match name, dtype and position;
//! anything else is reported as a schema mismatch listing every deviation.

use std::fmt;

use polars::prelude::{DataFrame, DataType, PlSmallStr, Schema};
use thiserror::Error;

use acm_model::columns;

/// A single expected column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub dtype: DataType,
}

impl ColumnSpec {
    pub fn new(name: &'static str, dtype: DataType) -> Self {
        Self { name, dtype }
    }
}

/// Ordered column contract for a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableContract {
    /// Name used in error messages (e.g. "CPZP", "person-period").
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
}

/// One way a table deviates from its contract.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaIssue {
    MissingColumn {
        name: String,
        expected: DataType,
    },
    UnexpectedColumn {
        name: String,
        found: DataType,
    },
    TypeMismatch {
        name: String,
        expected: DataType,
        found: DataType,
    },
    /// Column exists with the right dtype but at a different position.
    OutOfOrder {
        name: String,
        expected_position: usize,
        found_position: usize,
    },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::MissingColumn { name, expected } => {
                write!(f, "missing column '{name}' ({expected})")
            }
            SchemaIssue::UnexpectedColumn { name, found } => {
                write!(f, "unexpected column '{name}' ({found})")
            }
            SchemaIssue::TypeMismatch {
                name,
                expected,
                found,
            } => write!(f, "column '{name}' is {found}, expected {expected}"),
            SchemaIssue::OutOfOrder {
                name,
                expected_position,
                found_position,
            } => write!(
                f,
                "column '{name}' at position {found_position}, expected {expected_position}"
            ),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractError {
    #[error("table does not follow the {contract} schema: {}", format_issues(.issues))]
    SchemaMismatch {
        contract: String,
        issues: Vec<SchemaIssue>,
    },
}

impl ContractError {
    pub fn issues(&self) -> &[SchemaIssue] {
        match self {
            ContractError::SchemaMismatch { issues, .. } => issues,
        }
    }
}

fn format_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TableContract {
    pub fn new(name: &'static str, columns: Vec<ColumnSpec>) -> Self {
        Self { name, columns }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }

    pub fn dtype_of(&self, name: &str) -> Option<&DataType> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| &column.dtype)
    }

    /// Polars schema with the contract's dtypes, used to pin reader dtypes.
    pub fn to_schema(&self) -> Schema {
        self.columns
            .iter()
            .map(|column| (PlSmallStr::from_static(column.name), column.dtype.clone()))
            .collect()
    }

    /// Every deviation of `df` from this contract; empty when it conforms.
    pub fn check(&self, df: &DataFrame) -> Vec<SchemaIssue> {
        let actual: Vec<(String, DataType)> = df
            .get_columns()
            .iter()
            .map(|column| (column.name().to_string(), column.dtype().clone()))
            .collect();
        let mut issues = Vec::new();

        for (expected_position, spec) in self.columns.iter().enumerate() {
            let Some(found_position) = actual.iter().position(|(name, _)| name == spec.name)
            else {
                issues.push(SchemaIssue::MissingColumn {
                    name: spec.name.to_string(),
                    expected: spec.dtype.clone(),
                });
                continue;
            };
            let found = &actual[found_position].1;
            if *found != spec.dtype {
                issues.push(SchemaIssue::TypeMismatch {
                    name: spec.name.to_string(),
                    expected: spec.dtype.clone(),
                    found: found.clone(),
                });
            } else if found_position != expected_position {
                issues.push(SchemaIssue::OutOfOrder {
                    name: spec.name.to_string(),
                    expected_position,
                    found_position,
                });
            }
        }

        for (name, dtype) in &actual {
            if self.dtype_of(name).is_none() {
                issues.push(SchemaIssue::UnexpectedColumn {
                    name: name.clone(),
                    found: dtype.clone(),
                });
            }
        }

        issues
    }

    /// Fail with [`ContractError::SchemaMismatch`] unless `df` conforms exactly.
    pub fn validate(&self, df: &DataFrame) -> Result<(), ContractError> {
        let issues = self.check(df);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ContractError::SchemaMismatch {
                contract: self.name.to_string(),
                issues,
            })
        }
    }

    /// Check only that the listed columns exist with the contract's dtype.
    ///
    /// Used by consumers that read a subset of a table and ignore the rest.
    pub fn validate_subset(&self, df: &DataFrame, names: &[&str]) -> Result<(), ContractError> {
        let mut issues = Vec::new();
        for name in names {
            let Some(expected) = self.dtype_of(name) else {
                continue;
            };
            match df.column(name) {
                Ok(column) if column.dtype() == expected => {}
                Ok(column) => issues.push(SchemaIssue::TypeMismatch {
                    name: (*name).to_string(),
                    expected: expected.clone(),
                    found: column.dtype().clone(),
                }),
                Err(_) => issues.push(SchemaIssue::MissingColumn {
                    name: (*name).to_string(),
                    expected: expected.clone(),
                }),
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ContractError::SchemaMismatch {
                contract: self.name.to_string(),
                issues,
            })
        }
    }
}

/// Contract of the canonical person-period table every generator produces.
pub fn person_period_contract() -> TableContract {
    TableContract::new(
        "person-period",
        vec![
            ColumnSpec::new(columns::PERSON_ID, DataType::UInt32),
            ColumnSpec::new(columns::BIRTH_LABEL, DataType::String),
            ColumnSpec::new(columns::DOSE_1, DataType::Int64),
            ColumnSpec::new(columns::DOSE_2, DataType::Int64),
            ColumnSpec::new(columns::DOSE_3, DataType::Int64),
            ColumnSpec::new(columns::DOSE_4, DataType::Int64),
            ColumnSpec::new(columns::DEATH_INDEX, DataType::Int64),
            ColumnSpec::new(columns::PERIOD_LABEL, DataType::String),
            ColumnSpec::new(columns::PERIOD_INDEX, DataType::Int64),
        ],
    )
}

/// Contract of a classified and projected table.
pub fn processed_contract() -> TableContract {
    TableContract::new(
        "processed",
        vec![
            ColumnSpec::new(columns::PERSON_ID, DataType::UInt32),
            ColumnSpec::new(columns::PERIOD_LABEL, DataType::String),
            ColumnSpec::new(columns::AGE_BAND, DataType::String),
            ColumnSpec::new(columns::SURVIVAL_STATUS, DataType::String),
            ColumnSpec::new(columns::VACCINATION_STATUS, DataType::Int32),
        ],
    )
}
