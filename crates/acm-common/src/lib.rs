//! Shared utilities for the mortality panel crates.
//!
//! This crate holds the table contracts every stage validates against and a
//! Polars value helper.

pub mod contract;
pub mod polars;
pub mod sources;

pub use contract::{
    ColumnSpec, ContractError, SchemaIssue, TableContract, person_period_contract,
    processed_contract,
};
pub use polars::non_blank;
pub use sources::{cpzp_contract, ozp_contract, source_contract};
