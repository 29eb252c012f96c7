//! Mortality rates over processed panels.
//!
//! Rates are all-cause deaths per 100 000 person-years for one age band and
//! vaccination status, computed from alive and died-this-period rows.

pub mod error;
pub mod incidence;
pub mod table;
pub mod window;

pub use error::{ReportError, Result};
pub use incidence::{IncidenceStratum, RATE_SCALE, compute_rate, incidence_rate};
pub use table::RateTable;
pub use window::{detect_period_kind, filter_to_periods, is_month_label};
