//! Period-kind detection and window restriction for processed tables.

use polars::prelude::{BooleanChunked, DataFrame};

use acm_common::processed_contract;
use acm_model::{PeriodKind, columns};
use acm_transform::TimePeriodIndex;

use crate::error::Result;

/// True for labels shaped like `2021M05`.
pub fn is_month_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'M'
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

/// Months when every period label is a month label, otherwise weeks.
///
/// An empty table has no counter-example and counts as monthly.
pub fn detect_period_kind(processed: &DataFrame) -> Result<PeriodKind> {
    processed_contract().validate_subset(processed, &[columns::PERIOD_LABEL])?;
    let labels = processed.column(columns::PERIOD_LABEL)?.str()?;
    let monthly = labels
        .into_iter()
        .all(|label| label.is_some_and(is_month_label));
    Ok(if monthly {
        PeriodKind::Month
    } else {
        PeriodKind::Week
    })
}

/// Rows whose period label belongs to `periods`.
pub fn filter_to_periods(processed: &DataFrame, periods: &TimePeriodIndex) -> Result<DataFrame> {
    processed_contract().validate_subset(processed, &[columns::PERIOD_LABEL])?;
    let labels = processed.column(columns::PERIOD_LABEL)?.str()?;
    let mask: BooleanChunked = labels
        .into_iter()
        .map(|label| label.is_some_and(|label| periods.contains(label)))
        .collect();
    Ok(processed.filter(&mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polars::prelude::Column;

    fn labels(values: &[&str]) -> DataFrame {
        DataFrame::new(vec![Column::new(
            columns::PERIOD_LABEL.into(),
            values.to_vec(),
        )])
        .unwrap()
    }

    #[test]
    fn month_label_shape() {
        assert!(is_month_label("2021M05"));
        assert!(!is_month_label("2021W05"));
        assert!(!is_month_label("2021M5"));
        assert!(!is_month_label("21M05xx"));
    }

    #[test]
    fn detects_kind() {
        assert_eq!(
            detect_period_kind(&labels(&["2021M01", "2021M02"])).unwrap(),
            PeriodKind::Month
        );
        assert_eq!(
            detect_period_kind(&labels(&["2021M01", "2021W02"])).unwrap(),
            PeriodKind::Week
        );
        assert_eq!(detect_period_kind(&labels(&[])).unwrap(), PeriodKind::Month);
    }

    #[test]
    fn filters_to_window() {
        let df = labels(&["2020M12", "2021M01", "2021M06", "2022M01"]);
        let periods = TimePeriodIndex::months(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
        );
        let filtered = filter_to_periods(&df, &periods).unwrap();
        let kept = filtered.column(columns::PERIOD_LABEL).unwrap().str().unwrap();
        assert_eq!(
            kept.into_iter().collect::<Vec<_>>(),
            vec![Some("2021M01"), Some("2021M06")]
        );
    }
}
