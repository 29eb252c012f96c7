//! Discrete time axis: ordered period labels with dense indices.
//!
//! Weeks are labelled `{iso_year}W{iso_week:02}` and months `{year}M{month:02}`.
//! A label's index is its position in the generated sequence, so indices of
//! different windows are not comparable.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Days, NaiveDate};

use acm_model::PeriodKind;

/// Label for an ISO week.
pub fn week_label(iso_year: i32, week: u32) -> String {
    format!("{iso_year}W{week:02}")
}

/// Label for a calendar month.
pub fn month_label(year: i64, month: i64) -> String {
    format!("{year}M{month:02}")
}

/// ISO week labels visited by stepping seven days from `start` up to `end`.
///
/// The set depends on the weekday of `start`: a week is only included when
/// one of the visited dates falls inside it.
pub fn weeks_in_range(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let mut weeks = BTreeSet::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|date| *date <= end) {
        let iso = date.iso_week();
        weeks.insert(week_label(iso.year(), iso.week()));
        current = date.checked_add_days(Days::new(7));
    }
    weeks.into_iter().collect()
}

/// Month labels from `start`'s month through `end`'s month inclusive.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let last = (i64::from(end.year()), i64::from(end.month()));
    let (mut year, mut month) = (i64::from(start.year()), i64::from(start.month()));
    let mut months = Vec::new();
    while (year, month) <= last {
        months.push(month_label(year, month));
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
    months
}

/// Integer made of `len` characters of `label` starting at `start`.
///
/// Mirrors slicing by characters: a short label yields the characters that
/// exist, and an empty or non-numeric slice yields `None`.
pub fn label_part(label: &str, start: usize, len: usize) -> Option<i64> {
    let part: String = label.chars().skip(start).take(len).collect();
    if part.is_empty() {
        return None;
    }
    part.parse().ok()
}

/// Year prefix of a period label.
pub fn label_year(label: &str) -> Option<i64> {
    label_part(label, 0, 4)
}

/// Week or month number of a period label.
pub fn label_subperiod(label: &str) -> Option<i64> {
    label_part(label, 5, 2)
}

/// Ordered, duplicate-free period labels with O(1) label lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePeriodIndex {
    kind: PeriodKind,
    labels: Vec<String>,
    positions: HashMap<String, i64>,
}

impl TimePeriodIndex {
    /// Periods of `kind` spanning `start..=end`.
    pub fn new(kind: PeriodKind, start: NaiveDate, end: NaiveDate) -> Self {
        let labels = match kind {
            PeriodKind::Week => weeks_in_range(start, end),
            PeriodKind::Month => months_in_range(start, end),
        };
        Self::from_sorted(kind, labels)
    }

    pub fn weeks(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(PeriodKind::Week, start, end)
    }

    pub fn months(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(PeriodKind::Month, start, end)
    }

    fn from_sorted(kind: PeriodKind, labels: Vec<String>) -> Self {
        let positions = labels
            .iter()
            .enumerate()
            .map(|(position, label)| (label.clone(), position as i64))
            .collect();
        Self {
            kind,
            labels,
            positions,
        }
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of `label`, or `None` when it is outside the window.
    pub fn index_of(&self, label: &str) -> Option<i64> {
        self.positions.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    /// Label at `index`.
    pub fn label(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.labels.get(index))
            .map(String::as_str)
    }

    /// `(index, label)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, label)| (index as i64, label.as_str()))
    }

    /// Year of the first period.
    pub fn first_year(&self) -> Option<i64> {
        self.labels.first().and_then(|label| label_year(label))
    }

    /// Year of the last period.
    pub fn last_year(&self) -> Option<i64> {
        self.labels.last().and_then(|label| label_year(label))
    }
}
