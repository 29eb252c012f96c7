//! Person-period table generation.
//!
//! A generator validates a source export against its layout, reduces every
//! row to a [`CanonicalPerson`], and expands the persons across the period
//! sequence. All generators produce the same person-period layout.

mod cpzp;
mod ozp;

pub use cpzp::CpzpGenerator;
pub use ozp::OzpGenerator;

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use acm_common::{TableContract, source_contract};
use acm_model::{CanonicalPerson, DOSE_COUNT, DeathIndex, MAX_PERIOD, SourceKind, columns};

use crate::error::{Result, TransformError};
use crate::period::{TimePeriodIndex, label_year};

/// Turns a source export into a person-period table.
pub trait PersonPeriodGenerator {
    /// Source export this generator reads.
    fn source(&self) -> SourceKind;

    /// Period sequence persons are expanded across.
    fn periods(&self) -> &TimePeriodIndex;

    /// Canonical attributes of every row, assuming the layout was validated.
    fn read_persons(&self, source: &DataFrame) -> Result<Vec<CanonicalPerson>>;

    fn contract(&self) -> TableContract {
        source_contract(self.source())
    }

    /// Validates `source` and reduces it to canonical persons.
    ///
    /// Fails when the window has more periods than [`MAX_PERIOD`], since
    /// survivors would otherwise read as dying inside it.
    fn canonicalize(&self, source: &DataFrame) -> Result<Vec<CanonicalPerson>> {
        let periods = self.periods().len();
        if periods as i64 > MAX_PERIOD {
            return Err(TransformError::WindowTooLong {
                periods,
                max: MAX_PERIOD,
            });
        }
        self.contract().validate(source)?;
        let persons = self.read_persons(source)?;
        debug!(
            source = %self.source(),
            persons = persons.len(),
            periods = self.periods().len(),
            "canonicalized source rows"
        );
        Ok(persons)
    }

    /// Full person-period table: `persons × periods` rows.
    fn generate(&self, source: &DataFrame) -> Result<DataFrame> {
        let persons = self.canonicalize(source)?;
        cross_join(&persons, self.periods())
    }

    /// Person-period table in chunks of at most `persons_per_chunk` persons.
    ///
    /// Validation happens up front; concatenating the chunks gives the same
    /// table as [`PersonPeriodGenerator::generate`].
    fn generate_chunks(
        &self,
        source: &DataFrame,
        persons_per_chunk: usize,
    ) -> Result<PersonPeriodChunks<'_>> {
        let persons = self.canonicalize(source)?;
        Ok(PersonPeriodChunks::new(
            persons,
            self.periods(),
            persons_per_chunk,
        ))
    }
}

/// Generator for any supported source.
#[derive(Debug, Clone)]
pub enum SourceGenerator {
    Cpzp(CpzpGenerator),
    Ozp(OzpGenerator),
}

impl SourceGenerator {
    /// Generator for `source` over the window `start..=end`, using the
    /// source's native period kind.
    pub fn new(source: SourceKind, start: NaiveDate, end: NaiveDate) -> Self {
        match source {
            SourceKind::Cpzp => SourceGenerator::Cpzp(CpzpGenerator::new(start, end)),
            SourceKind::Ozp => SourceGenerator::Ozp(OzpGenerator::new(start, end)),
        }
    }

    fn inner(&self) -> &dyn PersonPeriodGenerator {
        match self {
            SourceGenerator::Cpzp(generator) => generator,
            SourceGenerator::Ozp(generator) => generator,
        }
    }
}

impl PersonPeriodGenerator for SourceGenerator {
    fn source(&self) -> SourceKind {
        self.inner().source()
    }

    fn periods(&self) -> &TimePeriodIndex {
        self.inner().periods()
    }

    fn read_persons(&self, source: &DataFrame) -> Result<Vec<CanonicalPerson>> {
        self.inner().read_persons(source)
    }
}

/// Death index for a non-blank death label.
///
/// Years before the window map to [`DeathIndex::BeforeWindow`] and years
/// after it to [`DeathIndex::NotInWindow`]. Inside the window the label must
/// resolve exactly; an unresolved label, like an unparseable year, counts as
/// before the window.
pub(crate) fn resolve_death(label: &str, periods: &TimePeriodIndex) -> DeathIndex {
    let Some(year) = label_year(label) else {
        return DeathIndex::BeforeWindow;
    };
    if periods.first_year().is_some_and(|first| year < first) {
        return DeathIndex::BeforeWindow;
    }
    if periods.last_year().is_some_and(|last| year > last) {
        return DeathIndex::NotInWindow;
    }
    periods
        .index_of(label)
        .map_or(DeathIndex::BeforeWindow, DeathIndex::At)
}

/// Expands every person across every period, grouped by person.
pub fn cross_join(persons: &[CanonicalPerson], periods: &TimePeriodIndex) -> Result<DataFrame> {
    let rows = persons.len() * periods.len();
    let mut person_ids = Vec::with_capacity(rows);
    let mut birth_labels: Vec<Option<&str>> = Vec::with_capacity(rows);
    let mut doses: [Vec<Option<i64>>; DOSE_COUNT] =
        std::array::from_fn(|_| Vec::with_capacity(rows));
    let mut death_indices = Vec::with_capacity(rows);
    let mut period_labels = Vec::with_capacity(rows);
    let mut period_indices = Vec::with_capacity(rows);

    for person in persons {
        let death = person.death.to_sentinel();
        for (index, label) in periods.iter() {
            person_ids.push(person.person_id);
            birth_labels.push(person.birth_label.as_deref());
            for (column, dose) in doses.iter_mut().zip(person.doses) {
                column.push(dose);
            }
            death_indices.push(death);
            period_labels.push(label);
            period_indices.push(index);
        }
    }

    let mut frame_columns = vec![
        Column::new(columns::PERSON_ID.into(), person_ids),
        Column::new(columns::BIRTH_LABEL.into(), birth_labels),
    ];
    for (name, values) in columns::DOSES.into_iter().zip(doses) {
        frame_columns.push(Column::new(name.into(), values));
    }
    frame_columns.push(Column::new(columns::DEATH_INDEX.into(), death_indices));
    frame_columns.push(Column::new(columns::PERIOD_LABEL.into(), period_labels));
    frame_columns.push(Column::new(columns::PERIOD_INDEX.into(), period_indices));

    Ok(DataFrame::new(frame_columns)?)
}

/// Iterator over person-period chunks for contiguous runs of persons.
#[derive(Debug)]
pub struct PersonPeriodChunks<'a> {
    persons: Vec<CanonicalPerson>,
    periods: &'a TimePeriodIndex,
    persons_per_chunk: usize,
    next: usize,
}

impl<'a> PersonPeriodChunks<'a> {
    /// A chunk size of zero is treated as one.
    pub fn new(
        persons: Vec<CanonicalPerson>,
        periods: &'a TimePeriodIndex,
        persons_per_chunk: usize,
    ) -> Self {
        Self {
            persons,
            periods,
            persons_per_chunk: persons_per_chunk.max(1),
            next: 0,
        }
    }

    /// Total persons across all chunks.
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    /// Total chunks, including those already yielded.
    pub fn chunk_count(&self) -> usize {
        self.persons.len().div_ceil(self.persons_per_chunk)
    }
}

impl Iterator for PersonPeriodChunks<'_> {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.persons.len() {
            return None;
        }
        let end = (self.next + self.persons_per_chunk).min(self.persons.len());
        let chunk = &self.persons[self.next..end];
        self.next = end;
        Some(cross_join(chunk, self.periods))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> TimePeriodIndex {
        TimePeriodIndex::weeks(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
        )
    }

    #[test]
    fn death_rules() {
        let periods = periods();
        assert_eq!(resolve_death("2021W20", &periods), DeathIndex::At(20));
        assert_eq!(resolve_death("2019W10", &periods), DeathIndex::BeforeWindow);
        assert_eq!(resolve_death("2023W01", &periods), DeathIndex::NotInWindow);
        // 2020W10 is inside the window's first year but not a window period.
        assert_eq!(resolve_death("2020W10", &periods), DeathIndex::BeforeWindow);
        assert_eq!(resolve_death("20x1W10", &periods), DeathIndex::BeforeWindow);
    }

    #[test]
    fn cross_join_groups_by_person() {
        let periods = periods();
        let persons = vec![
            CanonicalPerson::new(1).with_birth_label(Some("1950W01".to_string())),
            CanonicalPerson::new(2).with_death(DeathIndex::At(3)),
        ];
        let df = cross_join(&persons, &periods).unwrap();
        assert_eq!(df.height(), 2 * 105);

        let ids = df.column(columns::PERSON_ID).unwrap().u32().unwrap();
        assert_eq!(ids.get(104), Some(1));
        assert_eq!(ids.get(105), Some(2));
        let period_index = df.column(columns::PERIOD_INDEX).unwrap().i64().unwrap();
        assert_eq!(period_index.get(105), Some(0));
        let births = df.column(columns::BIRTH_LABEL).unwrap().str().unwrap();
        assert_eq!(births.get(0), Some("1950W01"));
        assert_eq!(births.get(105), None);
        let deaths = df.column(columns::DEATH_INDEX).unwrap().i64().unwrap();
        assert_eq!(deaths.get(0), Some(1_000));
        assert_eq!(deaths.get(105), Some(3));
    }

    #[test]
    fn cross_join_follows_person_period_contract() {
        let df = cross_join(&[], &periods()).unwrap();
        assert_eq!(df.height(), 0);
        assert!(acm_common::person_period_contract().validate(&df).is_ok());
    }

    #[test]
    fn chunks_cover_every_person() {
        let periods = periods();
        let persons: Vec<_> = (1..=5).map(CanonicalPerson::new).collect();
        let chunks = PersonPeriodChunks::new(persons, &periods, 2);
        assert_eq!(chunks.chunk_count(), 3);
        let heights: Vec<usize> = chunks.map(|chunk| chunk.unwrap().height()).collect();
        assert_eq!(heights, vec![210, 210, 105]);
    }
}
