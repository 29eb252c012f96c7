//! End-to-end tests: source table to processed panel.

use acm_common::{cpzp_contract, processed_contract};
use acm_model::{PeriodKind, ProcessingOptions, SourceKind, columns};
use acm_transform::{ChunkProgress, SourceGenerator, TransformError, build_panel};
use chrono::NaiveDate;
use polars::prelude::*;

fn cpzp_row(
    birth: &'static str,
    doses: [&'static str; 4],
    death: &'static str,
) -> Vec<Option<&'static str>> {
    let cell = |value: &'static str| (!value.is_empty()).then_some(value);
    let mut row = vec![None; 13];
    row[0] = cell(birth);
    for (dose, label) in doses.into_iter().enumerate() {
        row[2 + dose * 2] = cell(label);
    }
    row[12] = cell(death);
    row
}

fn cpzp_source(rows: &[Vec<Option<&'static str>>]) -> DataFrame {
    let columns = cpzp_contract()
        .columns
        .iter()
        .enumerate()
        .map(|(position, spec)| {
            let values: Vec<Option<&str>> = rows.iter().map(|row| row[position]).collect();
            Column::new(spec.name.into(), values)
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

fn options() -> ProcessingOptions {
    ProcessingOptions::new(
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
    )
}

/// `person|period|band|survival|vaccination` per processed row.
fn render(frame: &DataFrame) -> String {
    let ids = frame.column(columns::PERSON_ID).unwrap().u32().unwrap();
    let labels = frame.column(columns::PERIOD_LABEL).unwrap().str().unwrap();
    let bands = frame.column(columns::AGE_BAND).unwrap().str().unwrap();
    let survival = frame.column(columns::SURVIVAL_STATUS).unwrap().str().unwrap();
    let vaccination = frame.column(columns::VACCINATION_STATUS).unwrap().i32().unwrap();
    (0..frame.height())
        .map(|row| {
            format!(
                "{}|{}|{}|{}|{}",
                ids.get(row).unwrap(),
                labels.get(row).unwrap(),
                bands.get(row).unwrap(),
                survival.get(row).unwrap(),
                vaccination.get(row).unwrap(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_panel_classifies_each_period() {
    let options = options();
    let generator = SourceGenerator::new(SourceKind::Cpzp, options.start, options.end);
    let source = cpzp_source(&[
        cpzp_row("1950W03", ["2021W01", "", "", ""], "2021W03"),
        cpzp_row("1990W01", ["", "", "", ""], ""),
        cpzp_row("", ["", "", "", ""], ""),
    ]);

    let panel = build_panel(&generator, &source, &options, |_| {}).unwrap();

    processed_contract().validate(&panel.frame).unwrap();
    assert_eq!(panel.summary.persons, 3);
    assert_eq!(panel.summary.periods, 5);
    assert_eq!(panel.summary.person_period_rows, 15);
    insta::assert_snapshot!(render(&panel.frame), @r"
    1|2020W53|70-79|alive|0
    1|2021W01|70-79|alive|10
    1|2021W02|70-79|alive|10
    1|2021W03|70-79|died_now|10
    1|2021W04|70-79|after_death|10
    3|2020W53|80+|alive|0
    3|2021W01|80+|alive|0
    3|2021W02|80+|alive|0
    3|2021W03|80+|alive|0
    3|2021W04|80+|alive|0
    ");
}

#[test]
fn test_progress_reports_every_chunk() {
    let options = options().with_persons_per_chunk(2);
    let generator = SourceGenerator::new(SourceKind::Cpzp, options.start, options.end);
    let rows: Vec<_> = (0..5)
        .map(|_| cpzp_row("1940W01", ["", "", "", ""], ""))
        .collect();
    let source = cpzp_source(&rows);

    let mut progress: Vec<ChunkProgress> = Vec::new();
    let panel = build_panel(&generator, &source, &options, |step| progress.push(step)).unwrap();

    assert_eq!(panel.summary.chunks, 3);
    assert_eq!(panel.frame.height(), 25);
    let done: Vec<usize> = progress.iter().map(|step| step.persons_done).collect();
    assert_eq!(done, vec![2, 4, 5]);
    assert!(progress.iter().all(|step| step.chunks == 3 && step.persons_total == 5));
}

#[test]
fn test_empty_source_yields_empty_processed_table() {
    let options = options();
    let generator = SourceGenerator::new(SourceKind::Cpzp, options.start, options.end);
    let panel = build_panel(&generator, &cpzp_source(&[]), &options, |_| {}).unwrap();

    assert_eq!(panel.frame.height(), 0);
    assert_eq!(panel.summary.chunks, 0);
    processed_contract().validate(&panel.frame).unwrap();
}

#[test]
fn test_period_kind_must_match_generator() {
    let options = options().with_period_kind(PeriodKind::Month);
    let generator = SourceGenerator::new(SourceKind::Cpzp, options.start, options.end);
    let source = cpzp_source(&[cpzp_row("1940W01", ["", "", "", ""], "")]);

    let err = build_panel(&generator, &source, &options, |_| {}).unwrap_err();
    assert!(matches!(
        err,
        TransformError::PeriodKindMismatch {
            expected: PeriodKind::Month,
            actual: PeriodKind::Week,
        }
    ));
}
