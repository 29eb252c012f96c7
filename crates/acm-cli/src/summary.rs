use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use acm_cli::preprocess::PreprocessOutcome;
use acm_common::TableContract;
use acm_model::SourceKind;
use acm_report::RateTable;

pub fn print_preprocess_summary(outcome: &PreprocessOutcome) {
    let summary = &outcome.summary;
    println!("Source: {} ({})", outcome.source, outcome.source.description());
    println!("Output: {}", outcome.stored.path.display());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Source rows"), Cell::new(outcome.source_rows)]);
    table.add_row(vec![Cell::new("Persons"), Cell::new(summary.persons)]);
    table.add_row(vec![Cell::new("Periods"), Cell::new(summary.periods)]);
    table.add_row(vec![
        Cell::new("Person-period rows"),
        Cell::new(summary.person_period_rows),
    ]);
    table.add_row(vec![
        Cell::new("Processed rows (60+)")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.processed_rows).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Chunks"), Cell::new(summary.chunks)]);
    table.add_row(vec![Cell::new("Bytes written"), dim_cell(outcome.stored.bytes)]);
    println!("{table}");
}

pub fn print_rate_table(rates: &RateTable) {
    println!(
        "Mortality per 100 000 person-years ({} periods)",
        rates.period_kind
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Age band"),
        header_cell("Vaccination"),
        header_cell("Alive"),
        header_cell("Deaths"),
        header_cell("Rate"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for stratum in &rates.strata {
        table.add_row(vec![
            Cell::new(stratum.age_band).fg(Color::Blue),
            Cell::new(stratum.vaccination_status),
            Cell::new(stratum.alive_count),
            count_cell(stratum.death_count),
            Cell::new(format!("{:.1}", stratum.rate)),
        ]);
    }
    if rates.strata.is_empty() {
        table.add_row(vec![
            dim_cell("-"),
            dim_cell("no rows"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    println!("{table}");
    println!("Total deaths: {}", rates.total_deaths());
}

pub fn print_sources(contracts: &[(SourceKind, TableContract)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Periods"),
        header_cell("Description"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for (source, contract) in contracts {
        table.add_row(vec![
            Cell::new(source.code())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(source.period_kind()),
            Cell::new(source.description()),
            Cell::new(contract.columns.len()),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(Color::Red)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
