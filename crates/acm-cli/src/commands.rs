use anyhow::{Context, Result, bail};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use acm_cli::preprocess::{PreprocessOutcome, PreprocessRequest, default_output_dir, preprocess};
use acm_common::source_contract;
use acm_ingest::IngestOptions;
use acm_model::{PeriodKind, ProcessingOptions, SourceKind};
use acm_output::read_parquet;
use acm_report::{RateTable, detect_period_kind, filter_to_periods};
use acm_transform::{ChunkProgress, TimePeriodIndex};

use crate::cli::{PeriodsArgs, PreprocessArgs, RatesArgs};
use crate::summary::{apply_table_style, print_rate_table, print_sources};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} persons ({eta}) {msg}";

pub fn run_preprocess(args: &PreprocessArgs) -> Result<PreprocessOutcome> {
    if !args.separator.is_ascii() {
        bail!(
            "separator must be a single ASCII character, got '{}'",
            args.separator
        );
    }
    let source = SourceKind::from(args.source);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.source_csv));
    let request = PreprocessRequest::new(&args.source_csv, source, args.from, args.to, output_dir)
        .with_persons_per_chunk(args.chunk_size)
        .with_ingest(IngestOptions::default().with_separator(args.separator as u8));

    let progress = ProgressBar::new(0);
    match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        Ok(style) => progress.set_style(style.progress_chars("#>-")),
        Err(error) => debug!(%error, "progress template rejected, using default style"),
    }
    progress.set_message(source.code());

    let outcome = preprocess(&request, |step: ChunkProgress| {
        progress.set_length(step.persons_total as u64);
        progress.set_position(step.persons_done as u64);
        progress.set_message(format!("chunk {}/{}", step.chunk, step.chunks));
    });
    match &outcome {
        Ok(outcome) => {
            progress.finish_with_message(format!("{} rows", outcome.summary.processed_rows));
        }
        Err(_) => progress.abandon(),
    }
    outcome
}

pub fn run_rates(args: &RatesArgs) -> Result<()> {
    let processed = read_parquet(&args.processed)
        .with_context(|| format!("read processed panel {}", args.processed.display()))?;
    let period_kind = detect_period_kind(&processed).context("detect period kind")?;
    debug!(rows = processed.height(), %period_kind, "loaded processed panel");

    let processed = if args.from.is_some() || args.to.is_some() {
        let defaults = ProcessingOptions::default();
        let periods = TimePeriodIndex::new(
            period_kind,
            args.from.unwrap_or(defaults.start),
            args.to.unwrap_or(defaults.end),
        );
        let filtered = filter_to_periods(&processed, &periods).context("restrict to window")?;
        info!(
            kept = filtered.height(),
            dropped = processed.height() - filtered.height(),
            "restricted panel to window"
        );
        filtered
    } else {
        processed
    };

    let rates = RateTable::build(&processed, period_kind).context("compute rates")?;
    if args.json {
        let json = serde_json::to_string_pretty(&rates).context("serialize rates")?;
        println!("{json}");
    } else {
        print_rate_table(&rates);
    }
    Ok(())
}

pub fn run_periods(args: &PeriodsArgs) -> Result<()> {
    let kind = PeriodKind::from(args.kind);
    let periods = TimePeriodIndex::new(kind, args.from, args.to);
    if periods.is_empty() {
        bail!("window {} .. {} contains no {} periods", args.from, args.to, kind);
    }
    let mut table = Table::new();
    table.set_header(vec!["Index", "Label"]);
    apply_table_style(&mut table);
    for (index, label) in periods.iter() {
        table.add_row(vec![index.to_string(), label.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_sources() -> Result<()> {
    let contracts: Vec<_> = SourceKind::ALL
        .into_iter()
        .map(|source| (source, source_contract(source)))
        .collect();
    print_sources(&contracts);
    for (source, contract) in &contracts {
        println!("{source}: {}", contract.column_names().collect::<Vec<_>>().join(";"));
    }
    Ok(())
}
