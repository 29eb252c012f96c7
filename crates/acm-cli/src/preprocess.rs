//! Source export to stored processed panel.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use tracing::{info, info_span, warn};

use acm_ingest::{IngestOptions, read_source};
use acm_model::{ProcessingOptions, SourceKind};
use acm_output::{FrameStorage, StoredFile};
use acm_transform::{ChunkProgress, PanelSummary, SourceGenerator, build_panel};

/// Everything needed to preprocess one export.
#[derive(Debug, Clone)]
pub struct PreprocessRequest {
    pub source_csv: PathBuf,
    pub source: SourceKind,
    pub options: ProcessingOptions,
    pub ingest: IngestOptions,
    pub output_dir: PathBuf,
}

impl PreprocessRequest {
    /// Request with the window and chunking the source implies.
    pub fn new(
        source_csv: impl Into<PathBuf>,
        source: SourceKind,
        start: NaiveDate,
        end: NaiveDate,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_csv: source_csv.into(),
            source,
            options: ProcessingOptions::new(start, end).with_period_kind(source.period_kind()),
            ingest: IngestOptions::default(),
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn with_persons_per_chunk(mut self, persons: usize) -> Self {
        self.options = self.options.with_persons_per_chunk(persons);
        self
    }

    #[must_use]
    pub fn with_ingest(mut self, ingest: IngestOptions) -> Self {
        self.ingest = ingest;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PreprocessOutcome {
    pub source: SourceKind,
    pub name: String,
    pub stored: StoredFile,
    pub summary: PanelSummary,
    pub source_rows: usize,
}

/// Storage name of a processed panel, e.g. `CPZP_from_2020_to_2022`.
pub fn output_name(source: SourceKind, options: &ProcessingOptions) -> String {
    format!(
        "{}_from_{}_to_{}",
        source.code(),
        options.start.year(),
        options.end.year()
    )
}

/// Reads, generates, processes and stores one export.
///
/// `on_chunk` is called after every processed chunk.
pub fn preprocess<F>(request: &PreprocessRequest, on_chunk: F) -> Result<PreprocessOutcome>
where
    F: FnMut(ChunkProgress),
{
    let started = Instant::now();
    let span = info_span!("preprocess", source = %request.source);
    let _guard = span.enter();

    let source_frame = {
        let _read = info_span!("read").entered();
        read_source(&request.source_csv, request.source, &request.ingest).with_context(|| {
            format!("read {} export {}", request.source, request.source_csv.display())
        })?
    };
    info!(rows = source_frame.height(), "source loaded");

    let generator = SourceGenerator::new(
        request.source,
        request.options.start,
        request.options.end,
    );
    let panel = {
        let _build = info_span!("build").entered();
        build_panel(&generator, &source_frame, &request.options, on_chunk)
            .context("build processed panel")?
    };

    let name = output_name(request.source, &request.options);
    let storage = FrameStorage::new(&request.output_dir);
    if storage.exists(&name) {
        warn!(path = %storage.path_for(&name).display(), "replacing stored panel");
    }
    let stored = storage
        .write(&name, &panel.frame)
        .with_context(|| format!("store processed panel {name}"))?;

    info!(
        path = %stored.path.display(),
        rows = panel.summary.processed_rows,
        elapsed_ms = started.elapsed().as_millis(),
        "preprocess complete"
    );
    Ok(PreprocessOutcome {
        source: request.source,
        name,
        stored,
        summary: panel.summary,
        source_rows: source_frame.height(),
    })
}

/// Directory a panel is written to when none is given.
pub fn default_output_dir(source_csv: &Path) -> PathBuf {
    source_csv
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_source_and_window_years() {
        let options = ProcessingOptions::default();
        assert_eq!(output_name(SourceKind::Cpzp, &options), "CPZP_from_2020_to_2022");
        let options = ProcessingOptions::new(
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 9, 30).unwrap(),
        );
        assert_eq!(output_name(SourceKind::Ozp, &options), "OZP_from_2021_to_2021");
    }

    #[test]
    fn request_takes_period_kind_from_source() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let request = PreprocessRequest::new("x.csv", SourceKind::Ozp, date, date, "out");
        assert_eq!(request.options.period_kind, acm_model::PeriodKind::Month);
    }

    #[test]
    fn default_dir_is_csv_parent() {
        assert_eq!(
            default_output_dir(Path::new("data/cpzp.csv")),
            PathBuf::from("data")
        );
        assert_eq!(default_output_dir(Path::new("cpzp.csv")), PathBuf::new());
    }
}
