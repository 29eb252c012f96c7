//! Chunked generation and classification of a whole source export.

use polars::prelude::DataFrame;
use tracing::{debug, info};

use acm_model::ProcessingOptions;

use crate::error::{Result, TransformError};
use crate::generator::{PersonPeriodGenerator, cross_join};
use crate::processor::process;

/// Progress after one chunk has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// 1-based number of the finished chunk.
    pub chunk: usize,
    pub chunks: usize,
    /// Persons finished so far.
    pub persons_done: usize,
    pub persons_total: usize,
}

/// Counts describing a built panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelSummary {
    pub persons: usize,
    pub periods: usize,
    pub person_period_rows: usize,
    pub processed_rows: usize,
    pub chunks: usize,
}

/// A processed panel and how it was produced.
#[derive(Debug, Clone)]
pub struct Panel {
    pub frame: DataFrame,
    pub summary: PanelSummary,
}

/// Generates and processes `source` chunk by chunk.
///
/// At most `options.persons_per_chunk` persons are expanded at a time; each
/// chunk is classified and filtered before it is appended to the result.
/// `options.period_kind` must match the generator's periods; it selects the
/// recency window.
pub fn build_panel<G, F>(
    generator: &G,
    source: &DataFrame,
    options: &ProcessingOptions,
    mut on_chunk: F,
) -> Result<Panel>
where
    G: PersonPeriodGenerator + ?Sized,
    F: FnMut(ChunkProgress),
{
    let period_kind = options.period_kind;
    if generator.periods().kind() != period_kind {
        return Err(TransformError::PeriodKindMismatch {
            expected: period_kind,
            actual: generator.periods().kind(),
        });
    }
    let chunks = generator.generate_chunks(source, options.persons_per_chunk)?;
    let mut summary = PanelSummary {
        persons: chunks.person_count(),
        periods: generator.periods().len(),
        chunks: chunks.chunk_count(),
        ..PanelSummary::default()
    };

    let mut frame: Option<DataFrame> = None;
    let mut persons_done = 0usize;
    for (position, chunk) in chunks.enumerate() {
        let chunk = chunk?;
        summary.person_period_rows += chunk.height();
        let processed = process(&chunk, period_kind)?;
        if summary.periods > 0 {
            persons_done += chunk.height() / summary.periods;
        }
        debug!(
            chunk = position + 1,
            rows = chunk.height(),
            kept = processed.height(),
            "processed chunk"
        );
        match frame.as_mut() {
            Some(frame) => {
                frame.vstack_mut(&processed)?;
            }
            None => frame = Some(processed),
        }
        on_chunk(ChunkProgress {
            chunk: position + 1,
            chunks: summary.chunks,
            persons_done,
            persons_total: summary.persons,
        });
    }

    let frame = match frame {
        Some(frame) => frame,
        None => process(&cross_join(&[], generator.periods())?, period_kind)?,
    };
    summary.processed_rows = frame.height();
    info!(
        source = %generator.source(),
        persons = summary.persons,
        periods = summary.periods,
        rows = summary.processed_rows,
        "panel built"
    );
    Ok(Panel { frame, summary })
}
