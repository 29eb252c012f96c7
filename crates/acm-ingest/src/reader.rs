//! CSV reading pinned to a table contract.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;
use tracing::debug;

use acm_common::{TableContract, source_contract};
use acm_model::SourceKind;

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Reads the header line and splits it on the separator.
pub fn read_header(path: &Path, separator: u8) -> Result<Vec<String>> {
    let mut reader = BufReader::new(open(path)?);
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_prefix('\u{feff}').unwrap_or(line);
    if line.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(line
        .split(char::from(separator))
        .map(|name| name.trim().trim_matches('"').to_string())
        .collect())
}

/// Reads a CSV file with the contract's dtypes and validates the result.
///
/// Columns named in the contract are parsed with the declared dtype; any
/// other deviation (missing, extra or reordered columns) fails validation.
pub fn read_table(
    path: &Path,
    contract: &TableContract,
    options: &IngestOptions,
) -> Result<DataFrame> {
    if options.has_header {
        read_header(path, options.separator)?;
    }

    let separator = options.separator;
    let df = CsvReadOptions::default()
        .with_has_header(options.has_header)
        .with_schema_overwrite(Some(Arc::new(contract.to_schema())))
        .map_parse_options(|parse| parse.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    contract
        .validate(&df)
        .map_err(|source| IngestError::Contract {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        path = %path.display(),
        contract = contract.name,
        rows = df.height(),
        "loaded source table"
    );
    Ok(df)
}

/// Reads a source export using its registered column layout.
pub fn read_source(path: &Path, source: SourceKind, options: &IngestOptions) -> Result<DataFrame> {
    read_table(path, &source_contract(source), options)
}
