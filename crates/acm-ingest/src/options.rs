//! Reader configuration for source exports.

use serde::{Deserialize, Serialize};

/// Field separator used by both insurer exports.
pub const DEFAULT_SEPARATOR: u8 = b';';

/// Options for reading a source export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Field separator byte.
    pub separator: u8,
    /// Whether the first line holds column names.
    pub has_header: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            has_header: true,
        }
    }
}

impl IngestOptions {
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}
