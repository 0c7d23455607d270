//! Output types produced by the pipeline.

use serde::{Deserialize, Serialize};

/// One table row: cells left to right, `None` where a column is empty.
pub type Row = Vec<Option<String>>;

/// A detected table, serialised as a plain array of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Text and tables read out of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Page texts joined by `\n`, trimmed.
    pub text: String,
    /// Tables in page order, then top-to-bottom within a page.
    pub tables: Vec<Table>,
}

/// The result returned to collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub tables: Vec<Table>,
}
