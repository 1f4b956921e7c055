// src/error.rs

use std::fmt;

/// The field a cell was being parsed as when normalization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Row,
    Storage,
    Cpu,
    Memory,
    Bandwidth,
    Price,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Row => "row",
            Field::Storage => "Storage",
            Field::Cpu => "CPU",
            Field::Memory => "Memory",
            Field::Bandwidth => "Bandwidth",
            Field::Price => "Price mo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Reason {
    #[error("expected at least {expected} space-separated tokens, found {found}")]
    TooFewTokens { expected: usize, found: usize },

    #[error("expected at least {expected} numeric values, found {found}")]
    TooFewNumbers { expected: usize, found: usize },

    #[error("`{0}` is not a number")]
    NotNumeric(String),

    #[error("expected at least {expected} cells, found {found}")]
    TooFewCells { expected: usize, found: usize },
}

/// A single cell that could not be normalized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot parse {field} from {raw:?}: {reason}")]
pub struct ParseError {
    pub field: Field,
    pub raw: String,
    pub reason: Reason,
}

impl ParseError {
    pub fn new(field: Field, raw: impl Into<String>, reason: Reason) -> Self {
        Self {
            field,
            raw: raw.into(),
            reason,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Bad request! GET {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{vendor}: pricing table `{selector}` not found in document")]
    MissingTable {
        vendor: &'static str,
        selector: &'static str,
    },

    #[error("{vendor}: {source}")]
    Row {
        vendor: &'static str,
        #[source]
        source: ParseError,
    },

    #[error("schema must have {expected} columns, got {got}")]
    Schema { expected: usize, got: usize },
}
