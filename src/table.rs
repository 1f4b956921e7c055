// src/table.rs

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::CrawlError;
use crate::normalize::{Price, Quantity, Storage};

/// Name of the vendor label column.
pub const ENTERPRISE_COLUMN: &str = "Enterprise";

/// Data columns produced by every vendor, in export order.
pub const DEFAULT_COLUMNS: [&str; 9] = [
    "Storage",
    "Storage unit",
    "Storage type",
    "CPU",
    "Memory",
    "Memory unit",
    "Bandwidth",
    "Bandwidth unit",
    "Price mo",
];

pub fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// One typed table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{}", v),
            // Debug keeps the trailing `.0` on whole numbers
            Cell::Float(v) => write!(f, "{:?}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Null => Ok(()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Int(v) => serializer.serialize_i64(*v),
            Cell::Float(v) => serializer.serialize_f64(*v),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// CPU count. Some vendors only give a descriptive token, which is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cpu {
    Count(i64),
    Raw(String),
}

/// One hosting plan mapped into the canonical data columns.
///
/// The vendor label is not part of the row; it is stamped onto the table once
/// an extraction pass finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRow {
    pub storage: Storage,
    pub cpu: Cpu,
    pub memory: Quantity<i64>,
    pub bandwidth: Quantity<f64>,
    pub price: Price,
}

impl PricingRow {
    /// Cells in `DEFAULT_COLUMNS` order. The hourly price is not exported.
    pub fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(self.storage.amount),
            Cell::Text(self.storage.unit.clone()),
            Cell::Text(self.storage.kind.clone()),
            match &self.cpu {
                Cpu::Count(n) => Cell::Int(*n),
                Cpu::Raw(s) => Cell::Text(s.clone()),
            },
            Cell::Int(self.memory.amount),
            Cell::Text(self.memory.unit.clone()),
            Cell::Float(self.bandwidth.amount),
            Cell::Text(self.bandwidth.unit.clone()),
            Cell::Float(self.price.monthly),
        ]
    }
}

/// Ordered column names plus records whose arity always matches them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricingTable {
    columns: Vec<String>,
    records: Vec<Vec<Cell>>,
}

impl PricingTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Vec<Cell>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one record; its arity must equal the column count.
    pub fn push(&mut self, cells: Vec<Cell>) -> Result<(), CrawlError> {
        if cells.len() != self.columns.len() {
            return Err(CrawlError::Schema {
                expected: self.columns.len(),
                got: cells.len(),
            });
        }
        self.records.push(cells);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Set the `Enterprise` column of every record to `label`, adding the
    /// column in front when the schema does not already carry one.
    pub fn stamp_enterprise(&mut self, label: &str) {
        match self.column_index(ENTERPRISE_COLUMN) {
            Some(idx) => {
                for rec in &mut self.records {
                    rec[idx] = Cell::from(label);
                }
            }
            None => {
                self.columns.insert(0, ENTERPRISE_COLUMN.to_string());
                for rec in &mut self.records {
                    rec.insert(0, Cell::from(label));
                }
            }
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Stack tables in order. Columns are the union in first-seen order and
    /// cells a table lacks come out as `Cell::Null`.
    pub fn concat<'a, I>(tables: I) -> PricingTable
    where
        I: IntoIterator<Item = &'a PricingTable>,
    {
        let tables: Vec<&PricingTable> = tables.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        for t in &tables {
            for c in &t.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }

        let mut out = PricingTable::new(columns);
        for t in &tables {
            let positions: Vec<Option<usize>> =
                out.columns.iter().map(|c| t.column_index(c)).collect();
            for rec in &t.records {
                let aligned = positions
                    .iter()
                    .map(|p| p.map(|i| rec[i].clone()).unwrap_or(Cell::Null))
                    .collect();
                out.records.push(aligned);
            }
        }
        out
    }

    /// Borrowing view that serializes as an array of `{column: value}` objects.
    pub fn as_records(&self) -> Records<'_> {
        Records(self)
    }
}

pub struct Records<'a>(&'a PricingTable);

struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let table = self.0;
        let mut seq = serializer.serialize_seq(Some(table.records.len()))?;
        for cells in &table.records {
            seq.serialize_element(&Record {
                columns: &table.columns,
                cells,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (k, v) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Human readable dump: a row index followed by right-aligned columns.
impl fmt::Display for PricingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.records.is_empty() {
            return writeln!(
                f,
                "Empty table\nColumns: [{}]\nIndex: []",
                self.columns.join(", ")
            );
        }

        let rendered: Vec<Vec<String>> = self
            .records
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        let index_width = (self.records.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                rendered
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:w$}", "", w = index_width)?;
        for (name, w) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", name, w = *w)?;
        }
        writeln!(f)?;

        for (idx, row) in rendered.iter().enumerate() {
            write!(f, "{:<w$}", idx, w = index_width)?;
            for (cell, w) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", cell, w = *w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
