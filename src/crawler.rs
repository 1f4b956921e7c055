// src/crawler.rs

use scraper::Html;
use tracing::{debug, info, warn};

use crate::error::CrawlError;
use crate::fetch::ParseMode;
use crate::normalize;
use crate::table::{default_columns, PricingTable};
use crate::vendor::Vendor;

/// Construction options for a [`Crawler`].
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Replacement names for the data columns. Must match the default column count.
    pub columns: Option<Vec<String>>,
    /// Drop malformed rows without logging them.
    pub ignore_error: bool,
    /// Abort the pass on the first malformed row.
    pub break_on_error: bool,
    /// How the fetched page is parsed before extraction.
    pub parse_mode: ParseMode,
}

/// Holds one vendor's parsed page and the table extracted from it.
///
/// The exposed table is only ever replaced by a pass that produced at least one
/// row, so a page that suddenly yields nothing usable keeps the last good data.
pub struct Crawler<V: Vendor> {
    vendor: V,
    document: Html,
    columns: Vec<String>,
    ignore_error: bool,
    break_on_error: bool,
    data: PricingTable,
}

impl<V: Vendor> Crawler<V> {
    /// Build the crawler and run the first extraction pass.
    pub fn new(vendor: V, document: Html, options: CrawlOptions) -> Result<Self, CrawlError> {
        let mut crawler = Self {
            vendor,
            document,
            columns: default_columns(),
            ignore_error: options.ignore_error,
            break_on_error: options.break_on_error,
            data: PricingTable::default(),
        };
        if let Some(columns) = options.columns {
            crawler.set_columns(columns)?;
        }
        crawler.data = PricingTable::new(crawler.columns.clone());

        crawler.update_data()?;
        Ok(crawler)
    }

    /// Current table. Empty until a pass yields rows.
    pub fn data(&self) -> &PricingTable {
        &self.data
    }

    /// Active data column names, without the `Enterprise` label column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rename the data columns. The count is fixed because `map_row` emits a
    /// fixed number of cells; the new names apply from the next pass.
    pub fn set_columns(&mut self, columns: Vec<String>) -> Result<(), CrawlError> {
        if columns.len() != self.columns.len() {
            return Err(CrawlError::Schema {
                expected: self.columns.len(),
                got: columns.len(),
            });
        }
        self.columns = columns;
        Ok(())
    }

    /// Remove every row from the exposed table, keeping its columns.
    pub fn drop_data(&mut self) {
        self.data.clear();
    }

    /// Swap in a freshly fetched page and run a pass over it.
    pub fn reload(&mut self, document: Html) -> Result<(), CrawlError> {
        self.document = document;
        self.update_data()
    }

    /// One extraction pass over the held document.
    pub fn update_data(&mut self) -> Result<(), CrawlError> {
        let vendor = self.vendor.enterprise();
        let raw_rows = self.vendor.locate_rows(&self.document)?;
        let found = raw_rows.len();
        debug!(vendor, rows = found, "located pricing rows");

        let mut table = PricingTable::new(self.columns.clone());
        for (idx, raw) in raw_rows.iter().enumerate() {
            let row: Vec<String> = raw.iter().map(|cell| normalize::collapse(cell)).collect();

            match self.vendor.map_row(&row) {
                Ok(mapped) => table.push(mapped.cells())?,
                Err(e) => {
                    if !self.ignore_error {
                        warn!(vendor, row = idx, error = %e, "dropping row");
                    }
                    if self.break_on_error {
                        return Err(CrawlError::Row { vendor, source: e });
                    }
                }
            }
        }

        if table.is_empty() {
            warn!(vendor, rows = found, "no usable rows; keeping previous table");
            return Ok(());
        }

        table.stamp_enterprise(vendor);
        info!(vendor, kept = table.len(), dropped = found - table.len(), "extracted");
        self.data = table;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Field;
    use crate::table::{Cell, DEFAULT_COLUMNS, ENTERPRISE_COLUMN};
    use crate::test_support::init_test_logging;
    use crate::vendor::Vultr;

    fn vultr_page(rows: &[[&str; 6]]) -> Html {
        let mut html = String::from(r#"<html><body><div class="pt">"#);
        for row in rows {
            html.push_str(r#"<div class="pt__row-content">"#);
            for cell in row {
                html.push_str(&format!(
                    "<div class=\"pt__cell\">\n\t<span>{}</span>\n</div>",
                    cell
                ));
            }
            html.push_str("</div>");
        }
        html.push_str("</div></body></html>");
        Html::parse_document(&html)
    }

    const GOOD: [&str; 6] = [
        "Name X",
        "1,000 GB SSD",
        "4 vCPUs",
        "8 GB",
        "2.5 TB",
        "$5.00/mo ($0.01/hr)",
    ];
    const SECOND: [&str; 6] = [
        "Name Y",
        "50 GB NVMe",
        "2 vCPUs",
        "4 GB",
        "3 TB",
        "$20.00/mo $0.03/hr",
    ];
    const BAD: [&str; 6] = ["Broken", "1000 GB", "4 vCPUs", "8 GB", "2.5 TB", "$5/mo $0.01/hr"];

    #[test]
    fn end_to_end_vultr_row() -> Result<(), CrawlError> {
        init_test_logging();
        let crawler = Crawler::new(Vultr, vultr_page(&[GOOD]), CrawlOptions::default())?;
        let table = crawler.data();

        let mut expected_cols = vec![ENTERPRISE_COLUMN.to_string()];
        expected_cols.extend(DEFAULT_COLUMNS.iter().map(|c| c.to_string()));
        assert_eq!(table.columns(), expected_cols.as_slice());
        assert_eq!(
            table.records()[0],
            vec![
                Cell::from("Vultr"),
                Cell::Int(1000),
                Cell::from("GB"),
                Cell::from("SSD"),
                Cell::Int(4),
                Cell::Int(8),
                Cell::from("GB"),
                Cell::Float(2.5),
                Cell::from("TB"),
                Cell::Float(5.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn malformed_row_is_dropped_and_later_rows_kept() -> Result<(), CrawlError> {
        init_test_logging();
        let page = vultr_page(&[GOOD, BAD, SECOND]);
        let crawler = Crawler::new(Vultr, page, CrawlOptions::default())?;
        let table = crawler.data();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0][4], Cell::Int(4));
        assert_eq!(table.records()[1][3], Cell::from("NVMe"));
        Ok(())
    }

    #[test]
    fn break_on_error_aborts_construction() {
        init_test_logging();
        let options = CrawlOptions {
            ignore_error: true,
            break_on_error: true,
            ..Default::default()
        };
        let err = Crawler::new(Vultr, vultr_page(&[GOOD, BAD]), options).err().unwrap();
        match err {
            CrawlError::Row { vendor, source } => {
                assert_eq!(vendor, "Vultr");
                assert_eq!(source.field, Field::Storage);
                assert_eq!(source.raw, "1000 GB");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_pass_keeps_previous_table() -> Result<(), CrawlError> {
        init_test_logging();
        let page = vultr_page(&[GOOD, SECOND]);
        let mut crawler = Crawler::new(Vultr, page, CrawlOptions::default())?;
        let before = crawler.data().clone();
        assert_eq!(before.len(), 2);

        crawler.reload(vultr_page(&[BAD, BAD]))?;
        assert_eq!(crawler.data(), &before);

        // a missing grid is an error and also leaves the table alone
        let missing = Html::parse_document("<html><body></body></html>");
        assert!(matches!(
            crawler.reload(missing),
            Err(CrawlError::MissingTable { .. })
        ));
        assert_eq!(crawler.data(), &before);

        crawler.reload(vultr_page(&[SECOND]))?;
        assert_eq!(crawler.data().len(), 1);
        Ok(())
    }

    #[test]
    fn first_pass_without_rows_leaves_unstamped_empty_table() -> Result<(), CrawlError> {
        let crawler = Crawler::new(
            Vultr,
            vultr_page(&[BAD]),
            CrawlOptions {
                ignore_error: true,
                ..Default::default()
            },
        )?;
        assert!(crawler.data().is_empty());
        assert_eq!(crawler.data().columns().len(), DEFAULT_COLUMNS.len());
        Ok(())
    }

    #[test]
    fn set_columns_checks_length() -> Result<(), CrawlError> {
        let mut crawler = Crawler::new(Vultr, vultr_page(&[GOOD]), CrawlOptions::default())?;
        let err = crawler.set_columns(vec!["only".into()]).unwrap_err();
        assert!(matches!(err, CrawlError::Schema { expected: 9, got: 1 }));

        let renamed: Vec<String> = (0..9).map(|i| format!("c{i}")).collect();
        crawler.set_columns(renamed.clone())?;
        assert_eq!(crawler.columns(), renamed.as_slice());
        // existing data keeps its names until the next pass
        assert_eq!(crawler.data().columns()[1], "Storage");

        crawler.update_data()?;
        assert_eq!(crawler.data().columns()[1], "c0");
        Ok(())
    }

    #[test]
    fn custom_columns_with_enterprise_are_overwritten() -> Result<(), CrawlError> {
        let mut columns: Vec<String> = DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns[8] = ENTERPRISE_COLUMN.to_string();
        let crawler = Crawler::new(
            Vultr,
            vultr_page(&[GOOD]),
            CrawlOptions {
                columns: Some(columns),
                ..Default::default()
            },
        )?;
        let table = crawler.data();
        assert_eq!(table.columns().len(), 9);
        assert_eq!(table.records()[0][8], Cell::from("Vultr"));
        Ok(())
    }

    #[test]
    fn constructor_rejects_bad_schema() {
        let result = Crawler::new(
            Vultr,
            vultr_page(&[GOOD]),
            CrawlOptions {
                columns: Some(vec!["a".into(), "b".into()]),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(CrawlError::Schema { .. })));
    }

    #[test]
    fn drop_data_clears_rows() -> Result<(), CrawlError> {
        let mut crawler = Crawler::new(Vultr, vultr_page(&[GOOD]), CrawlOptions::default())?;
        crawler.drop_data();
        assert!(crawler.data().is_empty());
        assert_eq!(crawler.data().columns()[0], ENTERPRISE_COLUMN);
        Ok(())
    }
}
