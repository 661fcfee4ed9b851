//! HTML table reading.

use crate::diagnostics::FailureCategory;
use crate::driver::WebDriver;
use crate::locator::Locator;
use crate::result::PagehandResult;
use crate::session::Session;
use crate::wait::Condition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Locators for a table and its parts
///
/// Header, row and cell locators are resolved inside the table (or row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLocators {
    /// The table
    pub table: Locator,
    /// Header cells
    pub header: Locator,
    /// Body rows
    pub row: Locator,
    /// Cells within a row
    pub cell: Locator,
}

impl TableLocators {
    /// `th` headers, `tr` rows and `td` cells inside `table`
    #[must_use]
    pub fn new(table: Locator) -> Self {
        Self {
            table,
            header: Locator::tag_name("th"),
            row: Locator::tag_name("tr"),
            cell: Locator::tag_name("td"),
        }
    }

    /// Set header locator
    #[must_use]
    pub fn with_header(mut self, header: Locator) -> Self {
        self.header = header;
        self
    }

    /// Set row locator
    #[must_use]
    pub fn with_row(mut self, row: Locator) -> Self {
        self.row = row;
        self
    }

    /// Set cell locator
    #[must_use]
    pub fn with_cell(mut self, cell: Locator) -> Self {
        self.cell = cell;
        self
    }
}

/// Table contents as text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header texts
    pub headers: Vec<String>,
    /// Cell texts per row
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Position of a header
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Rows keyed by header
    #[must_use]
    pub fn records(&self) -> Vec<BTreeMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Rows whose `column` equals `value`
    #[must_use]
    pub fn rows_where(&self, column: &str, value: &str) -> Vec<&[String]> {
        let Some(index) = self.column_index(column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|row| row.get(index).map(String::as_str) == Some(value))
            .map(Vec::as_slice)
            .collect()
    }

    /// Cell text by row number and header
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// Sum of a numeric column; `$` and `,` are stripped, unparsable cells skipped
    #[must_use]
    pub fn column_sum(&self, column: &str) -> f64 {
        let Some(index) = self.column_index(column) else {
            warn!(column, "no such column");
            return 0.0;
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .filter_map(|cell| {
                let cleaned: String = cell
                    .chars()
                    .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                    .collect();
                match cleaned.parse::<f64>() {
                    Ok(n) => Some(n),
                    Err(_) => {
                        debug!(cell = %cell, "skipping non-numeric cell");
                        None
                    }
                }
            })
            .sum()
    }
}

impl<D: WebDriver> Session<D> {
    /// Read headers and body rows of a visible table
    ///
    /// Rows without cells (such as a header row) are left out.
    pub fn read_table(&mut self, locators: &TableLocators) -> PagehandResult<Table> {
        let _session = self.span.clone().entered();
        self.guarded(FailureCategory::GetTextFailed, |s| {
            s.with_stale_retry("read_table", |s| {
                let table = s
                    .wait(&Condition::Visible(locators.table.clone()), None)?
                    .into_element()?;
                let mut headers = Vec::new();
                for th in s.driver.find_child_elements(&table, &locators.header)? {
                    headers.push(s.driver.text(&th)?.trim().to_string());
                }
                let mut rows = Vec::new();
                for tr in s.driver.find_child_elements(&table, &locators.row)? {
                    let mut cells = Vec::new();
                    for td in s.driver.find_child_elements(&tr, &locators.cell)? {
                        cells.push(s.driver.text(&td)?.trim().to_string());
                    }
                    if !cells.is_empty() {
                        rows.push(cells);
                    }
                }
                debug!(table = %locators.table, columns = headers.len(), rows = rows.len(), "read table");
                Ok(Table { headers, rows })
            })
        })
    }
}
