//! Roster CSV reading with explicit header and data rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use roster_model::StudentRecord;
use tracing::{debug, warn};

use crate::columns::{
    ColumnRef, column_index_to_letter, detect_identifier_column, detect_name_columns,
    detect_phone_column, make_unique_headers,
};
use crate::error::{IngestError, Result};

/// Where to find things in a roster file. Rows are 1-based, as in a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub codes_column: ColumnRef,
    pub header_row: usize,
    pub data_start_row: usize,
    /// Detected from the headers when unset.
    pub family_name_column: Option<ColumnRef>,
    pub given_name_column: Option<ColumnRef>,
    pub phone_column: Option<ColumnRef>,
    pub identifier_column: Option<ColumnRef>,
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            codes_column: ColumnRef::letter("I"),
            header_row: 3,
            data_start_row: 4,
            family_name_column: None,
            given_name_column: None,
            phone_column: None,
            identifier_column: None,
            delimiter: b',',
        }
    }
}

/// Resolved 0-based column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterColumns {
    pub codes: usize,
    pub family_name: Option<usize>,
    pub given_name: Option<usize>,
    pub phone: Option<usize>,
    pub identifier: Option<usize>,
}

impl RosterColumns {
    fn is_assigned(&self, index: usize) -> bool {
        index == self.codes
            || [self.family_name, self.given_name, self.phone, self.identifier].contains(&Some(index))
    }
}

/// A loaded roster: unique headers, resolved columns and one record per data row.
#[derive(Debug, Clone)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub columns: RosterColumns,
    pub records: Vec<StudentRecord>,
}

impl RosterTable {
    pub fn header(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(String::as_str)
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

pub fn read_roster(path: &Path, options: &IngestOptions) -> Result<RosterTable> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    debug!(path = %path.display(), "reading roster");
    parse_roster(file, options)
}

/// Parse roster CSV from any reader.
pub fn parse_roster<R: Read>(input: R, options: &IngestOptions) -> Result<RosterTable> {
    for row in [options.header_row, options.data_start_row] {
        if row == 0 {
            return Err(IngestError::InvalidRowNumber { row });
        }
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(input);
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(normalize_cell).collect());
    }

    let header_idx = options.header_row - 1;
    let start_idx = options.data_start_row - 1;
    if header_idx >= raw_rows.len() {
        return Err(IngestError::HeaderRowOutOfRange {
            row: options.header_row,
            rows: raw_rows.len(),
        });
    }
    if start_idx >= raw_rows.len() {
        return Err(IngestError::DataStartOutOfRange {
            row: options.data_start_row,
            rows: raw_rows.len(),
        });
    }

    let width = raw_rows.iter().map(Vec::len).max().unwrap_or(0);
    let header_row = &raw_rows[header_idx];
    let padded: Vec<String> = (0..width)
        .map(|idx| match header_row.get(idx) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => format!("COL_{}", column_index_to_letter(idx)),
        })
        .collect();
    let headers = make_unique_headers(&padded);

    let columns = resolve_columns(&headers, width, options)?;
    debug!(
        rows = raw_rows.len(),
        width,
        codes = %headers[columns.codes],
        family_name = columns.family_name.map(|i| headers[i].as_str()),
        given_name = columns.given_name.map(|i| headers[i].as_str()),
        "roster layout"
    );
    if columns.family_name.is_none() || columns.given_name.is_none() {
        warn!("name columns not found; error exports will have empty names");
    }

    let mut records = Vec::new();
    for (row, cells) in raw_rows.iter().enumerate().skip(start_idx) {
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .filter(|value| !value.is_empty())
                .cloned()
        };
        let mut record = StudentRecord::new(row);
        record.codes = cell(Some(columns.codes));
        record.family_name = cell(columns.family_name);
        record.given_name = cell(columns.given_name);
        record.phone = cell(columns.phone);
        record.identifier = cell(columns.identifier);
        for (idx, value) in cells.iter().enumerate() {
            if value.is_empty() || columns.is_assigned(idx) {
                continue;
            }
            record.extra.insert(headers[idx].clone(), value.clone());
        }
        records.push(record);
    }
    debug!(records = records.len(), "roster loaded");

    Ok(RosterTable {
        headers,
        columns,
        records,
    })
}

fn resolve_columns(
    headers: &[String],
    width: usize,
    options: &IngestOptions,
) -> Result<RosterColumns> {
    let checked = |column: &ColumnRef| -> Result<usize> {
        let index = column.resolve(headers)?;
        if index >= width {
            return Err(IngestError::ColumnOutOfRange {
                column: column.to_string(),
                width,
            });
        }
        Ok(index)
    };
    let optional = |column: &Option<ColumnRef>, detected: Option<usize>| -> Result<Option<usize>> {
        match column {
            Some(column) => checked(column).map(Some),
            None => Ok(detected),
        }
    };

    let codes = checked(&options.codes_column)?;
    let (family_guess, given_guess) = detect_name_columns(headers);
    let not_codes = |index: Option<usize>| index.filter(|i| *i != codes);
    Ok(RosterColumns {
        codes,
        family_name: optional(&options.family_name_column, not_codes(family_guess))?,
        given_name: optional(&options.given_name_column, not_codes(given_guess))?,
        phone: optional(&options.phone_column, not_codes(detect_phone_column(headers)))?,
        identifier: optional(
            &options.identifier_column,
            not_codes(detect_identifier_column(headers)),
        )?,
    })
}
