//! # QMS Reader Module
//!
//! Parses the ASCII logs exported by the quadrupole mass spectrometer into a
//! table of named numeric columns.
//!
//! The first non-blank line is the header (time, temperature, one column per
//! m/z channel, photodiode current...). Fields are tab separated when the
//! header contains a tab, otherwise separated by runs of whitespace.
//!
//! ## Example
//!
//! ```rust
//! use qms_ice::reader::QmsTable;
//!
//! let text = "TimesExp\t18.00\t28.00\n0\t1e-10\t2e-10\n1\t1.5e-10\t2.5e-10\n";
//! let table = QmsTable::parse(text)?;
//!
//! assert_eq!(table.n_rows(), 2);
//! assert_eq!(table.column("28.00")?, &[2e-10, 2.5e-10]);
//! assert_eq!(table.mass_labels(), vec!["18.00", "28.00"]);
//! # Ok::<(), qms_ice::reader::ReaderError>(())
//! ```

mod channels;
mod error;
mod summary;

#[cfg(test)]
mod tests;

pub use channels::{Channel, ChannelRequest, ChannelSet};
pub use error::ReaderError;
pub use summary::TableSummary;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

/// Field separator detected from the header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Single tab characters
    Tab,
    /// Runs of spaces or tabs
    Whitespace,
}

/// Numeric columns of a QMS file, addressed by header label
#[derive(Debug, Clone)]
pub struct QmsTable {
    headers: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    delimiter: Delimiter,
    skipped_rows: usize,
}

/// Read a QMS file from disk
pub fn read_qms_file<P: AsRef<Path>>(path: P) -> Result<QmsTable, ReaderError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ReaderError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    QmsTable::from_reader(file)
}

impl QmsTable {
    /// Parse a QMS table from any byte source; invalid UTF-8 is replaced
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ReaderError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse(&String::from_utf8_lossy(&bytes))
    }

    /// Parse a QMS table from text
    pub fn parse(text: &str) -> Result<Self, ReaderError> {
        // Leading tabs mark empty fields, so only line endings are stripped.
        let mut lines = text
            .lines()
            .map(|l| l.trim_end_matches(['\r', '\n']))
            .filter(|l| !l.trim().is_empty());
        let header_line = lines.next().ok_or(ReaderError::Empty)?;

        let delimiter = if header_line.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Whitespace
        };
        let mut headers: Vec<String> = split_fields(header_line, delimiter)
            .into_iter()
            .map(str::to_string)
            .collect();

        let body: Vec<&str> = lines.collect();
        let rows: Vec<Vec<f64>> = match delimiter {
            Delimiter::Tab => tab_rows(&body)?,
            Delimiter::Whitespace => body
                .iter()
                .map(|line| split_fields(line, delimiter).into_iter().map(parse_field).collect())
                .collect(),
        };

        let n_cols = rows.first().map(Vec::len).ok_or(ReaderError::NoData)?;
        let mut columns = vec![Vec::with_capacity(rows.len()); n_cols];
        let mut skipped_rows = 0;
        for row in rows {
            if row.len() != n_cols {
                skipped_rows += 1;
                continue;
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        if skipped_rows > 0 {
            warn!(
                "Skipped {} row(s) whose field count differs from {}",
                skipped_rows, n_cols
            );
        }

        if headers.len() > n_cols {
            debug!("Header has {} names for {} columns, truncating", headers.len(), n_cols);
            headers.truncate(n_cols);
        } else {
            for i in headers.len()..n_cols {
                headers.push(format!("col_{}", i));
            }
        }

        let mut index = HashMap::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }

        debug!(
            "Parsed QMS table: {} columns, {} rows, {:?} separated",
            headers.len(),
            columns.first().map_or(0, Vec::len),
            delimiter
        );

        Ok(Self {
            headers,
            columns,
            index,
            delimiter,
            skipped_rows,
        })
    }

    /// Column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Detected field separator
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Rows dropped because their field count did not match
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Whether a column with this label exists
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Values of the column named `label`
    pub fn column(&self, label: &str) -> Result<&[f64], ReaderError> {
        self.index
            .get(label)
            .map(|&i| self.columns[i].as_slice())
            .ok_or_else(|| ReaderError::ColumnNotFound(label.to_string()))
    }

    /// Headers that look like m/z labels (`"28"`, `"28.00"`)
    pub fn mass_labels(&self) -> Vec<&str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| is_mass_label(h))
            .collect()
    }
}

fn split_fields(line: &str, delimiter: Delimiter) -> Vec<&str> {
    match delimiter {
        Delimiter::Tab => line.split('\t').map(str::trim).collect(),
        Delimiter::Whitespace => line.split_whitespace().collect(),
    }
}

fn tab_rows(body: &[&str]) -> Result<Vec<Vec<f64>>, ReaderError> {
    let joined = body.join("\n");
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .quoting(false)
        .from_reader(joined.as_bytes());

    let mut rows = Vec::with_capacity(body.len());
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(parse_field).collect());
    }
    Ok(rows)
}

fn parse_field(field: &str) -> f64 {
    field.trim().parse().unwrap_or(f64::NAN)
}

fn is_mass_label(label: &str) -> bool {
    let digits = label.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
