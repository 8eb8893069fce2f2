use std::fmt;

use super::{Delimiter, QmsTable};
use crate::integrate::SECONDS_PER_MINUTE;

/// Summary statistics about a QMS table
#[derive(Debug, Clone)]
pub struct TableSummary {
    /// Number of data rows
    pub rows: usize,
    /// Column names in file order
    pub columns: Vec<String>,
    /// Columns recognised as m/z channels
    pub mass_labels: Vec<String>,
    /// Detected field separator
    pub delimiter: Delimiter,
    /// Rows dropped during parsing
    pub skipped_rows: usize,
    /// Finite time range (min, max) in seconds, when the time column exists
    pub time_range: Option<(f64, f64)>,
}

impl QmsTable {
    /// Get summary statistics about the table
    pub fn summary(&self, time_key: &str) -> TableSummary {
        let time_range = self.column(time_key).ok().and_then(|time| {
            let (min, max) = time
                .iter()
                .filter(|t| t.is_finite())
                .fold((f64::MAX, f64::MIN), |(lo, hi), &t| (lo.min(t), hi.max(t)));
            (min <= max).then_some((min, max))
        });

        TableSummary {
            rows: self.n_rows(),
            columns: self.headers().to_vec(),
            mass_labels: self.mass_labels().into_iter().map(String::from).collect(),
            delimiter: self.delimiter(),
            skipped_rows: self.skipped_rows(),
            time_range,
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QMS File Summary")?;
        writeln!(f, "================")?;
        writeln!(f, "Rows: {}", self.rows)?;
        writeln!(f, "Columns: {} ({:?} separated)", self.columns.len(), self.delimiter)?;
        if self.skipped_rows > 0 {
            writeln!(f, "Skipped rows: {}", self.skipped_rows)?;
        }
        if let Some((min_s, max_s)) = self.time_range {
            writeln!(
                f,
                "Time range: {:.1} - {:.1} sec ({:.2} - {:.2} min)",
                min_s,
                max_s,
                min_s / SECONDS_PER_MINUTE,
                max_s / SECONDS_PER_MINUTE
            )?;
        }
        writeln!(f, "Mass channels: {}", self.mass_labels.join(", "))?;
        writeln!(f)?;
        writeln!(f, "Columns:")?;
        for (i, name) in self.columns.iter().enumerate() {
            writeln!(f, "  {:3}. {}", i + 1, name)?;
        }
        Ok(())
    }
}
