/// Errors that can occur while reading a QMS file
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// Input path does not point to a file
    #[error("File not found: {0}")]
    FileNotFound(std::path::PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Tab-delimited body could not be tokenized
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// No non-blank line in the input
    #[error("File is empty or unreadable")]
    Empty,

    /// Header present but no usable data rows
    #[error("No numeric data rows after header")]
    NoData,

    /// Column not found
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}
