pub mod reader;
pub mod writer;

use std::path::PathBuf;

pub use reader::{components_from_grid, parse_size, read_components};
pub use writer::{output_file_name, write_offers, write_results, HEADER};

/// Errors reading the component list or writing the offer sheet
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("File {path:?} not found")]
    NotFound { path: PathBuf },

    #[error("Failed to open workbook {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("Failed to read worksheet: {0}")]
    Read(#[from] calamine::Error),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("No column titles (no \"{0}\" marker in column A)")]
    MissingHeader(&'static str),

    #[error("No \"{0}\" column, unable to proceed")]
    MissingColumn(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
