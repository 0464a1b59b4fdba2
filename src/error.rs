use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: &'static str, column: String },

    #[error("Amount overflow while summing {0}")]
    AmountOverflow(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid date: {0} (expected DD/MM/YYYY or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, RedeError>;
