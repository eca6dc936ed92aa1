use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(String),

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Unrecognized decile group '{value}' in {file}")]
    UnknownDecile { value: String, file: String },

    #[error("Unparsable financial year '{value}' in {file}")]
    UnknownYear { value: String, file: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, EtbError>;
