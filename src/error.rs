//! Error taxonomy shared by the fetch and denormalize stages.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DivError>;

#[derive(Debug, Error)]
pub enum DivError {
    /// The endpoint answered with a status other than 200.
    #[error("Failed to fetch data. Status code: {status}\nResponse content: {body}")]
    TransportFailure { status: u16, body: String },

    /// The SDMX-JSON document does not have the shape the decoder relies on.
    #[error("Malformed SDMX-JSON input: {0}")]
    MalformedInput(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl DivError {
    pub fn malformed(message: impl Into<String>) -> Self {
        DivError::MalformedInput(message.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DivError::MalformedInput(_))
    }
}
