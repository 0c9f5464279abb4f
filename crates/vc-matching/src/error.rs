use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcError {
    #[error("Failed to read the investor dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Investor dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Investor dataset must be a JSON array of objects; entry {0} is not an object")]
    InvalidRecord(usize),

    #[error("Invalid search parameter: {0}")]
    InvalidQuery(String),
}
