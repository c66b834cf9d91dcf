use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
