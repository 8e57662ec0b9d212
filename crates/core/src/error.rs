#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Report contract violated: {0}")]
    Contract(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
