use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrdemError {
    #[error("Not in an ordem project. Run 'ordem init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .ordem/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Protocol already in use: {0}")]
    ProtocolConflict(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl OrdemError {
    /// Field-scoped validation error
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        OrdemError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrdemError>;
