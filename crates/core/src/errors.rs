use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtelierError {
    #[error("Invalid week key: {0}")]
    InvalidWeekKey(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to decode document {id}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode document {id}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Identifier namespace '{namespace}' exhausted after {attempts} attempts")]
    IdExhaustion { namespace: String, attempts: u32 },
}

pub type AtelierResult<T> = Result<T, AtelierError>;
