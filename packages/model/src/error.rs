use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown block type: {0}")]
    UnknownKind(String),

    #[error("Block data is not an object")]
    NotAnObject,

    #[error("Invalid block data: {0}")]
    Payload(#[from] serde_json::Error),
}
