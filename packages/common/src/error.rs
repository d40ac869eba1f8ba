use thiserror::Error;

/// Common error type shared by the pagecraft crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Duplicate node id: {0}")]
    DuplicateId(String),
}
