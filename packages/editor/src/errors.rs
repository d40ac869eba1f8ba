//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Invalid page tree: {0}")]
    Tree(#[from] pagecraft_common::CommonError),

    #[error("Document is not file-backed")]
    NotFileBacked,

    #[error("Asset is empty: {0}")]
    EmptyAsset(String),
}
