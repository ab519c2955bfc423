use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate category id: {id}")]
    DuplicateCategory { id: String },
    #[error("duplicate record id: {id}")]
    DuplicateRecord { id: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
