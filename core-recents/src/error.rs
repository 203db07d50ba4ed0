use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecentsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, RecentsError>;
