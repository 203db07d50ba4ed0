use thiserror::Error;

use core_recents::RecentsError;
use core_runtime::RuntimeError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] RuntimeError),

    #[error("Recents store error: {0}")]
    Recents(#[from] RecentsError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
