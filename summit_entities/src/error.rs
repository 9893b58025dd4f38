use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("row not found")]
    RowNotFound,
    /// The two sides of a denormalized link disagree. Link writes always
    /// touch both tables, so this state indicates a partial write.
    #[error("consistency error: {0}")]
    Consistency(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}
