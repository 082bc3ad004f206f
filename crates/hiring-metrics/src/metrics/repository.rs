use async_trait::async_trait;

use super::domain::HiringProcessFact;
use super::filter::MetricsQuery;

/// Read access to the hiring-process fact table so the service can be
/// exercised without a database.
#[async_trait]
pub trait FactRepository: Send + Sync {
    /// Rows matching every predicate of `query`, ordered by fact id, with
    /// vacancy, process and candidates loaded.
    async fn fetch(&self, query: &MetricsQuery) -> Result<Vec<HiringProcessFact>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
