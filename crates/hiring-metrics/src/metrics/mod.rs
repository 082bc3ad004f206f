//! Hiring-process metrics for the recruitment dashboard: the filterable fact
//! query, its SQLite store, the aggregations and the facade combining them.

pub mod domain;
pub mod filter;
pub mod processing;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateStatus, DimProcess, DimVacancy, HiringProcessCandidate, HiringProcessFact,
    VacancyStatus,
};
pub use filter::{DateField, FilterError, GetMetricsFilter, MetricsQuery, Predicate};
pub use processing::{
    AverageHiringTimePerMonth, CardInfos, MonthlyHiringTime, ProcessingError, VacancyStatusSummary,
};
pub use repository::{FactRepository, RepositoryError};
pub use router::metrics_router;
pub use service::{
    AggregationFailure, AggregationFailures, AggregationStage, MetricsData, MetricsService,
    MetricsServiceError,
};
pub use storage::{NewCandidate, NewFact, NewProcess, NewVacancy, SqliteFactStore};
