use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::filter::{FilterError, GetMetricsFilter, MetricsQuery};
use super::processing::{
    compute_card_info, generate_average_hiring_time, generate_vacancy_status_summary,
    AverageHiringTimePerMonth, CardInfos, ProcessingError, VacancyStatusSummary,
};
use super::repository::{FactRepository, RepositoryError};

/// Combined dashboard payload, assembled once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsData {
    #[serde(rename = "vacancyStatus")]
    pub vacancy_summary: VacancyStatusSummary,
    #[serde(rename = "cards")]
    pub card_infos: CardInfos,
    #[serde(rename = "averageHiringTime")]
    pub average_hiring_time: AverageHiringTimePerMonth,
}

/// Facade running the fact query and the three aggregations.
pub struct MetricsService<R> {
    repository: Arc<R>,
}

impl<R> MetricsService<R>
where
    R: FactRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Fetch the facts matching `filter` and derive the dashboard metrics.
    ///
    /// A malformed filter fails before the repository is touched and a query
    /// failure fails before any aggregation runs. Aggregation failures are
    /// collected so the error lists every derivation that failed.
    pub async fn get_metrics(
        &self,
        filter: &GetMetricsFilter,
    ) -> Result<MetricsData, MetricsServiceError> {
        let query = MetricsQuery::from_filter(filter)?;
        let facts = self.repository.fetch(&query).await?;
        debug!(rows = facts.len(), "aggregating hiring process facts");

        let mut failures = Vec::new();
        let card_infos = record(
            AggregationStage::CardInfo,
            compute_card_info(&facts),
            &mut failures,
        );
        let vacancy_summary = record(
            AggregationStage::VacancyStatus,
            generate_vacancy_status_summary(&facts),
            &mut failures,
        );
        let average_hiring_time = record(
            AggregationStage::AverageHiringTime,
            generate_average_hiring_time(&facts),
            &mut failures,
        );

        match (vacancy_summary, card_infos, average_hiring_time) {
            (Some(vacancy_summary), Some(card_infos), Some(average_hiring_time)) => {
                Ok(MetricsData {
                    vacancy_summary,
                    card_infos,
                    average_hiring_time,
                })
            }
            _ => {
                let failures = AggregationFailures(failures);
                warn!(failed = failures.len(), error = %failures, "metrics aggregation failed");
                Err(MetricsServiceError::Aggregation(failures))
            }
        }
    }
}

fn record<T>(
    stage: AggregationStage,
    result: Result<T, ProcessingError>,
    failures: &mut Vec<AggregationFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(source) => {
            failures.push(AggregationFailure { stage, source });
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationStage {
    CardInfo,
    VacancyStatus,
    AverageHiringTime,
}

impl AggregationStage {
    pub const fn context(self) -> &'static str {
        match self {
            Self::CardInfo => "could not calculate `CardInfo` data",
            Self::VacancyStatus => "could not generate `VacancyStatus` summary",
            Self::AverageHiringTime => "could not generate `AvgHiringTime` data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationFailure {
    pub stage: AggregationStage,
    pub source: ProcessingError,
}

impl fmt::Display for AggregationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage.context(), self.source)
    }
}

impl std::error::Error for AggregationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Every aggregation failure of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationFailures(Vec<AggregationFailure>);

impl AggregationFailures {
    pub fn failures(&self) -> &[AggregationFailure] {
        &self.0
    }

    pub fn stages(&self) -> Vec<AggregationStage> {
        self.0.iter().map(|failure| failure.stage).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AggregationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, failure) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        f.write_str("]")
    }
}

impl std::error::Error for AggregationFailures {}

#[derive(Debug, thiserror::Error)]
pub enum MetricsServiceError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("could not retrieve `FactHiringProcess` data: {0}")]
    Query(#[from] RepositoryError),
    #[error("failed to get metrics: {0}")]
    Aggregation(AggregationFailures),
}
