use std::sync::Arc;

use super::common::{
    backend_fact, frontend_fact, service, StaticFactRepository, UnavailableFactRepository,
};
use crate::metrics::domain::VacancyStatus;
use crate::metrics::filter::{DateField, FilterError, GetMetricsFilter};
use crate::metrics::processing::ProcessingError;
use crate::metrics::repository::RepositoryError;
use crate::metrics::service::{AggregationStage, MetricsServiceError};

fn filter(
    hiring_process: &str,
    vacancy: &str,
    start_date: &str,
    end_date: &str,
) -> GetMetricsFilter {
    GetMetricsFilter {
        hiring_process: Some(hiring_process.to_string()),
        vacancy: Some(vacancy.to_string()),
        start_date: Some(start_date.to_string()),
        end_date: Some(end_date.to_string()),
    }
}

#[tokio::test]
async fn empty_filter_aggregates_every_row() {
    let repository = Arc::new(StaticFactRepository::with_rows(vec![
        backend_fact(),
        frontend_fact(),
    ]));
    let service = service(repository.clone());

    let data = service
        .get_metrics(&GetMetricsFilter::default())
        .await
        .expect("metrics computed");

    assert_eq!(repository.calls(), 1);
    assert_eq!(data.card_infos.total_processes, 2);
    assert_eq!(data.card_infos.open_processes, 1);
    assert_eq!(data.card_infos.closed_processes, 1);
    assert_eq!(data.card_infos.total_candidates, 2);
    assert_eq!(data.card_infos.hired_candidates, 1);
    assert_eq!(data.vacancy_summary.count(VacancyStatus::Open), 1);
    assert_eq!(data.vacancy_summary.count(VacancyStatus::Closed), 1);
    assert_eq!(data.vacancy_summary.total(), 2);
}

#[tokio::test]
async fn filtered_request_only_reflects_matching_rows() {
    let repository = Arc::new(StaticFactRepository::with_rows(vec![
        backend_fact(),
        frontend_fact(),
    ]));
    let service = service(repository);

    let data = service
        .get_metrics(&filter("Backend", "", "2024-01-01", "2024-12-31"))
        .await
        .expect("metrics computed");

    assert_eq!(data.card_infos.total_processes, 1);
    assert_eq!(data.card_infos.average_hiring_time_days, Some(30.0));
    assert_eq!(data.average_hiring_time.len(), 1);
    let march = data
        .average_hiring_time
        .get("2024-03")
        .expect("march bucket present");
    assert_eq!(march.processes, 1);
    assert_eq!(march.average_days, 30.0);
}

#[tokio::test]
async fn malformed_date_fails_without_querying() {
    let repository = Arc::new(StaticFactRepository::with_rows(vec![backend_fact()]));
    let service = service(repository.clone());

    let err = service
        .get_metrics(&filter("", "", "2024-13-40", ""))
        .await
        .expect_err("invalid start date rejected");

    assert!(matches!(
        err,
        MetricsServiceError::Filter(FilterError::InvalidDate {
            field: DateField::StartDate,
            ..
        })
    ));
    assert!(err.to_string().contains("could not parse `StartDate`"));
    assert_eq!(repository.calls(), 0);

    let err = service
        .get_metrics(&filter("", "", "2024-01-01", "tomorrow"))
        .await
        .expect_err("invalid end date rejected");
    assert!(err.to_string().contains("could not parse `EndDate`"));
    assert_eq!(repository.calls(), 0);
}

#[tokio::test]
async fn query_failure_is_reported_with_context() {
    let repository = Arc::new(UnavailableFactRepository::default());
    let service = service(repository.clone());

    let err = service
        .get_metrics(&GetMetricsFilter::default())
        .await
        .expect_err("query failure surfaces");

    assert_eq!(repository.calls(), 1);
    assert!(matches!(
        err,
        MetricsServiceError::Query(RepositoryError::Unavailable(_))
    ));
    assert!(err
        .to_string()
        .starts_with("could not retrieve `FactHiringProcess` data"));
}

#[tokio::test]
async fn every_failing_aggregation_is_reported() {
    let mut orphan = backend_fact();
    orphan.id = 42;
    orphan.vacancy = None;
    let repository = Arc::new(StaticFactRepository::with_rows(vec![frontend_fact(), orphan]));
    let service = service(repository);

    let err = service
        .get_metrics(&GetMetricsFilter::default())
        .await
        .expect_err("aggregation failures surface");

    let MetricsServiceError::Aggregation(failures) = &err else {
        panic!("expected aggregation failure, got {err}");
    };
    assert_eq!(
        failures.stages(),
        vec![
            AggregationStage::VacancyStatus,
            AggregationStage::AverageHiringTime
        ]
    );
    assert!(failures
        .failures()
        .iter()
        .all(|failure| failure.source == ProcessingError::MissingVacancy { fact_id: 42 }));

    let message = err.to_string();
    assert!(message.starts_with("failed to get metrics: ["));
    assert!(message.contains("could not generate `VacancyStatus` summary"));
    assert!(message.contains("could not generate `AvgHiringTime` data"));
    assert!(!message.contains("CardInfo"));
}

#[tokio::test]
async fn all_three_aggregations_can_fail_together() {
    let mut broken = backend_fact();
    broken.vacancy = None;
    broken.process = None;
    let repository = Arc::new(StaticFactRepository::with_rows(vec![broken]));
    let service = service(repository);

    let err = service
        .get_metrics(&GetMetricsFilter::default())
        .await
        .expect_err("aggregation failures surface");

    match err {
        MetricsServiceError::Aggregation(failures) => assert_eq!(failures.len(), 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let repository = Arc::new(StaticFactRepository::with_rows(vec![
        backend_fact(),
        frontend_fact(),
    ]));
    let service = service(repository);
    let request = filter("Engineer", "Developer", "2024-01-01", "2025-12-31");

    let first = service.get_metrics(&request).await.expect("first call");
    let second = service.get_metrics(&request).await.expect("second call");

    assert_eq!(first, second);
    assert_eq!(first.card_infos.total_processes, 2);
    assert_eq!(
        first.average_hiring_time.get("2024-03").map(|month| month.processes),
        Some(1)
    );
    assert!(first.average_hiring_time.get("2025-01").is_none());
}
