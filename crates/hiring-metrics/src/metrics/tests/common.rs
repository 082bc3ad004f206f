use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::metrics::domain::{
    CandidateStatus, DimProcess, DimVacancy, HiringProcessCandidate, HiringProcessFact,
    VacancyStatus,
};
use crate::metrics::filter::MetricsQuery;
use crate::metrics::repository::{FactRepository, RepositoryError};
use crate::metrics::service::MetricsService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Repository answering from a fixed row set, evaluating predicates in memory.
#[derive(Default)]
pub(super) struct StaticFactRepository {
    rows: Mutex<Vec<HiringProcessFact>>,
    calls: AtomicUsize,
}

impl StaticFactRepository {
    pub(super) fn with_rows(rows: Vec<HiringProcessFact>) -> Self {
        Self {
            rows: Mutex::new(rows),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactRepository for StaticFactRepository {
    async fn fetch(&self, query: &MetricsQuery) -> Result<Vec<HiringProcessFact>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.rows.lock().expect("rows mutex poisoned");
        Ok(guard
            .iter()
            .filter(|fact| query.matches(fact))
            .cloned()
            .collect())
    }
}

/// Repository whose every query fails.
#[derive(Default)]
pub(super) struct UnavailableFactRepository {
    calls: AtomicUsize,
}

impl UnavailableFactRepository {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactRepository for UnavailableFactRepository {
    async fn fetch(&self, _query: &MetricsQuery) -> Result<Vec<HiringProcessFact>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn service<R: FactRepository + 'static>(repository: Arc<R>) -> MetricsService<R> {
    MetricsService::new(repository)
}

pub(super) fn backend_fact() -> HiringProcessFact {
    HiringProcessFact {
        id: 1,
        met_sla: true,
        opened_on: date(2024, 2, 14),
        closed_on: Some(date(2024, 3, 15)),
        vacancy: Some(DimVacancy {
            id: 1,
            title: "Rust Developer".to_string(),
            num_positions: 1,
            status: VacancyStatus::Closed,
            opening_date: date(2024, 2, 1),
            closing_date: Some(date(2024, 3, 15)),
        }),
        process: Some(DimProcess {
            id: 1,
            title: "Backend Engineer".to_string(),
            description: Some("Platform team hiring".to_string()),
            initial_date: date(2024, 2, 14),
            finish_date: Some(date(2024, 3, 15)),
        }),
        candidates: vec![
            HiringProcessCandidate {
                id: 1,
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                status: CandidateStatus::Hired,
                applied_on: date(2024, 2, 15),
                updated_on: date(2024, 3, 15),
            },
            HiringProcessCandidate {
                id: 2,
                name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
                status: CandidateStatus::Rejected,
                applied_on: date(2024, 2, 16),
                updated_on: date(2024, 3, 1),
            },
        ],
    }
}

pub(super) fn frontend_fact() -> HiringProcessFact {
    HiringProcessFact {
        id: 2,
        met_sla: false,
        opened_on: date(2024, 5, 1),
        closed_on: None,
        vacancy: Some(DimVacancy {
            id: 2,
            title: "React Developer".to_string(),
            num_positions: 2,
            status: VacancyStatus::Open,
            opening_date: date(2024, 4, 20),
            closing_date: Some(date(2025, 1, 31)),
        }),
        process: Some(DimProcess {
            id: 2,
            title: "Frontend Engineer".to_string(),
            description: None,
            initial_date: date(2024, 5, 1),
            finish_date: None,
        }),
        candidates: Vec::new(),
    }
}
