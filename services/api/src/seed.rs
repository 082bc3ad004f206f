use crate::infra::open_store;
use chrono::NaiveDate;
use clap::Args;
use hiring_metrics::config::AppConfig;
use hiring_metrics::error::AppError;
use hiring_metrics::metrics::{
    CandidateStatus, NewCandidate, NewFact, NewProcess, NewVacancy, SqliteFactStore, VacancyStatus,
};
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Seed this database file instead of the configured one
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SeedSummary {
    pub(crate) vacancies: usize,
    pub(crate) processes: usize,
    pub(crate) facts: usize,
    pub(crate) candidates: usize,
}

struct DemoProcess {
    vacancy: NewVacancy,
    process: NewProcess,
    met_sla: bool,
    opened_on: NaiveDate,
    closed_on: Option<NaiveDate>,
    candidates: Vec<(&'static str, CandidateStatus, NaiveDate, NaiveDate)>,
}

pub(crate) async fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = open_store(config.database, args.database).await?;
    let summary = seed_demo_dataset(&store).await?;

    println!("Seeded {}", store.db_path().display());
    println!(
        "- {} vacancies | {} processes | {} facts | {} candidates",
        summary.vacancies, summary.processes, summary.facts, summary.candidates
    );
    Ok(())
}

/// Insert a small recruitment history: two finished backend hirings and two
/// processes still running.
pub(crate) async fn seed_demo_dataset(store: &SqliteFactStore) -> Result<SeedSummary, AppError> {
    let mut summary = SeedSummary::default();

    for entry in demo_processes()? {
        let vacancy_id = store.insert_vacancy(entry.vacancy).await?;
        summary.vacancies += 1;
        let process_id = store.insert_process(entry.process).await?;
        summary.processes += 1;

        let fact_id = store
            .insert_fact(NewFact {
                vacancy_id: Some(vacancy_id),
                process_id: Some(process_id),
                met_sla: entry.met_sla,
                opened_on: entry.opened_on,
                closed_on: entry.closed_on,
            })
            .await?;
        summary.facts += 1;

        for (name, status, applied_on, updated_on) in entry.candidates {
            store
                .insert_candidate(NewCandidate {
                    fact_id,
                    name: name.to_string(),
                    email: demo_email(name),
                    status,
                    applied_on,
                    updated_on,
                })
                .await?;
            summary.candidates += 1;
        }
    }

    info!(facts = summary.facts, candidates = summary.candidates, "demo dataset loaded");
    Ok(summary)
}

fn demo_email(name: &str) -> String {
    let local: String = name
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(".");
    format!("{local}@example.com")
}

fn day(year: i32, month: u32, day: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AppError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid demo date {year:04}-{month:02}-{day:02}"),
        ))
    })
}

fn demo_processes() -> Result<Vec<DemoProcess>, AppError> {
    Ok(vec![
        DemoProcess {
            vacancy: NewVacancy {
                title: "Senior Rust Developer".to_string(),
                num_positions: 2,
                status: VacancyStatus::Closed,
                opening_date: day(2024, 1, 15)?,
                closing_date: Some(day(2024, 3, 15)?),
            },
            process: NewProcess {
                title: "Backend Engineer Hiring".to_string(),
                description: Some("Payments squad backend openings".to_string()),
                initial_date: day(2024, 1, 20)?,
                finish_date: Some(day(2024, 3, 15)?),
            },
            met_sla: true,
            opened_on: day(2024, 1, 20)?,
            closed_on: Some(day(2024, 3, 15)?),
            candidates: vec![
                ("Ana Souza", CandidateStatus::Hired, day(2024, 1, 22)?, day(2024, 3, 12)?),
                ("Bruno Lima", CandidateStatus::Rejected, day(2024, 1, 25)?, day(2024, 2, 20)?),
                ("Carla Mendes", CandidateStatus::Hired, day(2024, 2, 2)?, day(2024, 3, 15)?),
            ],
        },
        DemoProcess {
            vacancy: NewVacancy {
                title: "Platform Engineer".to_string(),
                num_positions: 1,
                status: VacancyStatus::Closed,
                opening_date: day(2024, 2, 1)?,
                closing_date: Some(day(2024, 4, 10)?),
            },
            process: NewProcess {
                title: "Backend Platform Hiring".to_string(),
                description: None,
                initial_date: day(2024, 2, 5)?,
                finish_date: Some(day(2024, 4, 10)?),
            },
            met_sla: false,
            opened_on: day(2024, 2, 5)?,
            closed_on: Some(day(2024, 4, 10)?),
            candidates: vec![
                ("Diego Rocha", CandidateStatus::Hired, day(2024, 2, 9)?, day(2024, 4, 8)?),
                ("Elisa Prado", CandidateStatus::Rejected, day(2024, 2, 12)?, day(2024, 3, 1)?),
            ],
        },
        DemoProcess {
            vacancy: NewVacancy {
                title: "React Developer".to_string(),
                num_positions: 1,
                status: VacancyStatus::Analyzing,
                opening_date: day(2024, 5, 2)?,
                closing_date: None,
            },
            process: NewProcess {
                title: "Frontend Engineer Hiring".to_string(),
                description: Some("Design system team".to_string()),
                initial_date: day(2024, 5, 5)?,
                finish_date: None,
            },
            met_sla: false,
            opened_on: day(2024, 5, 5)?,
            closed_on: None,
            candidates: vec![
                ("Fabio Torres", CandidateStatus::InAnalysis, day(2024, 5, 7)?, day(2024, 5, 20)?),
                ("Gabriela Nunes", CandidateStatus::Applied, day(2024, 5, 18)?, day(2024, 5, 18)?),
            ],
        },
        DemoProcess {
            vacancy: NewVacancy {
                title: "Data Analyst".to_string(),
                num_positions: 1,
                status: VacancyStatus::Open,
                opening_date: day(2024, 6, 1)?,
                closing_date: None,
            },
            process: NewProcess {
                title: "Analytics Hiring".to_string(),
                description: None,
                initial_date: day(2024, 6, 3)?,
                finish_date: None,
            },
            met_sla: false,
            opened_on: day(2024, 6, 3)?,
            closed_on: None,
            candidates: vec![(
                "Hugo Barros",
                CandidateStatus::Applied,
                day(2024, 6, 4)?,
                day(2024, 6, 4)?,
            )],
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiring_metrics::config::DatabaseConfig;
    use hiring_metrics::metrics::{GetMetricsFilter, MetricsService, VacancyStatus};
    use std::sync::Arc;

    #[tokio::test]
    async fn seeded_dataset_feeds_every_aggregation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DatabaseConfig {
            path: dir.path().join("seed.db"),
            busy_timeout_ms: 1_000,
        };
        let store = open_store(config, None).await.expect("store opens");
        let summary = seed_demo_dataset(&store).await.expect("seed loads");
        assert_eq!(
            summary,
            SeedSummary {
                vacancies: 4,
                processes: 4,
                facts: 4,
                candidates: 8,
            }
        );

        let service = MetricsService::new(Arc::new(store));
        let data = service
            .get_metrics(&GetMetricsFilter::default())
            .await
            .expect("metrics computed");

        assert_eq!(data.card_infos.total_processes, 4);
        assert_eq!(data.card_infos.closed_processes, 2);
        assert_eq!(data.card_infos.hired_candidates, 3);
        assert_eq!(data.vacancy_summary.count(VacancyStatus::Closed), 2);
        assert_eq!(data.vacancy_summary.count(VacancyStatus::Analyzing), 1);
        assert_eq!(data.vacancy_summary.count(VacancyStatus::Open), 1);
        let march = data
            .average_hiring_time
            .get("2024-03")
            .expect("march bucket");
        assert_eq!(march.processes, 1);
        assert!((march.average_days - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn demo_dates_are_checked() {
        assert!(day(2024, 2, 29).is_ok());
        let err = day(2023, 2, 29).expect_err("2023 is not a leap year");
        assert!(err.to_string().contains("2023-02-29"));
    }

    #[test]
    fn demo_emails_are_derived_from_names() {
        assert_eq!(demo_email("Ana Souza"), "ana.souza@example.com");
    }
}
