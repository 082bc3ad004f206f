use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::debug;

use super::domain::{
    CandidateStatus, DimProcess, DimVacancy, HiringProcessCandidate, HiringProcessFact,
    VacancyStatus,
};
use super::filter::{MetricsQuery, Predicate, FILTER_DATE_FORMAT};
use super::repository::{FactRepository, RepositoryError};
use crate::config::DatabaseConfig;

pub type StorageResult<T> = Result<T, RepositoryError>;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

const FACT_SELECT: &str = r#"
    SELECT
        f.id, f.met_sla, f.opened_on, f.closed_on,
        v.id, v.title, v.num_positions, v.status, v.opening_date, v.closing_date,
        p.id, p.title, p.description, p.initial_date, p.finish_date
    FROM fact_hiring_process f
    LEFT JOIN dim_vacancy v ON v.id = f.dim_vacancy_id
    LEFT JOIN dim_process p ON p.id = f.dim_process_id
"#;

#[derive(Debug, Clone)]
pub struct NewVacancy {
    pub title: String,
    pub num_positions: u32,
    pub status: VacancyStatus,
    pub opening_date: NaiveDate,
    pub closing_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewProcess {
    pub title: String,
    pub description: Option<String>,
    pub initial_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewFact {
    pub vacancy_id: Option<i64>,
    pub process_id: Option<i64>,
    pub met_sla: bool,
    pub opened_on: NaiveDate,
    pub closed_on: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub fact_id: i64,
    pub name: String,
    pub email: String,
    pub status: CandidateStatus,
    pub applied_on: NaiveDate,
    pub updated_on: NaiveDate,
}

/// SQLite-backed fact store. Every operation opens its own connection on a
/// blocking thread.
#[derive(Debug, Clone)]
pub struct SqliteFactStore {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteFactStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Open the configured database and bring its schema up to date.
    pub async fn setup(config: &DatabaseConfig) -> StorageResult<Self> {
        let store = Self {
            db_path: config.path.clone(),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        };
        store.migrate().await?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<T, F>(&self, func: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let busy_timeout = self.busy_timeout;
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path, busy_timeout)?;
            func(&connection)
        })
        .await
        .map_err(|error| RepositoryError::Task(error.to_string()))?
    }

    /// Idempotently create the fact and dimension tables.
    pub async fn migrate(&self) -> StorageResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS dim_vacancy (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    num_positions INTEGER NOT NULL DEFAULT 1,
                    status TEXT NOT NULL DEFAULT 'open',
                    opening_date TEXT NOT NULL,
                    closing_date TEXT
                );

                CREATE TABLE IF NOT EXISTS dim_process (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT,
                    initial_date TEXT NOT NULL,
                    finish_date TEXT
                );

                CREATE TABLE IF NOT EXISTS fact_hiring_process (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    dim_vacancy_id INTEGER,
                    dim_process_id INTEGER,
                    met_sla INTEGER NOT NULL DEFAULT 0,
                    opened_on TEXT NOT NULL,
                    closed_on TEXT,
                    FOREIGN KEY(dim_vacancy_id) REFERENCES dim_vacancy(id) ON DELETE SET NULL,
                    FOREIGN KEY(dim_process_id) REFERENCES dim_process(id) ON DELETE SET NULL
                );

                CREATE TABLE IF NOT EXISTS hiring_process_candidate (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    fact_hiring_process_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'applied',
                    applied_on TEXT NOT NULL,
                    updated_on TEXT NOT NULL,
                    FOREIGN KEY(fact_hiring_process_id) REFERENCES fact_hiring_process(id) ON DELETE CASCADE
                );

                CREATE INDEX IF NOT EXISTS idx_vacancy_closing_date ON dim_vacancy(closing_date);
                CREATE INDEX IF NOT EXISTS idx_fact_vacancy ON fact_hiring_process(dim_vacancy_id);
                CREATE INDEX IF NOT EXISTS idx_fact_process ON fact_hiring_process(dim_process_id);
                CREATE INDEX IF NOT EXISTS idx_candidate_fact ON hiring_process_candidate(fact_hiring_process_id);
                "#,
            )?;
            Ok(())
        })
        .await
    }

    pub async fn insert_vacancy(&self, vacancy: NewVacancy) -> StorageResult<i64> {
        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO dim_vacancy (title, num_positions, status, opening_date, closing_date)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    vacancy.title,
                    i64::from(vacancy.num_positions),
                    vacancy.status.as_str(),
                    format_date(vacancy.opening_date),
                    vacancy.closing_date.map(format_date),
                ],
            )?;
            Ok(connection.last_insert_rowid())
        })
        .await
    }

    pub async fn insert_process(&self, process: NewProcess) -> StorageResult<i64> {
        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO dim_process (title, description, initial_date, finish_date)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    process.title,
                    process.description,
                    format_date(process.initial_date),
                    process.finish_date.map(format_date),
                ],
            )?;
            Ok(connection.last_insert_rowid())
        })
        .await
    }

    pub async fn insert_fact(&self, fact: NewFact) -> StorageResult<i64> {
        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO fact_hiring_process (
                    dim_vacancy_id, dim_process_id, met_sla, opened_on, closed_on
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    fact.vacancy_id,
                    fact.process_id,
                    fact.met_sla,
                    format_date(fact.opened_on),
                    fact.closed_on.map(format_date),
                ],
            )?;
            Ok(connection.last_insert_rowid())
        })
        .await
    }

    pub async fn insert_candidate(&self, candidate: NewCandidate) -> StorageResult<i64> {
        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO hiring_process_candidate (
                    fact_hiring_process_id, name, email, status, applied_on, updated_on
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    candidate.fact_id,
                    candidate.name,
                    candidate.email,
                    candidate.status.as_str(),
                    format_date(candidate.applied_on),
                    format_date(candidate.updated_on),
                ],
            )?;
            Ok(connection.last_insert_rowid())
        })
        .await
    }
}

#[async_trait]
impl FactRepository for SqliteFactStore {
    async fn fetch(&self, query: &MetricsQuery) -> StorageResult<Vec<HiringProcessFact>> {
        let mut params_vec = Vec::new();
        let where_clause = build_fact_where_clause(query.predicates(), &mut params_vec);
        let sql = format!("{FACT_SELECT} {where_clause} ORDER BY f.id ASC");
        debug!(predicates = query.predicates().len(), "querying hiring process facts");

        self.with_connection(move |connection| {
            let mut stmt = connection.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(params_vec.iter()))?;
            let mut facts = Vec::new();

            while let Some(row) = rows.next()? {
                facts.push(fact_from_row(row)?);
            }

            for fact in &mut facts {
                fact.candidates = load_candidates(connection, fact.id)?;
            }

            Ok(facts)
        })
        .await
    }
}

fn open_connection(path: &Path, busy_timeout: Duration) -> StorageResult<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let connection = Connection::open(path)?;
    connection.busy_timeout(busy_timeout)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

fn build_fact_where_clause(predicates: &[Predicate], params_vec: &mut Vec<String>) -> String {
    let mut conditions = Vec::new();

    for predicate in predicates {
        match predicate {
            Predicate::ProcessTitleContains(needle) => {
                conditions.push("instr(p.title, ?) > 0");
                params_vec.push(needle.clone());
            }
            Predicate::VacancyTitleContains(needle) => {
                conditions.push("instr(v.title, ?) > 0");
                params_vec.push(needle.clone());
            }
            Predicate::VacancyClosingOnOrAfter(date) => {
                conditions.push("v.closing_date >= ?");
                params_vec.push(format_date(*date));
            }
            Predicate::VacancyClosingOnOrBefore(date) => {
                conditions.push("v.closing_date <= ?");
                params_vec.push(format_date(*date));
            }
        }
    }

    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

fn fact_from_row(row: &Row<'_>) -> StorageResult<HiringProcessFact> {
    let id: i64 = row.get(0)?;

    let vacancy = match row.get::<_, Option<i64>>(4)? {
        Some(vacancy_id) => {
            let status_raw: String = row.get(7)?;
            let status = VacancyStatus::from_db(&status_raw).ok_or_else(|| {
                RepositoryError::InvalidData(format!("unknown vacancy status: {status_raw}"))
            })?;
            let num_positions = u32::try_from(row.get::<_, i64>(6)?).map_err(|_| {
                RepositoryError::InvalidData(format!(
                    "vacancy {vacancy_id} has an invalid number of positions"
                ))
            })?;

            Some(DimVacancy {
                id: vacancy_id,
                title: row.get(5)?,
                num_positions,
                status,
                opening_date: parse_date(row.get(8)?)?,
                closing_date: parse_optional_date(row.get(9)?)?,
            })
        }
        None => None,
    };

    let process = match row.get::<_, Option<i64>>(10)? {
        Some(process_id) => Some(DimProcess {
            id: process_id,
            title: row.get(11)?,
            description: row.get(12)?,
            initial_date: parse_date(row.get(13)?)?,
            finish_date: parse_optional_date(row.get(14)?)?,
        }),
        None => None,
    };

    Ok(HiringProcessFact {
        id,
        met_sla: row.get(1)?,
        opened_on: parse_date(row.get(2)?)?,
        closed_on: parse_optional_date(row.get(3)?)?,
        vacancy,
        process,
        candidates: Vec::new(),
    })
}

fn load_candidates(
    connection: &Connection,
    fact_id: i64,
) -> StorageResult<Vec<HiringProcessCandidate>> {
    let mut stmt = connection.prepare(
        r#"
        SELECT id, name, email, status, applied_on, updated_on
        FROM hiring_process_candidate
        WHERE fact_hiring_process_id = ?1
        ORDER BY id ASC
        "#,
    )?;
    let mut rows = stmt.query(params![fact_id])?;
    let mut candidates = Vec::new();

    while let Some(row) = rows.next()? {
        let status_raw: String = row.get(3)?;
        let status = CandidateStatus::from_db(&status_raw).ok_or_else(|| {
            RepositoryError::InvalidData(format!("unknown candidate status: {status_raw}"))
        })?;

        candidates.push(HiringProcessCandidate {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            status,
            applied_on: parse_date(row.get(4)?)?,
            updated_on: parse_date(row.get(5)?)?,
        });
    }

    Ok(candidates)
}

fn format_date(date: NaiveDate) -> String {
    date.format(FILTER_DATE_FORMAT).to_string()
}

fn parse_date(raw: String) -> StorageResult<NaiveDate> {
    NaiveDate::parse_from_str(&raw, FILTER_DATE_FORMAT)
        .map_err(|err| RepositoryError::InvalidData(format!("invalid stored date '{raw}': {err}")))
}

fn parse_optional_date(raw: Option<String>) -> StorageResult<Option<NaiveDate>> {
    raw.map(parse_date).transpose()
}
