use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyStatus {
    Open,
    Analyzing,
    Closed,
}

impl VacancyStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Open, Self::Analyzing, Self::Closed]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Analyzing => "analyzing",
            Self::Closed => "closed",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "analyzing" => Some(Self::Analyzing),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Applied,
    InAnalysis,
    Hired,
    Rejected,
}

impl CandidateStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::InAnalysis => "in_analysis",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "applied" => Some(Self::Applied),
            "in_analysis" => Some(Self::InAnalysis),
            "hired" => Some(Self::Hired),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Vacancy dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimVacancy {
    pub id: i64,
    pub title: String,
    pub num_positions: u32,
    pub status: VacancyStatus,
    pub opening_date: NaiveDate,
    pub closing_date: Option<NaiveDate>,
}

/// Hiring process definition row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimProcess {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub initial_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringProcessCandidate {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: CandidateStatus,
    pub applied_on: NaiveDate,
    pub updated_on: NaiveDate,
}

/// One hiring process instance with its associations eager-loaded.
///
/// `vacancy` and `process` are `None` when the stored foreign key is empty;
/// the aggregations report such rows instead of skipping them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringProcessFact {
    pub id: i64,
    pub met_sla: bool,
    pub opened_on: NaiveDate,
    pub closed_on: Option<NaiveDate>,
    pub vacancy: Option<DimVacancy>,
    pub process: Option<DimProcess>,
    pub candidates: Vec<HiringProcessCandidate>,
}

impl HiringProcessFact {
    pub fn is_closed(&self) -> bool {
        self.closed_on.is_some()
    }
}
