use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::HiringProcessFact;

pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";
const FILTER_DATE_LEN: usize = 10;

/// Dashboard filter as supplied by the caller. Empty strings behave like
/// missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetMetricsFilter {
    pub hiring_process: Option<String>,
    pub vacancy: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl GetMetricsFilter {
    pub fn is_empty(&self) -> bool {
        [
            &self.hiring_process,
            &self.vacancy,
            &self.start_date,
            &self.end_date,
        ]
        .into_iter()
        .all(|field| non_empty(field).is_none())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    StartDate,
    EndDate,
}

impl DateField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StartDate => "StartDate",
            Self::EndDate => "EndDate",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("could not parse `{field}`: failed to parse date '{value}' as YYYY-MM-DD ({source})")]
    InvalidDate {
        field: DateField,
        value: String,
        source: chrono::ParseError,
    },
    #[error("could not parse `{field}`: date '{value}' is not in YYYY-MM-DD layout")]
    NonCanonicalDate { field: DateField, value: String },
}

/// A single narrowing condition on the fact query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    ProcessTitleContains(String),
    VacancyTitleContains(String),
    VacancyClosingOnOrAfter(NaiveDate),
    VacancyClosingOnOrBefore(NaiveDate),
}

impl Predicate {
    /// In-memory evaluation with the same semantics as the SQL rendering:
    /// case-sensitive substring match, and association predicates fail when
    /// the association is missing.
    pub fn matches(&self, fact: &HiringProcessFact) -> bool {
        match self {
            Self::ProcessTitleContains(needle) => fact
                .process
                .as_ref()
                .is_some_and(|process| process.title.contains(needle.as_str())),
            Self::VacancyTitleContains(needle) => fact
                .vacancy
                .as_ref()
                .is_some_and(|vacancy| vacancy.title.contains(needle.as_str())),
            Self::VacancyClosingOnOrAfter(date) => fact
                .vacancy
                .as_ref()
                .and_then(|vacancy| vacancy.closing_date)
                .is_some_and(|closing| closing >= *date),
            Self::VacancyClosingOnOrBefore(date) => fact
                .vacancy
                .as_ref()
                .and_then(|vacancy| vacancy.closing_date)
                .is_some_and(|closing| closing <= *date),
        }
    }
}

/// Query over `fact_hiring_process`. Vacancy, process and candidates are
/// always eager-loaded; predicates are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsQuery {
    predicates: Vec<Predicate>,
}

impl MetricsQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn from_filter(filter: &GetMetricsFilter) -> Result<Self, FilterError> {
        let mut query = Self::all();

        if let Some(name) = non_empty(&filter.hiring_process) {
            query = query.with(Predicate::ProcessTitleContains(name.to_string()));
        }

        if let Some(name) = non_empty(&filter.vacancy) {
            query = query.with(Predicate::VacancyTitleContains(name.to_string()));
        }

        if let Some(raw) = non_empty(&filter.start_date) {
            let date = parse_filter_date(DateField::StartDate, raw)?;
            query = query.with(Predicate::VacancyClosingOnOrAfter(date));
        }

        if let Some(raw) = non_empty(&filter.end_date) {
            let date = parse_filter_date(DateField::EndDate, raw)?;
            query = query.with(Predicate::VacancyClosingOnOrBefore(date));
        }

        Ok(query)
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_unconstrained(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, fact: &HiringProcessFact) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(fact))
    }
}

/// Only the zero-padded `YYYY-MM-DD` layout is accepted. chrono alone would
/// also take unpadded fields, a signed year and surrounding whitespace.
pub fn parse_filter_date(field: DateField, raw: &str) -> Result<NaiveDate, FilterError> {
    let date = NaiveDate::parse_from_str(raw, FILTER_DATE_FORMAT).map_err(|source| {
        FilterError::InvalidDate {
            field,
            value: raw.to_string(),
            source,
        }
    })?;

    if raw.len() != FILTER_DATE_LEN || date.format(FILTER_DATE_FORMAT).to_string() != raw {
        return Err(FilterError::NonCanonicalDate {
            field,
            value: raw.to_string(),
        });
    }

    Ok(date)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
