use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{hiring_days, ProcessingError};
use crate::metrics::domain::HiringProcessFact;

pub const MONTH_KEY_FORMAT: &str = "%Y-%m";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyHiringTime {
    pub average_days: f64,
    pub processes: u64,
}

/// Average hiring time keyed by the `YYYY-MM` of the vacancy closing date,
/// ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AverageHiringTimePerMonth(BTreeMap<String, MonthlyHiringTime>);

impl AverageHiringTimePerMonth {
    pub fn get(&self, month: &str) -> Option<&MonthlyHiringTime> {
        self.0.get(month)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MonthlyHiringTime)> {
        self.0.iter().map(|(month, entry)| (month.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Default)]
struct MonthAccumulator {
    total_days: i64,
    processes: u64,
}

/// Rows still open, or whose vacancy has no closing date, do not contribute.
pub fn generate_average_hiring_time(
    facts: &[HiringProcessFact],
) -> Result<AverageHiringTimePerMonth, ProcessingError> {
    let mut buckets: BTreeMap<String, MonthAccumulator> = BTreeMap::new();

    for fact in facts {
        let vacancy = fact
            .vacancy
            .as_ref()
            .ok_or(ProcessingError::MissingVacancy { fact_id: fact.id })?;

        let Some(days) = hiring_days(fact)? else {
            continue;
        };
        let Some(closing_date) = vacancy.closing_date else {
            continue;
        };

        let entry = buckets
            .entry(closing_date.format(MONTH_KEY_FORMAT).to_string())
            .or_default();
        entry.total_days += days;
        entry.processes += 1;
    }

    let months = buckets
        .into_iter()
        .map(|(month, acc)| {
            (
                month,
                MonthlyHiringTime {
                    average_days: acc.total_days as f64 / acc.processes as f64,
                    processes: acc.processes,
                },
            )
        })
        .collect();

    Ok(AverageHiringTimePerMonth(months))
}
