//! Pure aggregations over an already-fetched set of hiring-process facts.
//!
//! Each derivation fails on its own; the service decides how to combine
//! failures.

mod cards;
mod hiring_time;
mod vacancy_status;

pub use cards::{compute_card_info, CardInfos};
pub use hiring_time::{generate_average_hiring_time, AverageHiringTimePerMonth, MonthlyHiringTime};
pub use vacancy_status::{classify_vacancy, generate_vacancy_status_summary, VacancyStatusSummary};

use chrono::NaiveDate;

use super::domain::HiringProcessFact;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingError {
    #[error("hiring process {fact_id} has no associated vacancy")]
    MissingVacancy { fact_id: i64 },

    #[error("hiring process {fact_id} has no associated process definition")]
    MissingProcess { fact_id: i64 },

    #[error("hiring process {fact_id} closed on {closed_on}, before it opened on {opened_on}")]
    InvalidTimeline {
        fact_id: i64,
        opened_on: NaiveDate,
        closed_on: NaiveDate,
    },
}

/// Days between opening and closing a process, `None` while it is still open.
pub(crate) fn hiring_days(fact: &HiringProcessFact) -> Result<Option<i64>, ProcessingError> {
    let Some(closed_on) = fact.closed_on else {
        return Ok(None);
    };

    if closed_on < fact.opened_on {
        return Err(ProcessingError::InvalidTimeline {
            fact_id: fact.id,
            opened_on: fact.opened_on,
            closed_on,
        });
    }

    Ok(Some((closed_on - fact.opened_on).num_days()))
}
