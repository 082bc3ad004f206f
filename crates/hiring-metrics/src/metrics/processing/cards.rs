use serde::{Deserialize, Serialize};

use super::{hiring_days, ProcessingError};
use crate::metrics::domain::{CandidateStatus, HiringProcessFact};

/// Headline numbers shown on the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfos {
    pub total_processes: u64,
    pub open_processes: u64,
    pub closed_processes: u64,
    pub total_candidates: u64,
    pub hired_candidates: u64,
    /// Share of closed processes that met their SLA, in `0.0..=1.0`.
    pub sla_compliance: Option<f64>,
    pub average_hiring_time_days: Option<f64>,
}

pub fn compute_card_info(facts: &[HiringProcessFact]) -> Result<CardInfos, ProcessingError> {
    let mut cards = CardInfos::default();
    let mut met_sla = 0_u64;
    let mut total_days = 0_i64;

    for fact in facts {
        if fact.process.is_none() {
            return Err(ProcessingError::MissingProcess { fact_id: fact.id });
        }

        cards.total_processes += 1;
        cards.total_candidates += fact.candidates.len() as u64;
        cards.hired_candidates += fact
            .candidates
            .iter()
            .filter(|candidate| candidate.status == CandidateStatus::Hired)
            .count() as u64;

        match hiring_days(fact)? {
            Some(days) => {
                cards.closed_processes += 1;
                total_days += days;
                if fact.met_sla {
                    met_sla += 1;
                }
            }
            None => cards.open_processes += 1,
        }
    }

    if cards.closed_processes > 0 {
        let closed = cards.closed_processes as f64;
        cards.sla_compliance = Some(met_sla as f64 / closed);
        cards.average_hiring_time_days = Some(total_days as f64 / closed);
    }

    Ok(cards)
}
