use serde::{Deserialize, Serialize};

use super::ProcessingError;
use crate::metrics::domain::{DimVacancy, HiringProcessFact, VacancyStatus};

/// Number of hiring processes per vacancy status bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyStatusSummary {
    pub open: u64,
    pub analyzing: u64,
    pub closed: u64,
}

impl VacancyStatusSummary {
    pub fn count(&self, status: VacancyStatus) -> u64 {
        match status {
            VacancyStatus::Open => self.open,
            VacancyStatus::Analyzing => self.analyzing,
            VacancyStatus::Closed => self.closed,
        }
    }

    pub fn total(&self) -> u64 {
        VacancyStatus::ordered()
            .into_iter()
            .map(|status| self.count(status))
            .sum()
    }

    fn record(&mut self, status: VacancyStatus) {
        match status {
            VacancyStatus::Open => self.open += 1,
            VacancyStatus::Analyzing => self.analyzing += 1,
            VacancyStatus::Closed => self.closed += 1,
        }
    }
}

/// Bucket for a vacancy as seen from one hiring process. An `open` vacancy
/// whose closing date precedes the process closing date counts as closed.
pub fn classify_vacancy(fact: &HiringProcessFact, vacancy: &DimVacancy) -> VacancyStatus {
    match (vacancy.status, vacancy.closing_date, fact.closed_on) {
        (VacancyStatus::Open, Some(closing_date), Some(closed_on)) if closing_date < closed_on => {
            VacancyStatus::Closed
        }
        (status, _, _) => status,
    }
}

pub fn generate_vacancy_status_summary(
    facts: &[HiringProcessFact],
) -> Result<VacancyStatusSummary, ProcessingError> {
    let mut summary = VacancyStatusSummary::default();

    for fact in facts {
        let vacancy = fact
            .vacancy
            .as_ref()
            .ok_or(ProcessingError::MissingVacancy { fact_id: fact.id })?;
        summary.record(classify_vacancy(fact, vacancy));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::processing::fixtures::{date, fact, vacancy};

    #[test]
    fn rows_are_counted_per_status() {
        let rows = vec![
            fact(1, date(2024, 1, 1), None, vacancy(VacancyStatus::Open, None)),
            fact(2, date(2024, 1, 1), None, vacancy(VacancyStatus::Open, None)),
            fact(3, date(2024, 1, 1), None, vacancy(VacancyStatus::Analyzing, None)),
            fact(
                4,
                date(2024, 1, 1),
                Some(date(2024, 2, 1)),
                vacancy(VacancyStatus::Closed, Some(date(2024, 2, 1))),
            ),
        ];

        let summary = generate_vacancy_status_summary(&rows).expect("summary built");
        assert_eq!(summary.open, 2);
        assert_eq!(summary.analyzing, 1);
        assert_eq!(summary.closed, 1);
        assert_eq!(summary.total(), rows.len() as u64);
    }

    #[test]
    fn open_vacancy_past_its_closing_date_counts_as_closed() {
        let row = fact(
            1,
            date(2024, 1, 1),
            Some(date(2024, 3, 20)),
            vacancy(VacancyStatus::Open, Some(date(2024, 3, 15))),
        );
        let stored = row.vacancy.clone().expect("vacancy present");
        assert_eq!(classify_vacancy(&row, &stored), VacancyStatus::Closed);

        let on_time = fact(
            2,
            date(2024, 1, 1),
            Some(date(2024, 3, 15)),
            vacancy(VacancyStatus::Open, Some(date(2024, 3, 15))),
        );
        let stored = on_time.vacancy.clone().expect("vacancy present");
        assert_eq!(classify_vacancy(&on_time, &stored), VacancyStatus::Open);
    }

    #[test]
    fn missing_vacancy_is_reported() {
        let mut row = fact(9, date(2024, 1, 1), None, vacancy(VacancyStatus::Open, None));
        row.vacancy = None;

        let err = generate_vacancy_status_summary(&[row]).expect_err("missing vacancy rejected");
        assert_eq!(err, ProcessingError::MissingVacancy { fact_id: 9 });
    }
}
