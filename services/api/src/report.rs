use crate::infra::{metrics_service, open_store};
use clap::Args;
use hiring_metrics::config::AppConfig;
use hiring_metrics::error::AppError;
use hiring_metrics::metrics::{AverageHiringTimePerMonth, GetMetricsFilter, MetricsData};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct MetricsReportArgs {
    /// Substring of the hiring process title
    #[arg(long)]
    pub(crate) hiring_process: Option<String>,
    /// Substring of the vacancy title
    #[arg(long)]
    pub(crate) vacancy: Option<String>,
    /// Earliest vacancy closing date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) start_date: Option<String>,
    /// Latest vacancy closing date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) end_date: Option<String>,
    /// Print the monthly hiring time table as CSV instead of JSON
    #[arg(long)]
    pub(crate) csv: bool,
    /// Read this database file instead of the configured one
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

impl MetricsReportArgs {
    fn filter(&self) -> GetMetricsFilter {
        GetMetricsFilter {
            hiring_process: self.hiring_process.clone(),
            vacancy: self.vacancy.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HiringTimeRow<'a> {
    month: &'a str,
    average_days: f64,
    processes: u64,
}

pub(crate) async fn run_metrics_report(args: MetricsReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let filter = args.filter();
    let store = open_store(config.database, args.database.clone()).await?;
    let data = metrics_service(store).get_metrics(&filter).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_report(&data, args.csv, &mut out)
}

fn render_report<W: Write>(data: &MetricsData, csv: bool, out: &mut W) -> Result<(), AppError> {
    if csv {
        return write_hiring_time_csv(&data.average_hiring_time, out);
    }
    serde_json::to_writer_pretty(&mut *out, data)?;
    writeln!(out)?;
    Ok(())
}

fn write_hiring_time_csv<W: Write>(
    table: &AverageHiringTimePerMonth,
    out: &mut W,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for (month, entry) in table.iter() {
        writer
            .serialize(HiringTimeRow {
                month,
                average_days: entry.average_days,
                processes: entry.processes,
            })
            .map_err(io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_demo_dataset;
    use hiring_metrics::config::DatabaseConfig;

    async fn seeded_report(filter: GetMetricsFilter) -> MetricsData {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DatabaseConfig {
            path: dir.path().join("report.db"),
            busy_timeout_ms: 1_000,
        };
        let store = open_store(config, None).await.expect("store opens");
        seed_demo_dataset(&store).await.expect("seed loads");
        metrics_service(store)
            .get_metrics(&filter)
            .await
            .expect("metrics computed")
    }

    #[tokio::test]
    async fn csv_lists_one_row_per_month() {
        let data = seeded_report(GetMetricsFilter::default()).await;
        let mut buffer = Vec::new();
        render_report(&data, true, &mut buffer).expect("csv renders");

        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "month,average_days,processes");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2024-03,55"));
        assert!(lines[2].starts_with("2024-04,65"));
    }

    #[tokio::test]
    async fn json_report_uses_dashboard_field_names() {
        let args = MetricsReportArgs {
            vacancy: Some("Platform".to_string()),
            ..MetricsReportArgs::default()
        };
        let data = seeded_report(args.filter()).await;
        let mut buffer = Vec::new();
        render_report(&data, false, &mut buffer).expect("json renders");

        let value: serde_json::Value = serde_json::from_slice(&buffer).expect("json");
        assert_eq!(value["cards"]["totalProcesses"], 1);
        assert!(value["vacancyStatus"].is_object());
        assert!(value["averageHiringTime"].get("2024-04").is_some());
    }
}
