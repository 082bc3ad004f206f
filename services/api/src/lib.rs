mod cli;
mod infra;
mod report;
mod routes;
mod seed;
mod server;

use hiring_metrics::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
