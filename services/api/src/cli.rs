use crate::report::{run_metrics_report, MetricsReportArgs};
use crate::seed::{run_seed, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiring_metrics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring Metrics",
    about = "Serve and inspect recruitment dashboard metrics from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute dashboard metrics against the configured database
    Metrics {
        #[command(subcommand)]
        command: MetricsCommand,
    },
    /// Load a demo dataset into the configured database
    Seed(SeedArgs),
}

#[derive(Subcommand, Debug)]
enum MetricsCommand {
    /// Print the metrics payload for an optional filter
    Report(MetricsReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Metrics {
            command: MetricsCommand::Report(args),
        } => run_metrics_report(args).await,
        Command::Seed(args) => run_seed(args).await,
    }
}
