//! Hiring-process metrics for the recruitment dashboard.
//!
//! Facts are read from the `fact_hiring_process` star schema, narrowed by a
//! [`metrics::GetMetricsFilter`] and aggregated into the payload served by
//! [`metrics::metrics_router`].

pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;
