//! CycleScope: descriptive analytics and cluster exploration for
//! bike-sharing rental data
//!
//! The library runs one pure analysis pass over two pre-cleaned tables
//! (daily and hourly rentals): filter by date range, aggregate rental sums,
//! standardize a user-selected feature pair, sweep an elbow curve, and fit a
//! final K-Means partition. The binary wraps this in a CLI and renders the
//! results as charts.

pub mod aggregate;
pub mod cli;
pub mod data;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod viz;

// Re-export public items for easier access
pub use aggregate::{CategorySum, HourSum, RentalTotals};
pub use cli::Args;
pub use data::{DailyRecord, DateRange, HourlyRecord, RentalTables};
pub use error::PipelineError;
pub use features::{Feature, FeaturePair, StandardScaler};
pub use model::{elbow_sweep, fit_kmeans, ElbowPoint, KMeansModel};
pub use pipeline::{run_pipeline, DashboardData, PipelineOptions};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
