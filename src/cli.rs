//! Command-line interface definitions and argument parsing

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use crate::data::DateRange;
use crate::features::{Feature, FeaturePair};
use crate::pipeline::PipelineOptions;

/// Bike-sharing rental analytics: filter a date range, aggregate rentals,
/// and explore K-Means clusters over two selected features
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the daily rentals CSV file
    #[arg(long, default_value = "day_cleaned.csv")]
    pub daily: String,

    /// Path to the hourly rentals CSV file
    #[arg(long, default_value = "hour_cleaned.csv")]
    pub hourly: String,

    /// Start of the date range (YYYY-MM-DD); defaults to the first loaded day
    #[arg(long)]
    pub start_date: Option<String>,

    /// End of the date range (YYYY-MM-DD); defaults to the last loaded day
    #[arg(long)]
    pub end_date: Option<String>,

    /// Feature on the X axis of the cluster exploration
    #[arg(long, value_enum, default_value = "registered")]
    pub feature_x: Feature,

    /// Feature on the Y axis of the cluster exploration
    #[arg(long, value_enum, default_value = "casual")]
    pub feature_y: Feature,

    /// Base output path for the generated charts
    #[arg(short, long, default_value = "dashboard.png")]
    pub output: String,

    /// Maximum iterations per K-Means fit
    #[arg(long, default_value = "300")]
    pub max_iters: u64,

    /// Convergence tolerance per K-Means fit
    #[arg(long, default_value = "1e-4")]
    pub tolerance: f64,

    /// Seed for centroid initialization
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the requested range against the loaded span.
    ///
    /// Missing endpoints fall back to the span's bounds; explicit endpoints
    /// are validated, never clamped.
    pub fn date_range(&self, span: DateRange) -> crate::Result<DateRange> {
        let start = match &self.start_date {
            Some(raw) => parse_date(raw)?,
            None => span.start(),
        };
        let end = match &self.end_date {
            Some(raw) => parse_date(raw)?,
            None => span.end(),
        };

        let range = DateRange::new(start, end)?;
        range.check_within(&span)?;
        Ok(range)
    }

    pub fn feature_pair(&self) -> FeaturePair {
        FeaturePair {
            x: self.feature_x,
            y: self.feature_y,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_iters: self.max_iters,
            tolerance: self.tolerance,
            seed: self.seed,
        }
    }
}

fn parse_date(raw: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn args() -> Args {
        Args {
            daily: "day_cleaned.csv".to_string(),
            hourly: "hour_cleaned.csv".to_string(),
            start_date: None,
            end_date: None,
            feature_x: Feature::Registered,
            feature_y: Feature::Casual,
            output: "dashboard.png".to_string(),
            max_iters: 300,
            tolerance: 1e-4,
            seed: 42,
            verbose: false,
        }
    }

    fn span() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2012, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_range_defaults_to_span() {
        let range = args().date_range(span()).unwrap();
        assert_eq!(range, span());
    }

    #[test]
    fn test_explicit_range_parsed() {
        let mut args = args();
        args.start_date = Some("2011-03-01".to_string());
        args.end_date = Some("2011-06-30".to_string());

        let range = args.date_range(span()).unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2011, 3, 1).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2011, 6, 30).unwrap());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut args = args();
        args.start_date = Some("2011-02-01".to_string());
        args.end_date = Some("2011-01-01".to_string());

        let err = args.date_range(span()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_out_of_span_range_rejected() {
        let mut args = args();
        args.end_date = Some("2013-06-01".to_string());

        let err = args.date_range(span()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let mut args = args();
        args.start_date = Some("01/02/2011".to_string());
        assert!(args.date_range(span()).is_err());
    }
}
