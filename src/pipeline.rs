//! The full analysis pipeline: filter, aggregate, standardize, cluster

use crate::aggregate::{
    busiest_hours, hourly_totals, quietest_hours, rental_totals, season_totals, weather_totals,
    CategorySum, HourSum, RentalTotals, RANKED_HOURS,
};
use crate::data::{filter_daily, filter_hourly, DailyRecord, DateRange, HourlyRecord, RentalTables};
use crate::error::PipelineError;
use crate::features::{feature_matrix, FeaturePair, StandardScaler};
use crate::model::{elbow_sweep, fit_kmeans, ElbowPoint, KMeansModel, ELBOW_MAX_K, FINAL_CLUSTER_COUNT};

/// Knobs of the K-Means fits. Defaults mirror the dashboard's fixed settings.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub max_iters: u64,
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            max_iters: 300,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

/// Everything the presentation layer consumes, computed in one pass.
#[derive(Debug)]
pub struct DashboardData {
    pub range: DateRange,
    pub features: FeaturePair,
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
    pub totals: RentalTotals,
    pub busiest_hours: Vec<HourSum>,
    pub quietest_hours: Vec<HourSum>,
    pub season_totals: Vec<CategorySum>,
    pub weather_totals: Vec<CategorySum>,
    pub elbow: Vec<ElbowPoint>,
    pub clustering: KMeansModel,
}

/// Run the whole pipeline for one user selection.
///
/// Pure with respect to its inputs: the same tables, range, feature pair and
/// options always produce the same output. The range is validated against the
/// daily span before any computation happens.
pub fn run_pipeline(
    tables: &RentalTables,
    range: DateRange,
    features: FeaturePair,
    options: &PipelineOptions,
) -> crate::Result<DashboardData> {
    let span = tables
        .date_span()
        .ok_or_else(|| PipelineError::insufficient("daily table has no rows"))?;
    range.check_within(&span)?;

    let daily = filter_daily(&tables.daily, &range);
    let hourly = filter_hourly(&tables.hourly, &range);

    if daily.len() < ELBOW_MAX_K {
        return Err(PipelineError::insufficient(format!(
            "{} daily rows in the selected range, need at least {ELBOW_MAX_K} for the cluster sweep",
            daily.len()
        ))
        .into());
    }

    let totals = rental_totals(&daily);
    let by_hour = hourly_totals(&hourly);
    let busiest = busiest_hours(&by_hour, RANKED_HOURS);
    let quietest = quietest_hours(&by_hour, RANKED_HOURS);
    let seasons = season_totals(&daily);
    let weather = weather_totals(&daily);

    // Standardize on the statistics of the filtered set itself: narrowing the
    // range legitimately changes the clustering for the same feature pair.
    let matrix = feature_matrix(&daily, features)?;
    let scaler = StandardScaler::fit(&matrix)?;
    let scaled = scaler.transform(&matrix);

    let elbow = elbow_sweep(&scaled, options.max_iters, options.tolerance, options.seed)?;
    let clustering = fit_kmeans(
        &scaled,
        FINAL_CLUSTER_COUNT,
        options.max_iters,
        options.tolerance,
        options.seed,
    )?;

    Ok(DashboardData {
        range,
        features,
        daily,
        hourly,
        totals,
        busiest_hours: busiest,
        quietest_hours: quietest,
        season_totals: seasons,
        weather_totals: weather,
        elbow,
        clustering,
    })
}
