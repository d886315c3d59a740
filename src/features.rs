//! Clustering feature selection and standardization

use clap::ValueEnum;
use ndarray::{Array1, Array2, Axis};

use crate::data::DailyRecord;
use crate::error::PipelineError;

/// The fixed set of daily columns available for cluster exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Feature {
    Registered,
    Casual,
    Temperature,
    Humidity,
    WindSpeed,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Registered => "registered riders",
            Feature::Casual => "casual riders",
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::WindSpeed => "wind speed",
        }
    }

    pub fn value(&self, record: &DailyRecord) -> f64 {
        match self {
            Feature::Registered => record.registered as f64,
            Feature::Casual => record.casual as f64,
            Feature::Temperature => record.temperature,
            Feature::Humidity => record.humidity,
            Feature::WindSpeed => record.wind_speed,
        }
    }
}

/// The x/y column selection for the cluster exploration.
///
/// Selecting the same feature twice is allowed; the clustering then
/// degenerates to a single dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturePair {
    pub x: Feature,
    pub y: Feature,
}

/// Extract the selected pair of columns as an `(n, 2)` matrix, row order kept.
pub fn feature_matrix(records: &[DailyRecord], pair: FeaturePair) -> crate::Result<Array2<f64>> {
    let mut data = Vec::with_capacity(records.len() * 2);
    for record in records {
        data.push(pair.x.value(record));
        data.push(pair.y.value(record));
    }
    Ok(Array2::from_shape_vec((records.len(), 2), data)?)
}

/// Per-column zero-mean unit-variance scaler.
///
/// Fitted on the statistics of the set it is given, so the same feature pair
/// scales differently under different date ranges. Uses population variance.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(features: &Array2<f64>) -> Result<Self, PipelineError> {
        if features.nrows() == 0 {
            return Err(PipelineError::insufficient(
                "cannot standardize an empty feature matrix",
            ));
        }

        let means = features
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::insufficient("cannot standardize an empty feature matrix"))?;
        let stds = features.std_axis(Axis(0), 0.0);

        for (column, &std) in stds.iter().enumerate() {
            if std == 0.0 {
                return Err(PipelineError::insufficient(format!(
                    "feature column {column} has zero variance over the filtered range"
                )));
            }
        }

        Ok(StandardScaler { means, stds })
    }

    pub fn transform(&self, features: &Array2<f64>) -> Array2<f64> {
        (features - &self.means) / &self.stds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ndarray::array;

    fn record(registered: i64, casual: i64, temperature: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            total: registered + casual,
            casual,
            registered,
            season: "Semi".to_string(),
            weather: "Cerah".to_string(),
            temperature,
            humidity: 0.5,
            wind_speed: 0.2,
        }
    }

    #[test]
    fn test_feature_matrix_row_order() {
        let records = vec![record(100, 20, 0.3), record(200, 40, 0.6)];
        let pair = FeaturePair {
            x: Feature::Registered,
            y: Feature::Temperature,
        };

        let matrix = feature_matrix(&records, pair).unwrap();
        assert_eq!(matrix.shape(), &[2, 2]);
        assert_eq!(matrix[[0, 0]], 100.0);
        assert_eq!(matrix[[0, 1]], 0.3);
        assert_eq!(matrix[[1, 0]], 200.0);
    }

    #[test]
    fn test_same_feature_twice_is_allowed() {
        let records = vec![record(100, 20, 0.3), record(200, 40, 0.6)];
        let pair = FeaturePair {
            x: Feature::Casual,
            y: Feature::Casual,
        };

        let matrix = feature_matrix(&records, pair).unwrap();
        assert_eq!(matrix[[0, 0]], matrix[[0, 1]]);
    }

    #[test]
    fn test_scaler_zero_mean_unit_variance() {
        let features = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let scaler = StandardScaler::fit(&features).unwrap();
        let scaled = scaler.transform(&features);

        for column in 0..2 {
            let mean = scaled.column(column).mean().unwrap();
            let std = scaled.column(column).std(0.0);
            assert!(mean.abs() < 1e-12, "column {column} mean {mean}");
            assert!((std - 1.0).abs() < 1e-12, "column {column} std {std}");
        }
    }

    #[test]
    fn test_scaler_rejects_empty_input() {
        let features = Array2::<f64>::zeros((0, 2));
        let err = StandardScaler::fit(&features).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData { .. }));
    }

    #[test]
    fn test_scaler_rejects_zero_variance() {
        let features = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let err = StandardScaler::fit(&features).unwrap_err();
        match err {
            PipelineError::InsufficientData { reason } => {
                assert!(reason.contains("zero variance"));
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }
}
