//! CSV loading, typed rental records, and date-range filtering

use std::collections::HashSet;

use anyhow::Context;
use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::PipelineError;

const DAILY_TABLE: &str = "daily";
const HOURLY_TABLE: &str = "hourly";

// Column names of the pre-cleaned source files.
const COL_DATE: &str = "tanggal";
const COL_TOTAL: &str = "total_penyewaan_sepeda";
const COL_CASUAL: &str = "penyewa_kasual";
const COL_REGISTERED: &str = "penyewa_terdaftar";
const COL_SEASON: &str = "musim";
const COL_WEATHER: &str = "cuaca";
const COL_TEMPERATURE: &str = "suhu";
const COL_HUMIDITY: &str = "kelembaban";
const COL_WIND_SPEED: &str = "kecepatan_angin";
const COL_HOUR: &str = "jam";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the daily rentals table.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub total: i64,
    pub casual: i64,
    pub registered: i64,
    pub season: String,
    pub weather: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// One row of the hourly rentals table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u32,
    pub total: i64,
}

/// Inclusive calendar date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::InvertedRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Reject this range unless it lies entirely within `bounds`.
    pub fn check_within(&self, bounds: &DateRange) -> Result<(), PipelineError> {
        if self.start < bounds.start || self.end > bounds.end {
            return Err(PipelineError::OutOfBounds {
                start: self.start,
                end: self.end,
                min: bounds.start,
                max: bounds.end,
            });
        }
        Ok(())
    }
}

/// The two loaded source tables, immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct RentalTables {
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
}

impl RentalTables {
    pub fn load(daily_path: &str, hourly_path: &str) -> crate::Result<Self> {
        Ok(RentalTables {
            daily: load_daily(daily_path)?,
            hourly: load_hourly(hourly_path)?,
        })
    }

    /// Min/max span of the daily table, or `None` when it has no rows.
    pub fn date_span(&self) -> Option<DateRange> {
        let start = self.daily.iter().map(|r| r.date).min()?;
        let end = self.daily.iter().map(|r| r.date).max()?;
        Some(DateRange { start, end })
    }
}

/// Load the daily rentals table from a CSV file.
pub fn load_daily(path: &str) -> crate::Result<Vec<DailyRecord>> {
    let df = read_csv(path)?;

    let dates = date_column(&df, DAILY_TABLE, COL_DATE)?;
    let totals = i64_column(&df, DAILY_TABLE, COL_TOTAL)?;
    let casual = i64_column(&df, DAILY_TABLE, COL_CASUAL)?;
    let registered = i64_column(&df, DAILY_TABLE, COL_REGISTERED)?;
    let seasons = str_column(&df, DAILY_TABLE, COL_SEASON)?;
    let weather = str_column(&df, DAILY_TABLE, COL_WEATHER)?;
    let temperature = f64_column(&df, DAILY_TABLE, COL_TEMPERATURE)?;
    let humidity = f64_column(&df, DAILY_TABLE, COL_HUMIDITY)?;
    let wind_speed = f64_column(&df, DAILY_TABLE, COL_WIND_SPEED)?;

    if dates.is_empty() {
        anyhow::bail!("no rows found in daily table {path}");
    }

    // One record per calendar day.
    let mut seen = HashSet::new();
    for date in &dates {
        if !seen.insert(*date) {
            anyhow::bail!("duplicate date {date} in daily table {path}");
        }
    }

    let records = (0..dates.len())
        .map(|i| DailyRecord {
            date: dates[i],
            total: totals[i],
            casual: casual[i],
            registered: registered[i],
            season: seasons[i].clone(),
            weather: weather[i].clone(),
            temperature: temperature[i],
            humidity: humidity[i],
            wind_speed: wind_speed[i],
        })
        .collect();

    Ok(records)
}

/// Load the hourly rentals table from a CSV file.
pub fn load_hourly(path: &str) -> crate::Result<Vec<HourlyRecord>> {
    let df = read_csv(path)?;

    let dates = date_column(&df, HOURLY_TABLE, COL_DATE)?;
    let hours = i64_column(&df, HOURLY_TABLE, COL_HOUR)?;
    let totals = i64_column(&df, HOURLY_TABLE, COL_TOTAL)?;

    if dates.is_empty() {
        anyhow::bail!("no rows found in hourly table {path}");
    }

    let mut records = Vec::with_capacity(dates.len());
    for i in 0..dates.len() {
        if !(0..24).contains(&hours[i]) {
            anyhow::bail!("hour {} out of range in hourly table {path}", hours[i]);
        }
        records.push(HourlyRecord {
            date: dates[i],
            hour: hours[i] as u32,
            total: totals[i],
        });
    }

    Ok(records)
}

/// Daily records whose date falls within the inclusive range, input order kept.
pub fn filter_daily(records: &[DailyRecord], range: &DateRange) -> Vec<DailyRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

/// Hourly records whose date falls within the inclusive range, input order kept.
pub fn filter_hourly(records: &[HourlyRecord], range: &DateRange) -> Vec<HourlyRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

fn read_csv(path: &str) -> crate::Result<DataFrame> {
    let df = CsvReader::from_path(path)
        .with_context(|| format!("cannot open {path}"))?
        .has_header(true)
        .finish()
        .with_context(|| format!("cannot parse {path}"))?;
    Ok(df)
}

fn column<'a>(df: &'a DataFrame, table: &str, name: &str) -> crate::Result<&'a Series> {
    df.column(name)
        .map_err(|_| PipelineError::missing_column(table, name).into())
}

fn i64_column(df: &DataFrame, table: &str, name: &str) -> crate::Result<Vec<i64>> {
    let casted = column(df, table, name)?.cast(&DataType::Int64)?;
    let values: Vec<i64> = casted.i64()?.into_no_null_iter().collect();
    if values.len() != df.height() {
        anyhow::bail!("unexpected nulls in column '{name}' of the {table} table");
    }
    Ok(values)
}

fn f64_column(df: &DataFrame, table: &str, name: &str) -> crate::Result<Vec<f64>> {
    let casted = column(df, table, name)?.cast(&DataType::Float64)?;
    let values: Vec<f64> = casted.f64()?.into_no_null_iter().collect();
    if values.len() != df.height() {
        anyhow::bail!("unexpected nulls in column '{name}' of the {table} table");
    }
    Ok(values)
}

fn str_column(df: &DataFrame, table: &str, name: &str) -> crate::Result<Vec<String>> {
    let casted = column(df, table, name)?.cast(&DataType::String)?;
    let values: Vec<String> = casted
        .str()?
        .into_no_null_iter()
        .map(str::to_string)
        .collect();
    if values.len() != df.height() {
        anyhow::bail!("unexpected nulls in column '{name}' of the {table} table");
    }
    Ok(values)
}

fn date_column(df: &DataFrame, table: &str, name: &str) -> crate::Result<Vec<NaiveDate>> {
    let raw = str_column(df, table, name)?;
    raw.iter()
        .map(|s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .with_context(|| format!("invalid date '{s}' in column '{name}' of the {table} table"))
        })
        .collect()
}
