// Weather data domain models
use super::station::AltitudeBand;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categorical sky/precipitation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Clear,
    Cloudy,
    Snow,
    Rain,
    Mix,
    Fog,
}

/// A contributing upstream source and its weight in the fused reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceWeight {
    pub name: String,
    pub weight: f64,
}

/// One fused reading for a station at a point in time. Replaced wholesale
/// on refresh, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentObservation {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    pub wind_kmh: f64,
    pub gust_kmh: f64,
    pub visibility_m: Option<u32>,
    pub snow_base_cm: Option<f64>,
    pub snow_top_cm: Option<f64>,
    pub new_snow_24h_cm: Option<f64>,
    pub iso_zero_m: Option<i32>,
    pub condition: Condition,
    pub confidence: f64,
    pub sources: Vec<SourceWeight>,
}

/// One (time, altitude band) forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub band: AltitudeBand,
    pub temp_c: f64,
    pub wind_kmh: f64,
    pub gust_kmh: f64,
    pub snow_cm: f64,
    pub rain_mm: f64,
    pub iso_zero_m: Option<i32>,
    pub cloud_pct: Option<f64>,
    pub visibility_m: Option<u32>,
    pub confidence: f64,
}

/// Forecast horizon for one station. Points are not required to be
/// uniformly spaced or sorted; consumers aggregate by filtering, never by
/// positional indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub station: String,
    pub generated_at: DateTime<Utc>,
    pub horizon_hours: u32,
    pub points: Vec<ForecastPoint>,
    pub snow_24h_cm: f64,
    pub snow_72h_cm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebcamItem {
    pub id: String,
    pub name: String,
    pub url: String,
    pub active: bool,
    pub band: Option<AltitudeBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarInfo {
    pub image_url: String,
    pub attribution: Option<String>,
    pub refreshed_at: DateTime<Utc>,
}

/// Named calendar period a summary aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Tomorrow,
    Weekend,
}

/// Aggregate over the forecast points falling inside one period, for one
/// band. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub snow_accum_cm: i64,
    pub wind_max_kmh: f64,
    pub condition: Condition,
    pub confidence: f64,
}

/// A 3-sample slice of one band's forecast, ranked by desirability.
/// Score is scaled to 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkiingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: i64,
}
