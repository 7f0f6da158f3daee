// Unit conversions and categorical classifiers
use serde::{Deserialize, Serialize};

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / 3.6
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * 0.621_371
}

pub fn cm_to_in(cm: f64) -> f64 {
    cm / 2.54
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * 3.280_84
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindCategory {
    Calm,
    Moderate,
    Strong,
    Storm,
}

/// Cut-points follow the usual ski-report bands: lifts start to slow
/// around 40 km/h and close around 70 km/h.
pub fn wind_category(kmh: f64) -> WindCategory {
    if kmh < 15.0 {
        WindCategory::Calm
    } else if kmh < 40.0 {
        WindCategory::Moderate
    } else if kmh < 70.0 {
        WindCategory::Strong
    } else {
        WindCategory::Storm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRisk {
    Good,
    Reduced,
    Poor,
}

/// Missing visibility is treated as unrestricted.
pub fn visibility_risk(meters: Option<u32>) -> VisibilityRisk {
    match meters {
        None => VisibilityRisk::Good,
        Some(m) if m >= 2000 => VisibilityRisk::Good,
        Some(m) if m >= 500 => VisibilityRisk::Reduced,
        Some(_) => VisibilityRisk::Poor,
    }
}

pub fn format_temp(celsius: f64) -> String {
    format!("{}°C", celsius.round() as i64)
}

pub fn format_wind(kmh: f64) -> String {
    format!("{} km/h", kmh.round() as i64)
}

pub fn format_depth(cm: Option<f64>) -> String {
    match cm {
        Some(depth) => format!("{} cm", depth.round() as i64),
        None => "n/a".to_string(),
    }
}
