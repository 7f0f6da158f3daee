// HTTP request handlers
use crate::domain::alert::{Alert, AlertSeverity};
use crate::domain::station::{find_station, station_profiles, AltitudeBand, StationProfile};
use crate::domain::units::{self, VisibilityRisk, WindCategory};
use crate::domain::weather::{
    CurrentObservation, ForecastPoint, PeriodSummary, RadarInfo, SkiingWindow, WebcamItem,
};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the static station table
pub async fn list_stations() -> Json<Vec<StationProfile>> {
    Json(station_profiles().to_vec())
}

#[derive(Serialize)]
pub struct StationView {
    #[serde(flatten)]
    pub profile: StationProfile,
    pub top_ft: f64,
    pub base_ft: f64,
}

/// One station's profile, with summit and base altitude in feet for
/// imperial displays
pub async fn station_detail(Path(slug): Path<String>) -> impl IntoResponse {
    match find_station(&slug) {
        Some(profile) => Json(StationView {
            top_ft: units::meters_to_feet(f64::from(profile.altitudes.for_band(AltitudeBand::Top))),
            base_ft: units::meters_to_feet(f64::from(
                profile.altitudes.for_band(AltitudeBand::Base),
            )),
            profile: profile.clone(),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Load a station into the view; the whole raw state is replaced on
/// success, and a failed load reports the store's error message
pub async fn view_station(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.weather.load_station(&slug).await {
        Ok(()) => dashboard_response(&state).await.into_response(),
        Err(e) => {
            tracing::error!("load_station({}) failed: {}", slug, e);
            let message = state
                .weather
                .error()
                .await
                .unwrap_or_else(|| e.to_string());
            (StatusCode::BAD_GATEWAY, message).into_response()
        }
    }
}

/// Switch the altitude band all derived views read from
pub async fn select_band(
    Path(band): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match band.parse::<AltitudeBand>() {
        Ok(band) => {
            state.weather.select_band(band).await;
            dashboard_response(&state).await.into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

pub async fn refresh_now(State(state): State<Arc<AppState>>) -> StatusCode {
    state.weather.refresh_now().await;
    StatusCode::NO_CONTENT
}

pub async fn refresh_forecast(State(state): State<Arc<AppState>>) -> StatusCode {
    state.weather.refresh_forecast().await;
    StatusCode::NO_CONTENT
}

pub async fn reset_view(State(state): State<Arc<AppState>>) -> StatusCode {
    state.weather.reset().await;
    StatusCode::NO_CONTENT
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    dashboard_response(&state).await
}

#[derive(Serialize)]
pub struct ViewStatus {
    pub band: AltitudeBand,
    pub has_data: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub station: Option<StationProfile>,
    pub radar: Option<RadarInfo>,
}

pub async fn view_status(State(state): State<Arc<AppState>>) -> Json<ViewStatus> {
    Json(ViewStatus {
        band: state.weather.selected_band().await,
        has_data: state.weather.has_data().await,
        loading: state.weather.is_loading().await,
        error: state.weather.error().await,
        station: state.weather.station().await,
        radar: state.weather.radar().await,
    })
}

/// Band-adjusted current observation, None until a station is loaded
pub async fn current_conditions(
    State(state): State<Arc<AppState>>,
) -> Json<Option<CurrentObservation>> {
    Json(state.weather.current_for_band().await)
}

pub async fn forecast_points(State(state): State<Arc<AppState>>) -> Json<Vec<ForecastPoint>> {
    Json(state.weather.forecast_points_for_band().await)
}

pub async fn period_summaries(State(state): State<Arc<AppState>>) -> Json<Vec<PeriodSummary>> {
    Json(state.weather.summaries(Utc::now()).await)
}

pub async fn best_window(State(state): State<Arc<AppState>>) -> Json<Option<SkiingWindow>> {
    Json(state.weather.best_window().await)
}

pub async fn active_webcams(State(state): State<Arc<AppState>>) -> Json<Vec<WebcamItem>> {
    Json(state.weather.active_webcams().await)
}

#[derive(Deserialize)]
pub struct AlertQuery {
    pub severity: Option<AlertSeverity>,
    pub category: Option<String>,
}

/// Active (non-dismissed) alerts, optionally narrowed by severity and
/// category
pub async fn list_alerts(
    Query(query): Query<AlertQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<Alert>> {
    let alerts = match (query.severity, query.category) {
        (Some(severity), None) => state.alerts.alerts_of_severity(severity).await,
        (None, Some(category)) => state.alerts.alerts_in_category(&category).await,
        (Some(severity), Some(category)) => state
            .alerts
            .alerts_of_severity(severity)
            .await
            .into_iter()
            .filter(|a| a.category == category)
            .collect(),
        (None, None) => state.alerts.active_alerts().await,
    };
    Json(alerts)
}

pub async fn dismiss_alert(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    state.alerts.dismiss_alert(&id).await;
    StatusCode::NO_CONTENT
}

pub async fn restore_alerts(State(state): State<Arc<AppState>>) -> StatusCode {
    state.alerts.restore_alerts().await;
    StatusCode::NO_CONTENT
}

/// Display-ready readout of the band-adjusted observation
#[derive(Debug, Serialize)]
pub struct ConditionsView {
    pub temp: String,
    pub temp_f: f64,
    pub wind: String,
    pub wind_ms: f64,
    pub wind_mph: f64,
    pub wind_category: WindCategory,
    pub visibility_risk: VisibilityRisk,
    pub snow_base: String,
    pub snow_top: String,
    pub new_snow_in: Option<f64>,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub snapshot: crate::application::weather_store::DashboardSnapshot,
    pub conditions: Option<ConditionsView>,
}

async fn dashboard_response(state: &Arc<AppState>) -> Json<DashboardResponse> {
    let snapshot = state.weather.snapshot(Utc::now()).await;
    let conditions = snapshot.current.as_ref().map(conditions_view);
    Json(DashboardResponse { snapshot, conditions })
}

fn conditions_view(observation: &CurrentObservation) -> ConditionsView {
    ConditionsView {
        temp: units::format_temp(observation.temp_c),
        temp_f: units::celsius_to_fahrenheit(observation.temp_c),
        wind: units::format_wind(observation.wind_kmh),
        wind_ms: units::kmh_to_ms(observation.wind_kmh),
        wind_mph: units::kmh_to_mph(observation.wind_kmh),
        wind_category: units::wind_category(observation.wind_kmh),
        visibility_risk: units::visibility_risk(observation.visibility_m),
        snow_base: units::format_depth(observation.snow_base_cm),
        snow_top: units::format_depth(observation.snow_top_cm),
        new_snow_in: observation.new_snow_24h_cm.map(units::cm_to_in),
    }
}
