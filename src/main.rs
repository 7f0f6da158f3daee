// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::alerts_store::{default_alerts, AlertsStore};
use crate::application::key_value_store::KeyValueStore;
use crate::application::weather_store::WeatherStore;
use crate::infrastructure::config::load_weather_config;
use crate::infrastructure::http_data_source::HttpDataSource;
use crate::infrastructure::json_file_store::JsonFileStore;
use crate::infrastructure::memory_store::MemoryStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    active_webcams, best_window, current_conditions, dashboard, dismiss_alert, forecast_points,
    health_check, list_alerts, list_stations, period_summaries, refresh_forecast, refresh_now,
    reset_view, restore_alerts, select_band, station_detail, view_station, view_status,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let weather_config = load_weather_config()?;

    // Create collaborators (infrastructure layer)
    let data_source = Arc::new(HttpDataSource::new(weather_config.data.base_url.clone()));

    // An empty storage path means dismissals only last for this session
    let storage: Arc<dyn KeyValueStore> = if weather_config.storage.path.is_empty() {
        Arc::new(MemoryStore::default())
    } else {
        Arc::new(JsonFileStore::new(&weather_config.storage.path))
    };

    // Create stores (application layer)
    let weather_store = WeatherStore::new(data_source, weather_config.data.forecast_hours);
    let alerts_store = AlertsStore::new(default_alerts(), storage);

    // Create application state
    let state = Arc::new(AppState {
        weather: weather_store,
        alerts: alerts_store,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/stations", get(list_stations))
        .route("/stations/:slug", get(station_detail))
        .route("/view/station/:slug", put(view_station))
        .route("/view/band/:band", put(select_band))
        .route("/view/refresh/now", post(refresh_now))
        .route("/view/refresh/forecast", post(refresh_forecast))
        .route("/view", delete(reset_view))
        .route("/view/dashboard", get(dashboard))
        .route("/view/status", get(view_status))
        .route("/view/current", get(current_conditions))
        .route("/view/points", get(forecast_points))
        .route("/view/summaries", get(period_summaries))
        .route("/view/window", get(best_window))
        .route("/view/webcams", get(active_webcams))
        .route("/alerts", get(list_alerts))
        .route("/alerts/:id/dismiss", post(dismiss_alert))
        .route("/alerts/restore", post(restore_alerts))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    println!("Starting piste-weather service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
