// Weather store - single source of truth for the station being viewed
use crate::application::data_source::WeatherDataSource;
use crate::application::forecast_mapper;
use crate::domain::station::{display_name_from_slug, AltitudeBand, StationProfile};
use crate::domain::weather::{
    CurrentObservation, Forecast, ForecastPoint, PeriodSummary, RadarInfo, SkiingWindow, WebcamItem,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Consistent view of everything the dashboard needs, taken under a single
/// read lock so no caller can observe a half-replaced station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub station: Option<StationProfile>,
    pub station_label: Option<String>,
    pub band: AltitudeBand,
    pub current: Option<CurrentObservation>,
    pub summaries: Vec<PeriodSummary>,
    pub best_window: Option<SkiingWindow>,
    pub webcams: Vec<WebcamItem>,
    pub radar: Option<RadarInfo>,
    pub has_data: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct ViewState {
    station_slug: Option<String>,
    station: Option<StationProfile>,
    station_label: Option<String>,
    now: Option<CurrentObservation>,
    forecast: Option<Forecast>,
    webcams: Vec<WebcamItem>,
    radar: Option<RadarInfo>,
    band: AltitudeBand,
    loading: bool,
    error: Option<String>,
}

/// Holds the raw fetched data for one station plus the selected altitude
/// band, and derives all read views from that pair on demand. Raw fields
/// are only ever replaced wholesale: `load_station` swaps all four under
/// one write lock, the refreshes swap exactly one.
pub struct WeatherStore {
    data_source: Arc<dyn WeatherDataSource>,
    forecast_hours: u32,
    state: RwLock<ViewState>,
}

impl WeatherStore {
    pub fn new(data_source: Arc<dyn WeatherDataSource>, forecast_hours: u32) -> Self {
        Self {
            data_source,
            forecast_hours,
            state: RwLock::new(ViewState::default()),
        }
    }

    /// Fetch current conditions, forecast, webcams and radar concurrently
    /// and replace the raw state atomically. On any failure nothing is
    /// replaced and the error is recorded for the dashboard to show.
    /// In-flight loads are not cancelled; the last completed load wins.
    pub async fn load_station(&self, slug: &str) -> anyhow::Result<()> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let fetched = futures::try_join!(
            self.data_source.get_now(slug),
            self.data_source.get_forecast(slug, self.forecast_hours),
            self.data_source.get_webcams(slug),
            self.data_source.get_radar(slug),
        );

        match fetched {
            Ok((now, forecast, webcams, radar)) => {
                // A missing profile is not an error, the label falls back
                // to a prettified slug
                let station = match self.data_source.get_station_profile(slug).await {
                    Ok(profile) => profile,
                    Err(e) => {
                        tracing::warn!("station profile lookup failed for {}: {}", slug, e);
                        None
                    }
                };
                let label = station
                    .as_ref()
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| display_name_from_slug(slug));

                let mut state = self.state.write().await;
                state.station_slug = Some(slug.to_string());
                state.station = station;
                state.station_label = Some(label);
                state.now = Some(now);
                state.forecast = Some(forecast);
                state.webcams = webcams;
                state.radar = Some(radar);
                state.loading = false;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.loading = false;
                state.error = Some(format!("failed to load weather for {}: {}", slug, e));
                Err(e)
            }
        }
    }

    /// Re-fetch only the current observation. A failure is logged and the
    /// previous reading stays on screen; background refresh never turns
    /// already-rendered data into an error state.
    pub async fn refresh_now(&self) {
        let Some(slug) = self.current_slug().await else {
            return;
        };
        match self.data_source.get_now(&slug).await {
            Ok(now) => self.state.write().await.now = Some(now),
            Err(e) => tracing::warn!("current conditions refresh failed for {}: {}", slug, e),
        }
    }

    /// Re-fetch only the forecast, with the same stale-over-error policy
    /// as `refresh_now`.
    pub async fn refresh_forecast(&self) {
        let Some(slug) = self.current_slug().await else {
            return;
        };
        match self.data_source.get_forecast(&slug, self.forecast_hours).await {
            Ok(forecast) => self.state.write().await.forecast = Some(forecast),
            Err(e) => tracing::warn!("forecast refresh failed for {}: {}", slug, e),
        }
    }

    /// Switch the altitude band every derived view reads from. No I/O.
    pub async fn select_band(&self, band: AltitudeBand) {
        tracing::debug!("band selected: {}", band.as_str());
        self.state.write().await.band = band;
    }

    /// Drop all raw data and go back to the initial mid-band state.
    pub async fn reset(&self) {
        *self.state.write().await = ViewState::default();
    }

    pub async fn selected_band(&self) -> AltitudeBand {
        self.state.read().await.band
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn has_data(&self) -> bool {
        let state = self.state.read().await;
        state.now.is_some() || state.forecast.is_some()
    }

    pub async fn station(&self) -> Option<StationProfile> {
        self.state.read().await.station.clone()
    }

    pub async fn radar(&self) -> Option<RadarInfo> {
        self.state.read().await.radar.clone()
    }

    /// Current observation adjusted to the selected band
    pub async fn current_for_band(&self) -> Option<CurrentObservation> {
        let state = self.state.read().await;
        state
            .now
            .as_ref()
            .map(|now| forecast_mapper::adjust_observation(now, state.band))
    }

    /// Forecast points for the selected band, in original order
    pub async fn forecast_points_for_band(&self) -> Vec<ForecastPoint> {
        let state = self.state.read().await;
        state
            .forecast
            .as_ref()
            .map(|f| forecast_mapper::filter_by_band(f, state.band))
            .unwrap_or_default()
    }

    /// Today/tomorrow/weekend summaries for the selected band; empty when
    /// no forecast is loaded
    pub async fn summaries(&self, now: DateTime<Utc>) -> Vec<PeriodSummary> {
        let state = self.state.read().await;
        state
            .forecast
            .as_ref()
            .map(|f| forecast_mapper::generate_summaries(f, state.band, now))
            .unwrap_or_default()
    }

    pub async fn best_window(&self) -> Option<SkiingWindow> {
        let state = self.state.read().await;
        state
            .forecast
            .as_ref()
            .and_then(|f| forecast_mapper::find_best_skiing_window(f, state.band))
    }

    /// Webcams flagged active whose band tag is absent or matches the
    /// selected band
    pub async fn active_webcams(&self) -> Vec<WebcamItem> {
        let state = self.state.read().await;
        filter_webcams(&state.webcams, state.band)
    }

    pub async fn snapshot(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        let state = self.state.read().await;
        DashboardSnapshot {
            station: state.station.clone(),
            station_label: state.station_label.clone(),
            band: state.band,
            current: state
                .now
                .as_ref()
                .map(|n| forecast_mapper::adjust_observation(n, state.band)),
            summaries: state
                .forecast
                .as_ref()
                .map(|f| forecast_mapper::generate_summaries(f, state.band, now))
                .unwrap_or_default(),
            best_window: state
                .forecast
                .as_ref()
                .and_then(|f| forecast_mapper::find_best_skiing_window(f, state.band)),
            webcams: filter_webcams(&state.webcams, state.band),
            radar: state.radar.clone(),
            has_data: state.now.is_some() || state.forecast.is_some(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    async fn current_slug(&self) -> Option<String> {
        self.state.read().await.station_slug.clone()
    }
}

fn filter_webcams(webcams: &[WebcamItem], band: AltitudeBand) -> Vec<WebcamItem> {
    webcams
        .iter()
        .filter(|w| w.active && w.band.map_or(true, |b| b == band))
        .cloned()
        .collect()
}
