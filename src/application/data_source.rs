// Data source trait for raw weather documents
use crate::domain::station::StationProfile;
use crate::domain::weather::{CurrentObservation, Forecast, RadarInfo, WebcamItem};
use async_trait::async_trait;

/// Supplier of raw weather documents for one station. Every call is
/// independently awaitable; failure is always signaled through the error
/// channel, never as a silent null.
#[async_trait]
pub trait WeatherDataSource: Send + Sync {
    /// Fused current conditions for a station
    async fn get_now(&self, slug: &str) -> anyhow::Result<CurrentObservation>;

    /// Forecast covering the requested horizon in hours
    async fn get_forecast(&self, slug: &str, hours: u32) -> anyhow::Result<Forecast>;

    /// All webcams known for a station, active or not
    async fn get_webcams(&self, slug: &str) -> anyhow::Result<Vec<WebcamItem>>;

    /// Latest radar imagery descriptor
    async fn get_radar(&self, slug: &str) -> anyhow::Result<RadarInfo>;

    /// Static profile for a slug; None for an unknown station (not an error)
    async fn get_station_profile(&self, slug: &str) -> anyhow::Result<Option<StationProfile>>;
}
