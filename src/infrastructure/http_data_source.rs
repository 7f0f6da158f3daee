// HTTP data source implementation over static mock weather documents
use crate::application::data_source::WeatherDataSource;
use crate::domain::station::{self, StationProfile};
use crate::domain::weather::{CurrentObservation, Forecast, RadarInfo, WebcamItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Fetches per-station JSON documents from a data host laid out as
/// `{base}/mock/{slug}/{document}.json`. Station profiles are not fetched,
/// they resolve from the static table.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDataSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn document_url(&self, slug: &str, document: &str) -> String {
        let encoded_slug = urlencoding::encode(slug);
        format!("{}/mock/{}/{}.json", self.base_url, encoded_slug, document)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to weather data host")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Weather document request failed with status {}: {}", status, url);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse weather document {}", url))
    }
}

#[async_trait]
impl WeatherDataSource for HttpDataSource {
    async fn get_now(&self, slug: &str) -> Result<CurrentObservation> {
        self.fetch_json(&self.document_url(slug, "now")).await
    }

    async fn get_forecast(&self, slug: &str, hours: u32) -> Result<Forecast> {
        let url = format!("{}?hours={}", self.document_url(slug, "forecast"), hours);
        self.fetch_json(&url).await
    }

    async fn get_webcams(&self, slug: &str) -> Result<Vec<WebcamItem>> {
        self.fetch_json(&self.document_url(slug, "webcams")).await
    }

    async fn get_radar(&self, slug: &str) -> Result<RadarInfo> {
        self.fetch_json(&self.document_url(slug, "radar")).await
    }

    async fn get_station_profile(&self, slug: &str) -> Result<Option<StationProfile>> {
        Ok(station::find_station(slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url_encodes_slug() {
        let source = HttpDataSource::new("https://data.example.com/".to_string());
        assert_eq!(
            source.document_url("baqueira-beret", "now"),
            "https://data.example.com/mock/baqueira-beret/now.json"
        );
        assert_eq!(
            source.document_url("estació nord", "radar"),
            "https://data.example.com/mock/estaci%C3%B3%20nord/radar.json"
        );
    }
}
