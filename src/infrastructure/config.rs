use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub data: DataSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub base_url: String,
    #[serde(default = "default_forecast_hours")]
    pub forecast_hours: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
}

fn default_forecast_hours() -> u32 {
    72
}

pub fn load_weather_config() -> anyhow::Result<WeatherConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/weather"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
