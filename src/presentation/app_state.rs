// Application state shared by all handlers
use crate::application::alerts_store::AlertsStore;
use crate::application::weather_store::WeatherStore;

pub struct AppState {
    pub weather: WeatherStore,
    pub alerts: AlertsStore,
}
