// Application layer - Use cases and collaborator traits
pub mod alerts_store;
pub mod data_source;
pub mod forecast_mapper;
pub mod key_value_store;
pub mod weather_store;
