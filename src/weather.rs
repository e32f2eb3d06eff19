use chrono::{Local, NaiveTime};
use log::{debug, error};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ConfigurationError, FetchError};

/// Environment variable holding the OpenWeatherMap key
pub const API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Current conditions from one successful poll
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u32,
    pub observed_at: NaiveTime,
}

/// Client for the OpenWeatherMap current-weather endpoint, bound to a
/// single city
pub struct WeatherClient {
    http: Client,
    endpoint: String,
    city: String,
    api_key: String,
    units: String,
    language: String,
}

impl WeatherClient {
    /// Build a client. A missing or blank key is a configuration error
    pub fn new(config: &Config, api_key: Option<String>) -> Result<Self, ConfigurationError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigurationError::MissingApiKey { var: API_KEY_VAR })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            city: config.city.clone(),
            api_key,
            units: config.units.clone(),
            language: config.language.clone(),
        })
    }

    /// Build a client with the key from [API_KEY_VAR]
    pub fn from_env(config: &Config) -> Result<Self, ConfigurationError> {
        Self::new(config, std::env::var(API_KEY_VAR).ok())
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Poll the provider once. Failures are logged and reported as `None`;
    /// the next poll is the retry.
    pub fn get_weather(&self) -> Option<WeatherSnapshot> {
        match self.fetch() {
            Ok(snapshot) => {
                debug!(
                    "Weather for {}: {:.1}°C, {}, {}%",
                    self.city, snapshot.temperature_c, snapshot.description, snapshot.humidity_pct
                );
                Some(snapshot)
            }
            Err(err) => {
                error!("Failed to fetch weather for {}: {err}", self.city);
                None
            }
        }
    }

    /// One blocking GET, with no retry
    pub fn fetch(&self) -> Result<WeatherSnapshot, FetchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", self.city.as_str()),
                ("APPID", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.language.as_str()),
            ])
            .send()
            .map_err(FetchError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().map_err(FetchError::Http)?;
        parse_response(&body, Local::now().time())
    }
}

// Keeps the API key out of logs
impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("endpoint", &self.endpoint)
            .field("city", &self.city)
            .field("units", &self.units)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

/// https://openweathermap.org/current#fields_json
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: Option<MainReadings>,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: Option<String>,
}

fn parse_response(body: &str, observed_at: NaiveTime) -> Result<WeatherSnapshot, FetchError> {
    let response: CurrentWeatherResponse = serde_json::from_str(body)?;
    let main = response.main.ok_or(FetchError::MissingField("main"))?;
    let temperature_c = main.temp.ok_or(FetchError::MissingField("main.temp"))?;
    let humidity = main
        .humidity
        .ok_or(FetchError::MissingField("main.humidity"))?;
    let description = response
        .weather
        .into_iter()
        .next()
        .and_then(|condition| condition.description)
        .ok_or(FetchError::MissingField("weather[0].description"))?;

    Ok(WeatherSnapshot {
        temperature_c,
        description,
        humidity_pct: humidity.round().max(0.0) as u32,
        observed_at,
    })
}
