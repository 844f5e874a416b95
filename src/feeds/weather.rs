//! Current conditions and air quality for the header line.
//!
//! Open-Meteo, keyless. The dashboard is pinned to one configured
//! coordinate; there is no geolocation. Air quality is a second endpoint
//! and degrades independently, so a missing PM reading still leaves the
//! temperature on screen.

use daydeck_core::deck_config::WeatherConfig;
use serde::Deserialize;
use tracing::warn;

const FORECAST_API: &str = "https://api.open-meteo.com/v1/forecast";
const AIR_QUALITY_API: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

#[derive(Debug, Clone)]
pub struct Weather {
    pub temperature_c: f64,
    pub weather_code: i32,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
}

impl Weather {
    /// Short label for the WMO weather code groups.
    pub fn describe(&self) -> &'static str {
        match self.weather_code {
            0 => "Clear",
            1..=3 => "Partly cloudy",
            45 | 48 => "Fog",
            51..=57 => "Drizzle",
            61..=67 => "Rain",
            71..=77 => "Snow",
            80..=82 => "Showers",
            85 | 86 => "Snow showers",
            95..=99 => "Thunderstorm",
            _ => "Unsettled",
        }
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

#[derive(Deserialize)]
struct AirQualityResponse {
    current: AirQualityCurrent,
}

#[derive(Deserialize)]
struct AirQualityCurrent {
    pm10: Option<f64>,
    pm2_5: Option<f64>,
}

pub async fn fetch(client: &reqwest::Client, config: &WeatherConfig) -> Option<Weather> {
    if !config.enabled {
        return None;
    }

    let current = match fetch_current(client, config).await {
        Ok(current) => current,
        Err(err) => {
            warn!(%err, "weather fetch failed");
            return None;
        }
    };

    let air = match fetch_air_quality(client, config).await {
        Ok(air) => Some(air),
        Err(err) => {
            warn!(%err, "air quality fetch failed");
            None
        }
    };

    Some(Weather {
        temperature_c: current.temperature,
        weather_code: current.weathercode,
        pm10: air.as_ref().and_then(|a| a.pm10),
        pm2_5: air.as_ref().and_then(|a| a.pm2_5),
    })
}

async fn fetch_current(
    client: &reqwest::Client,
    config: &WeatherConfig,
) -> anyhow::Result<CurrentWeather> {
    let response: ForecastResponse = client
        .get(FORECAST_API)
        .query(&[
            ("latitude", config.latitude.to_string()),
            ("longitude", config.longitude.to_string()),
            ("current_weather", "true".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response.current_weather)
}

async fn fetch_air_quality(
    client: &reqwest::Client,
    config: &WeatherConfig,
) -> anyhow::Result<AirQualityCurrent> {
    let response: AirQualityResponse = client
        .get(AIR_QUALITY_API)
        .query(&[
            ("latitude", config.latitude.to_string()),
            ("longitude", config.longitude.to_string()),
            ("current", "pm10,pm2_5".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response.current)
}
