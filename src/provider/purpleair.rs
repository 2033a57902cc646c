// src/provider/purpleair.rs
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::provider::{Sensor, SensorId, SensorProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://www.purpleair.com";

/// Raw row of the legacy PurpleAir map API. Numeric fields arrive as
/// strings or are missing entirely on dead stations, so everything is
/// optional here and validated in [`RawSensor::into_sensor`].
#[derive(Debug, Deserialize)]
struct RawSensor {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Label")]
    label: Option<String>,
    #[serde(rename = "Lat")]
    lat: Option<f64>,
    #[serde(rename = "Lon")]
    lon: Option<f64>,
    #[serde(rename = "PM2_5Value")]
    pm25: Option<String>,
    #[serde(rename = "LastSeen")]
    last_seen: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    results: Vec<RawSensor>,
}

impl RawSensor {
    fn into_sensor(self) -> Option<Sensor> {
        let lat = self.lat?;
        let lon = self.lon?;
        let pm25: f64 = self.pm25.as_deref()?.trim().parse().ok()?;
        if !(pm25.is_finite() && pm25 >= 0.0) {
            return None;
        }
        Some(Sensor {
            id: SensorId(self.id),
            lat,
            lon,
            pm25,
            last_seen: self.last_seen.unwrap_or(0),
            label: self.label,
        })
    }
}

/// Decode a map API body, dropping malformed rows (no coordinates,
/// unparsable PM2.5) the way the original app did.
pub fn parse_map_response(body: &str) -> Result<Vec<Sensor>, ProviderError> {
    let resp: MapResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let total = resp.results.len();
    let sensors: Vec<Sensor> = resp
        .results
        .into_iter()
        .filter_map(RawSensor::into_sensor)
        .collect();

    let skipped = total - sensors.len();
    if skipped > 0 {
        tracing::warn!(skipped, total, "dropped malformed sensor rows");
        counter!("purpleair_rows_skipped_total").increment(skipped as u64);
    }
    counter!("purpleair_rows_total").increment(total as u64);

    Ok(sensors)
}

/// Client for the legacy PurpleAir map API (`/json`).
pub struct PurpleAirProvider {
    client: reqwest::Client,
    base_url: String,
}

impl PurpleAirProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_body(&self, url: &str) -> Result<String, ProviderError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ProviderError::Fetch)?;
        resp.text().await.map_err(ProviderError::Fetch)
    }
}

impl Default for PurpleAirProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl SensorProvider for PurpleAirProvider {
    async fn fetch_all(&self) -> Result<Vec<Sensor>, ProviderError> {
        let t0 = std::time::Instant::now();

        let url = format!("{}/json", self.base_url);
        let body = self.get_body(&url).await?;
        let sensors = parse_map_response(&body)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("purpleair_fetch_ms").record(ms);
        counter!("purpleair_sensors_total").increment(sensors.len() as u64);

        Ok(sensors)
    }

    async fn fetch_by_id(&self, id: SensorId) -> Result<Sensor, ProviderError> {
        let url = format!("{}/json?show={}", self.base_url, id);
        let body = self.get_body(&url).await?;
        parse_map_response(&body)?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(ProviderError::NotFound(id))
    }

    fn name(&self) -> &'static str {
        "PurpleAir"
    }
}
