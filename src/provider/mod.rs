// src/provider/mod.rs
pub mod purpleair;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A reading older than this is considered stale for complication use.
pub const MAX_READING_AGE_SECS: u64 = 4 * 3600;

/// Unique PurpleAir station identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SensorId(pub i64);

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One PurpleAir monitoring station, constructed fresh on every fetch.
/// Not cached beyond the current request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub lat: f64,
    pub lon: f64,
    /// PM2.5 concentration in µg/m³.
    pub pm25: f64,
    /// Unix seconds of the station's last report.
    pub last_seen: u64,
    /// Station label as reported by the network, for list display.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("sensor fetch failed: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("decoding sensor payload: {0}")]
    Decode(String),
    #[error("sensor {0} not found")]
    NotFound(SensorId),
    #[error("reading from sensor {id} is stale ({age_secs}s old)")]
    StaleReading { id: SensorId, age_secs: u64 },
}

/// Seam over the sensor network. The real implementation talks to the
/// PurpleAir map API; tests plug in mocks.
#[async_trait::async_trait]
pub trait SensorProvider: Send + Sync {
    /// The complete current set of known sensors.
    async fn fetch_all(&self) -> Result<Vec<Sensor>, ProviderError>;

    /// A single sensor by id.
    async fn fetch_by_id(&self, id: SensorId) -> Result<Sensor, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Reject readings too old to display on a complication.
pub fn check_freshness(sensor: &Sensor) -> Result<(), ProviderError> {
    let now = Utc::now().timestamp().max(0) as u64;
    let age_secs = now.saturating_sub(sensor.last_seen);
    if age_secs > MAX_READING_AGE_SECS {
        return Err(ProviderError::StaleReading {
            id: sensor.id,
            age_secs,
        });
    }
    Ok(())
}
