// src/pipeline.rs
//
// Orchestrates the two flows around the pure core:
//  - discovery: location → fetch all sensors → rank by distance
//  - complication: persisted selection → fetch by id → AQI → payload
//
// The core stays synchronous; this is the one async seam, owned by the
// HTTP layer.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::aqi::{self, AqiError};
use crate::complication::{render, ComplicationData, ComplicationKind, ComplicationUpdate};
use crate::location::LocationError;
use crate::provider::{check_freshness, ProviderError, SensorProvider};
use crate::ranking::{rank_sensors, LatLon, RankedSensor};
use crate::store::SensorStore;

/// Minimum quiescence between provider refetches for the same origin.
pub const DEBOUNCE_SECS: u64 = 3;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("discovery_runs_total", "Discovery pipeline invocations.");
        describe_counter!(
            "discovery_debounced_total",
            "Discovery calls served from the debounce window."
        );
        describe_counter!("discovery_errors_total", "Discovery pipeline failures.");
        describe_counter!(
            "complication_no_update_total",
            "Complication requests answered with no-update-required."
        );
        describe_histogram!("purpleair_fetch_ms", "Provider fetch time in milliseconds.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the discovery pipeline last ran."
        );
    });
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("location unavailable")]
    LocationUnavailable(#[from] LocationError),
    #[error("sensor fetch failed: {0}")]
    SensorFetch(#[from] ProviderError),
    #[error("no sensor selected")]
    NoSensorSelected,
    #[error(transparent)]
    InvalidMeasurement(#[from] AqiError),
}

struct DebounceEntry {
    at: Instant,
    origin: LatLon,
    ranked: Vec<RankedSensor>,
}

pub struct Pipeline {
    provider: Arc<dyn SensorProvider>,
    store: Arc<SensorStore>,
    last_discovery: Mutex<Option<DebounceEntry>>,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn SensorProvider>, store: Arc<SensorStore>) -> Self {
        ensure_metrics_described();
        Self {
            provider,
            store,
            last_discovery: Mutex::new(None),
        }
    }

    /// Ranked nearby sensors for `origin`, capped at 100, with the
    /// persisted selection pinned to the tail.
    ///
    /// A repeat call for the same origin within [`DEBOUNCE_SECS`] is
    /// served from the previous result instead of refetching, the same
    /// 3-second quiescence the watch applied to location updates.
    pub async fn discover(&self, origin: LatLon) -> Result<Vec<RankedSensor>, PipelineError> {
        counter!("discovery_runs_total").increment(1);

        {
            let last = self.last_discovery.lock().expect("debounce mutex poisoned");
            if let Some(entry) = last.as_ref() {
                if entry.origin == origin && entry.at.elapsed().as_secs() < DEBOUNCE_SECS {
                    counter!("discovery_debounced_total").increment(1);
                    return Ok(entry.ranked.clone());
                }
            }
        }

        let sensors = self.provider.fetch_all().await.map_err(|e| {
            counter!("discovery_errors_total").increment(1);
            tracing::warn!(error = %e, provider = self.provider.name(), "sensor fetch failed");
            PipelineError::from(e)
        })?;

        let fetched = sensors.len();
        let ranked = rank_sensors(origin, sensors, self.store.selected());
        tracing::info!(
            target: "discovery",
            fetched,
            ranked = ranked.len(),
            "discovery run"
        );
        gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        let mut last = self.last_discovery.lock().expect("debounce mutex poisoned");
        *last = Some(DebounceEntry {
            at: Instant::now(),
            origin,
            ranked: ranked.clone(),
        });

        Ok(ranked)
    }

    /// The selected sensor's rendered payload for one slot kind, or a
    /// typed error describing why there is nothing to show.
    pub async fn complication_data(
        &self,
        kind: ComplicationKind,
    ) -> Result<ComplicationData, PipelineError> {
        let id = self.store.selected().ok_or(PipelineError::NoSensorSelected)?;
        let sensor = self.provider.fetch_by_id(id).await?;
        check_freshness(&sensor)?;
        let aqi = aqi::convert_pm25(sensor.pm25)?;
        Ok(render(kind, &sensor, aqi))
    }

    /// Complication policy boundary: any failure (no selection, fetch
    /// error, stale or invalid reading) becomes `NoUpdateRequired` so
    /// the slot keeps its current content. The cause is logged here.
    pub async fn complication_update(&self, kind: ComplicationKind) -> ComplicationUpdate {
        match self.complication_data(kind).await {
            Ok(data) => ComplicationUpdate::Update(data),
            Err(PipelineError::NoSensorSelected) => {
                counter!("complication_no_update_total").increment(1);
                tracing::debug!("complication requested with no sensor selected");
                ComplicationUpdate::NoUpdateRequired
            }
            Err(e) => {
                counter!("complication_no_update_total").increment(1);
                tracing::warn!(error = %e, "complication update failed");
                ComplicationUpdate::NoUpdateRequired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Sensor, SensorId};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SensorProvider for CountingProvider {
        async fn fetch_all(&self) -> Result<Vec<Sensor>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Sensor {
                id: SensorId(1),
                lat: 37.78,
                lon: -122.42,
                pm25: 8.0,
                last_seen: chrono::Utc::now().timestamp() as u64,
                label: None,
            }])
        }

        async fn fetch_by_id(&self, id: SensorId) -> Result<Sensor, ProviderError> {
            Err(ProviderError::NotFound(id))
        }

        fn name(&self) -> &'static str {
            "Counting"
        }
    }

    fn pipeline_with(provider: Arc<dyn SensorProvider>) -> (Pipeline, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(SensorStore::new(dir.path().join("selection.json")));
        (Pipeline::new(provider, store), dir)
    }

    #[tokio::test]
    async fn repeat_discovery_within_window_does_not_refetch() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let (pipeline, _dir) = pipeline_with(provider.clone());

        let origin = LatLon { lat: 37.77, lon: -122.42 };
        let a = pipeline.discover(origin).await.expect("first");
        let b = pipeline.discover(origin).await.expect("second");

        assert_eq!(a, b);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_origin_bypasses_debounce() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let (pipeline, _dir) = pipeline_with(provider.clone());

        pipeline
            .discover(LatLon { lat: 37.77, lon: -122.42 })
            .await
            .expect("first");
        pipeline
            .discover(LatLon { lat: 40.71, lon: -74.0 })
            .await
            .expect("second");

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn complication_without_selection_is_no_update() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let (pipeline, _dir) = pipeline_with(provider);

        let update = pipeline
            .complication_update(ComplicationKind::ShortText)
            .await;
        assert_eq!(update, ComplicationUpdate::NoUpdateRequired);
    }
}
