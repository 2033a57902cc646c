// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod aqi;
pub mod complication;
pub mod config;
pub mod location;
pub mod metrics;
pub mod pipeline;
pub mod provider;
pub mod ranking;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::aqi::{convert_pm25, Aqi, AqiCategory, AqiError, Band};
pub use crate::complication::{ComplicationData, ComplicationKind, ComplicationUpdate};
pub use crate::pipeline::{Pipeline, PipelineError};
pub use crate::provider::{Sensor, SensorId, SensorProvider};
pub use crate::ranking::{rank_sensors, LatLon, RankedSensor, MAX_SENSORS};
pub use crate::store::SensorStore;
