use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::complication::{ComplicationKind, ComplicationUpdate};
use crate::config::Config;
use crate::location::{LocationProvider, StaticLocation};
use crate::pipeline::{Pipeline, PipelineError};
use crate::provider::purpleair::PurpleAirProvider;
use crate::provider::{SensorId, SensorProvider};
use crate::ranking::{LatLon, RankedSensor};
use crate::store::SensorStore;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    location: Arc<dyn LocationProvider>,
    store: Arc<SensorStore>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn SensorProvider>,
        location: Arc<dyn LocationProvider>,
        store: Arc<SensorStore>,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline::new(provider, store.clone())),
            location,
            store,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let provider = Arc::new(PurpleAirProvider::new(cfg.provider_base_url.clone()));
        let location = Arc::new(StaticLocation::new(cfg.default_location));
        let store = Arc::new(SensorStore::new(cfg.store_path.clone()));
        Self::new(provider, location, store)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sensors", get(list_sensors))
        .route("/sensors/select", post(select_sensor))
        .route("/complication/{kind}", get(complication))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody { error: msg.into() }))
}

#[derive(serde::Deserialize)]
struct SensorsQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

/// The "activity list": nearby sensors ranked by distance, selection at
/// the tail. Coordinates come from the query or the configured default.
async fn list_sensors(
    State(state): State<AppState>,
    Query(q): Query<SensorsQuery>,
) -> Result<Json<Vec<RankedSensor>>, (StatusCode, Json<ErrorBody>)> {
    let origin = match (q.lat, q.lon) {
        (Some(lat), Some(lon)) => LatLon { lat, lon },
        _ => state.location.current().map_err(|e| {
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        })?,
    };

    match state.pipeline.discover(origin).await {
        Ok(ranked) => Ok(Json(ranked)),
        Err(e @ (PipelineError::LocationUnavailable(_) | PipelineError::SensorFetch(_))) => {
            Err(error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
        }
        Err(e) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.to_string(),
        )),
    }
}

#[derive(serde::Deserialize)]
struct SelectReq {
    /// `null` clears the selection.
    sensor_id: Option<i64>,
}

#[derive(serde::Serialize)]
struct SelectResp {
    selected: Option<i64>,
}

async fn select_sensor(
    State(state): State<AppState>,
    Json(body): Json<SelectReq>,
) -> Result<Json<SelectResp>, (StatusCode, Json<ErrorBody>)> {
    let id = body.sensor_id.map(SensorId);
    state
        .store
        .set_selected(id)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(SelectResp {
        selected: body.sensor_id,
    }))
}

/// The complication surface. Failures never become HTTP errors here:
/// the renderer is told "no update required" and keeps its content.
async fn complication(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ComplicationUpdate>, (StatusCode, Json<ErrorBody>)> {
    let kind: ComplicationKind = kind.parse().map_err(|_| {
        error_response(
            StatusCode::NOT_FOUND,
            "unknown complication kind (expected short-text, long-text, ranged-value)",
        )
    })?;
    Ok(Json(state.pipeline.complication_update(kind).await))
}
