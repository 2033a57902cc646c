// src/location.rs
use thiserror::Error;

use crate::ranking::LatLon;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("no location fix available")]
    Unavailable,
}

/// Seam over whatever supplies a fix. The watch fed us fused GPS; the
/// service takes a configured point or the request's query parameters.
/// The core consumes the latest value per invocation.
pub trait LocationProvider: Send + Sync {
    fn current(&self) -> Result<LatLon, LocationError>;
}

/// Fixed location from configuration. `None` means the deployment has no
/// default point and callers must pass coordinates explicitly.
pub struct StaticLocation {
    fix: Option<LatLon>,
}

impl StaticLocation {
    pub fn new(fix: Option<LatLon>) -> Self {
        Self { fix }
    }
}

impl LocationProvider for StaticLocation {
    fn current(&self) -> Result<LatLon, LocationError> {
        self.fix.ok_or(LocationError::Unavailable)
    }
}
