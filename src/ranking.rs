//! # Nearest-Sensor Ranking
//! Pure logic that orders sensors by distance from a location, caps the
//! list, and pins the persisted selection to the tail so a list UI can
//! render it in a fixed highlighted slot.
//!
//! The selection mark is returned as a tag on the ranked entry, never
//! written back onto a shared `Sensor`.

use serde::{Deserialize, Serialize};

use crate::provider::{Sensor, SensorId};

/// Cap on the ranked list length.
pub const MAX_SENSORS: usize = 100;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_088.0;

/// A lat/lon pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Great-circle distance via the haversine formula, in meters.
    /// Only the relative order matters to ranking.
    pub fn haversine_distance(&self, other: &LatLon) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin()
                * (d_lon / 2.0).sin();

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// One ranked entry: the sensor, its distance from the origin, and
/// whether it is the persisted selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSensor {
    #[serde(flatten)]
    pub sensor: Sensor,
    pub distance_m: f64,
    pub selected: bool,
}

/// Rank sensors by ascending distance from `origin`, cap at
/// [`MAX_SENSORS`], and pin the selected sensor (if it made the cap) to
/// the tail of the list.
///
/// Ordering uses the composite key `(selected, distance)` so the result
/// does not depend on sort stability: `true > false` pushes the selected
/// entry past every other, and non-selected entries order by distance.
/// The cap is applied on the distance order *before* the selection pin,
/// so a selection outside the nearest 100 is simply absent.
///
/// Deterministic: identical inputs yield identical output.
pub fn rank_sensors(
    origin: LatLon,
    sensors: Vec<Sensor>,
    selected: Option<SensorId>,
) -> Vec<RankedSensor> {
    let mut ranked: Vec<RankedSensor> = sensors
        .into_iter()
        .map(|sensor| {
            let here = LatLon {
                lat: sensor.lat,
                lon: sensor.lon,
            };
            RankedSensor {
                distance_m: origin.haversine_distance(&here),
                selected: false,
                sensor,
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ranked.truncate(MAX_SENSORS);

    for entry in ranked.iter_mut() {
        entry.selected = selected == Some(entry.sensor.id);
    }
    ranked.sort_by(|a, b| {
        (a.selected, a.distance_m).partial_cmp(&(b.selected, b.distance_m))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}
