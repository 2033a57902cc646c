//! Severity banding for ranged-value (gauge) rendering.
//!
//! Six ordered bands, each with gauge bounds and a display color index.
//! The triples mirror the watch face styling table and are part of the
//! contract: a gauge renderer keys its palette off `color`.

use serde::{Deserialize, Serialize};

/// One severity band: inclusive upper bound, gauge bounds, color index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
    pub color: u8,
}

/// (lower, upper-inclusive, color): (0,50,0), (50,100,1), (100,150,2),
/// (150,200,3), (200,300,4), (300,400,5).
const BANDS: [Band; 6] = [
    Band { min: 0.0, max: 50.0, color: 0 },
    Band { min: 50.0, max: 100.0, color: 1 },
    Band { min: 100.0, max: 150.0, color: 2 },
    Band { min: 150.0, max: 200.0, color: 3 },
    Band { min: 200.0, max: 300.0, color: 4 },
    Band { min: 300.0, max: 400.0, color: 5 },
];

impl Band {
    /// Total over non-negative AQI; everything above 300 falls into the
    /// last band.
    pub fn for_aqi(aqi: u32) -> Band {
        let v = aqi as f32;
        *BANDS
            .iter()
            .find(|b| v <= b.max)
            .unwrap_or(&BANDS[BANDS.len() - 1])
    }

    /// Gauge value for an AQI: the raw value, clamped into this band's
    /// range. AQI above 400 clamps to 400 for rendering; the raw integer
    /// is still what a text slot shows.
    pub fn gauge_value(&self, aqi: u32) -> f32 {
        (aqi as f32).clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_indices_match_styling_table() {
        assert_eq!(Band::for_aqi(0).color, 0);
        assert_eq!(Band::for_aqi(50).color, 0);
        assert_eq!(Band::for_aqi(51).color, 1);
        assert_eq!(Band::for_aqi(100).color, 1);
        assert_eq!(Band::for_aqi(150).color, 2);
        assert_eq!(Band::for_aqi(200).color, 3);
        assert_eq!(Band::for_aqi(300).color, 4);
        assert_eq!(Band::for_aqi(301).color, 5);
        assert_eq!(Band::for_aqi(10_000).color, 5);
    }

    #[test]
    fn bands_are_contiguous_and_monotone() {
        let mut prev = Band::for_aqi(0);
        for aqi in 1..=500u32 {
            let b = Band::for_aqi(aqi);
            assert!(b.color >= prev.color, "color regressed at aqi={aqi}");
            if b.color != prev.color {
                // Each band starts where the previous one ends.
                assert_eq!(b.min, prev.max);
            }
            prev = b;
        }
    }

    #[test]
    fn gauge_clamps_above_top_band() {
        let b = Band::for_aqi(580);
        assert_eq!(b.color, 5);
        assert_eq!(b.gauge_value(580), 400.0);
        // Within range the gauge shows the raw value.
        let b = Band::for_aqi(42);
        assert_eq!(b.gauge_value(42), 42.0);
    }
}
