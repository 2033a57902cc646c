//! # AQI Conversion
//! Pure, testable mapping from a PM2.5 concentration (µg/m³) to the EPA
//! Air Quality Index. No I/O, suitable for unit tests and offline use.
//!
//! The breakpoint table is the EPA-published piecewise-linear one; above
//! the last breakpoint (500.4 µg/m³) the final segment's slope is
//! extrapolated, per EPA convention, instead of failing.

pub mod band;

pub use band::Band;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// EPA breakpoint row: PM2.5 range mapped onto an AQI range.
struct Breakpoint {
    pm_lo: f64,
    pm_hi: f64,
    aqi_lo: f64,
    aqi_hi: f64,
}

/// (PM2.5 µg/m³ → AQI): [0,12]→[0,50], (12,35.4]→(50,100],
/// (35.4,55.4]→(100,150], (55.4,150.4]→(150,200], (150.4,250.4]→(200,300],
/// (250.4,500.4]→(300,500].
const BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint { pm_lo: 0.0, pm_hi: 12.0, aqi_lo: 0.0, aqi_hi: 50.0 },
    Breakpoint { pm_lo: 12.0, pm_hi: 35.4, aqi_lo: 50.0, aqi_hi: 100.0 },
    Breakpoint { pm_lo: 35.4, pm_hi: 55.4, aqi_lo: 100.0, aqi_hi: 150.0 },
    Breakpoint { pm_lo: 55.4, pm_hi: 150.4, aqi_lo: 150.0, aqi_hi: 200.0 },
    Breakpoint { pm_lo: 150.4, pm_hi: 250.4, aqi_lo: 200.0, aqi_hi: 300.0 },
    Breakpoint { pm_lo: 250.4, pm_hi: 500.4, aqi_lo: 300.0, aqi_hi: 500.0 },
];

#[derive(Debug, Error)]
pub enum AqiError {
    #[error("invalid PM2.5 measurement: {0}")]
    InvalidMeasurement(f64),
}

/// EPA severity category for an AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    fn for_value(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }
}

/// Derived AQI result. Never stored; recomputed from the reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aqi {
    pub value: u32,
    pub category: AqiCategory,
}

/// Convert a PM2.5 concentration to an AQI score.
///
/// Rejects NaN and negative input with [`AqiError::InvalidMeasurement`].
/// Within a segment: `AQI = (AQIhi−AQIlo)/(PMhi−PMlo) × (PM−PMlo) + AQIlo`,
/// rounded to the nearest integer.
pub fn convert_pm25(pm: f64) -> Result<Aqi, AqiError> {
    if pm.is_nan() || pm < 0.0 {
        return Err(AqiError::InvalidMeasurement(pm));
    }

    let bp = BREAKPOINTS
        .iter()
        .find(|bp| pm <= bp.pm_hi)
        // Hazardous overflow: extrapolate the final segment's slope.
        .unwrap_or(&BREAKPOINTS[BREAKPOINTS.len() - 1]);

    let slope = (bp.aqi_hi - bp.aqi_lo) / (bp.pm_hi - bp.pm_lo);
    let value = (slope * (pm - bp.pm_lo) + bp.aqi_lo).round() as u32;

    Ok(Aqi {
        value,
        category: AqiCategory::for_value(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aqi(pm: f64) -> u32 {
        convert_pm25(pm).expect("valid pm").value
    }

    #[test]
    fn breakpoint_boundaries_are_exact() {
        assert_eq!(aqi(0.0), 0);
        assert_eq!(aqi(12.0), 50);
        assert_eq!(aqi(35.4), 100);
        assert_eq!(aqi(55.4), 150);
        assert_eq!(aqi(150.4), 200);
        assert_eq!(aqi(250.4), 300);
        assert_eq!(aqi(500.4), 500);
    }

    #[test]
    fn monotone_within_and_across_segments() {
        let mut prev = 0;
        let mut pm = 0.0;
        while pm <= 600.0 {
            let v = aqi(pm);
            assert!(v >= prev, "AQI regressed at pm={pm}: {v} < {prev}");
            prev = v;
            pm += 0.1;
        }
    }

    #[test]
    fn hazardous_overflow_extrapolates() {
        // Final segment slope is 200/250 = 0.8 AQI per µg/m³.
        assert_eq!(aqi(600.4), 580);
        assert!(aqi(1000.0) > 500);
    }

    #[test]
    fn negative_and_nan_are_rejected() {
        assert!(matches!(
            convert_pm25(-0.1),
            Err(AqiError::InvalidMeasurement(_))
        ));
        assert!(matches!(
            convert_pm25(f64::NAN),
            Err(AqiError::InvalidMeasurement(_))
        ));
    }

    #[test]
    fn categories_follow_value() {
        assert_eq!(convert_pm25(5.0).unwrap().category, AqiCategory::Good);
        assert_eq!(convert_pm25(20.0).unwrap().category, AqiCategory::Moderate);
        assert_eq!(
            convert_pm25(200.0).unwrap().category,
            AqiCategory::VeryUnhealthy
        );
        assert_eq!(
            convert_pm25(400.0).unwrap().category,
            AqiCategory::Hazardous
        );
    }
}
