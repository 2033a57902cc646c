//! # Complication Rendering
//! Builds the payloads a watch-face complication slot consumes: a short
//! text, a long text, or a ranged value (gauge). Mirrors the three
//! display types of the original provider service.
//!
//! Rendering is pure; the pipeline decides *what* to render and maps
//! every no-data condition to [`ComplicationUpdate::NoUpdateRequired`]
//! so the face never shows an error state.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::aqi::{Aqi, Band};
use crate::provider::Sensor;

const ICON: &str = "ic_air_quality";
const TAP_ACTION: &str = "/sensors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplicationKind {
    ShortText,
    LongText,
    RangedValue,
}

impl std::str::FromStr for ComplicationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short-text" => Ok(ComplicationKind::ShortText),
            "long-text" => Ok(ComplicationKind::LongText),
            "ranged-value" => Ok(ComplicationKind::RangedValue),
            _ => Err(()),
        }
    }
}

/// Gauge parameters for a ranged-value slot. `value` is clamped into the
/// band; the raw AQI integer stays in `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub color: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplicationData {
    pub kind: ComplicationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    pub content_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<Gauge>,
    pub icon: String,
    pub tap_action: String,
}

/// Outcome of a complication request. `NoUpdateRequired` tells the
/// renderer to keep whatever it shows now and release its update job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ComplicationUpdate {
    Update(ComplicationData),
    NoUpdateRequired,
}

/// Render a sensor's AQI for one slot kind.
pub fn render(kind: ComplicationKind, sensor: &Sensor, aqi: Aqi) -> ComplicationData {
    let text = aqi.value.to_string();
    let description = format!(
        "AQI of {} ({}) as of {} ago",
        aqi.value,
        aqi.category.label(),
        time_ago(sensor.last_seen)
    );

    let (title, gauge) = match kind {
        ComplicationKind::ShortText => (Some("AQI".to_string()), None),
        ComplicationKind::LongText => (Some(time_ago(sensor.last_seen)), None),
        ComplicationKind::RangedValue => {
            let band = Band::for_aqi(aqi.value);
            (
                None,
                Some(Gauge {
                    value: band.gauge_value(aqi.value),
                    min: band.min,
                    max: band.max,
                    color: band.color,
                }),
            )
        }
    };

    ComplicationData {
        kind,
        title,
        text,
        content_description: description,
        gauge,
        icon: ICON.to_string(),
        tap_action: TAP_ACTION.to_string(),
    }
}

/// Coarse single-unit age, newest unit first: "now", "12m", "3h", "2d".
fn time_ago(last_seen: u64) -> String {
    let now = Utc::now().timestamp().max(0) as u64;
    let secs = now.saturating_sub(last_seen);
    match secs {
        0..=59 => "now".to_string(),
        60..=3_599 => format!("{}m", secs / 60),
        3_600..=86_399 => format!("{}h", secs / 3_600),
        _ => format!("{}d", secs / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::convert_pm25;
    use crate::provider::SensorId;

    fn sensor() -> Sensor {
        Sensor {
            id: SensorId(14633),
            lat: 37.8,
            lon: -122.27,
            pm25: 42.0,
            last_seen: Utc::now().timestamp() as u64 - 120,
            label: Some("Oakland".to_string()),
        }
    }

    #[test]
    fn short_text_has_aqi_title_and_value() {
        let aqi = convert_pm25(42.0).unwrap();
        let data = render(ComplicationKind::ShortText, &sensor(), aqi);
        assert_eq!(data.title.as_deref(), Some("AQI"));
        assert_eq!(data.text, aqi.value.to_string());
        assert!(data.gauge.is_none());
        assert_eq!(data.tap_action, "/sensors");
    }

    #[test]
    fn long_text_titles_with_age() {
        let aqi = convert_pm25(42.0).unwrap();
        let data = render(ComplicationKind::LongText, &sensor(), aqi);
        assert_eq!(data.title.as_deref(), Some("2m"));
    }

    #[test]
    fn ranged_value_gauge_matches_band_table() {
        let aqi = convert_pm25(42.0).unwrap(); // AQI 117, band (100,150] color 2
        let data = render(ComplicationKind::RangedValue, &sensor(), aqi);
        let gauge = data.gauge.expect("gauge");
        assert_eq!(gauge.min, 100.0);
        assert_eq!(gauge.max, 150.0);
        assert_eq!(gauge.color, 2);
        assert_eq!(gauge.value, aqi.value as f32);
        // Raw integer still in the text slot.
        assert_eq!(data.text, aqi.value.to_string());
    }

    #[test]
    fn gauge_clamps_hazardous_overflow() {
        let mut s = sensor();
        s.pm25 = 600.0;
        let aqi = convert_pm25(s.pm25).unwrap();
        assert!(aqi.value > 400);
        let data = render(ComplicationKind::RangedValue, &s, aqi);
        let gauge = data.gauge.expect("gauge");
        assert_eq!(gauge.value, 400.0);
        assert_eq!(data.text, aqi.value.to_string());
    }

    #[test]
    fn kind_parses_from_kebab_case() {
        assert_eq!(
            "ranged-value".parse::<ComplicationKind>(),
            Ok(ComplicationKind::RangedValue)
        );
        assert!("gauge".parse::<ComplicationKind>().is_err());
    }
}
