use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{error::SampleError, icon::Icon};

/// A selectable place from the location catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    pub city: String,
    pub country: String,
}

impl Location {
    /// Display label, e.g. "Paris, France".
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// The weather fields of one forecast time slot that decide its icon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSample {
    pub cloud_cover_percent: u8,
    pub precipitation_rate: f64,
    pub humidity_percent: u8,
    pub lifted_index: f64,
    /// Metres per second.
    pub wind_speed: f64,
    pub is_snow: Option<bool>,
}

impl ForecastSample {
    /// Checks the documented ranges. Meant for the boundary where provider
    /// data enters the program; icon selection itself accepts any sample.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.cloud_cover_percent > 100 {
            return Err(SampleError::OutOfRange {
                field: "cloud_cover_percent",
                value: self.cloud_cover_percent.into(),
            });
        }
        if self.humidity_percent > 100 {
            return Err(SampleError::OutOfRange {
                field: "humidity_percent",
                value: self.humidity_percent.into(),
            });
        }

        for (field, value) in [
            ("precipitation_rate", self.precipitation_rate),
            ("lifted_index", self.lifted_index),
            ("wind_speed", self.wind_speed),
        ] {
            if !value.is_finite() {
                return Err(SampleError::NotFinite { field });
            }
        }

        if self.precipitation_rate < 0.0 {
            return Err(SampleError::OutOfRange {
                field: "precipitation_rate",
                value: self.precipitation_rate,
            });
        }
        if self.wind_speed < 0.0 {
            return Err(SampleError::OutOfRange {
                field: "wind_speed",
                value: self.wind_speed,
            });
        }

        Ok(())
    }

    pub fn is_snow(&self) -> bool {
        self.is_snow == Some(true)
    }
}

/// One forecast time slot with the display fields the cards need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSlot {
    /// Hours after the forecast init time.
    pub timepoint: u32,
    pub valid_at: NaiveDateTime,
    pub temperature_c: f64,
    pub wind_direction: String,
    /// Provider weather code, e.g. "pcloudyday".
    pub weather: String,
    pub sample: ForecastSample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub init: NaiveDateTime,
    pub slots: Vec<ForecastSlot>,
}

/// A labelled value shown on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub label: String,
    pub value: String,
}

impl Detail {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub icon: Icon,
    pub details: Vec<Detail>,
}
