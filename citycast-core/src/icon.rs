//! Weather icon selection.
//!
//! [`select_icon`] runs an ordered list of rules over a [`ForecastSample`].
//! Every rule whose condition holds replaces the icon chosen so far, so the
//! last matching rule decides. The resulting priority is
//! wind > thunderstorm > snow > rain > cloud band.

use serde::{Deserialize, Serialize};

use crate::model::ForecastSample;

const SHOWER_RATE: f64 = 4.0;
const MIXED_HUMIDITY: u8 = 90;
const UNSTABLE_LIFTED_INDEX: f64 = -5.0;
/// Metres per second, about 38.9 km/h.
const WINDY_SPEED: f64 = 10.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Clear,
    PartlyCloudy,
    Cloudy,
    OccasionalShowers,
    Fog,
    LightRain,
    Rain,
    RainSnowMix,
    Snow,
    ThunderstormRain,
    ThunderstormPossible,
    Windy,
}

impl Icon {
    pub const fn all() -> &'static [Icon] {
        &[
            Icon::Clear,
            Icon::PartlyCloudy,
            Icon::Cloudy,
            Icon::OccasionalShowers,
            Icon::Fog,
            Icon::LightRain,
            Icon::Rain,
            Icon::RainSnowMix,
            Icon::Snow,
            Icon::ThunderstormRain,
            Icon::ThunderstormPossible,
            Icon::Windy,
        ]
    }

    /// Image asset file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            Icon::Clear => "clear.png",
            Icon::PartlyCloudy => "pcloudy.png",
            Icon::Cloudy => "cloudy.png",
            Icon::OccasionalShowers => "oshower.png",
            Icon::Fog => "fog.png",
            Icon::LightRain => "lightrain.png",
            Icon::Rain => "rain.png",
            Icon::RainSnowMix => "rainsnow.png",
            Icon::Snow => "snow.png",
            Icon::ThunderstormRain => "tsrain.png",
            Icon::ThunderstormPossible => "tstorm.png",
            Icon::Windy => "windy.png",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Icon::Clear => "Clear",
            Icon::PartlyCloudy => "Partly cloudy",
            Icon::Cloudy => "Cloudy",
            Icon::OccasionalShowers => "Occasional showers",
            Icon::Fog => "Foggy",
            Icon::LightRain => "Light rain or showers",
            Icon::Rain => "Rain",
            Icon::RainSnowMix => "Mixed rain and snow",
            Icon::Snow => "Snow",
            Icon::ThunderstormRain => "Thunderstorm",
            Icon::ThunderstormPossible => "Thunderstorm possible",
            Icon::Windy => "Windy",
        }
    }

    /// Path of the icon asset below `base`, e.g. `/images/clear.png`.
    pub fn asset_path(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.file_name())
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

type Rule = fn(&ForecastSample) -> Option<Icon>;

/// Overrides applied after the cloud band, in evaluation order.
const OVERRIDES: [Rule; 4] = [precipitation, snow, instability, wind];

/// Picks the icon for a forecast sample.
pub fn select_icon(sample: &ForecastSample) -> Icon {
    let base = cloud_band_icon(sample.cloud_cover_percent, sample.precipitation_rate);
    OVERRIDES.iter().fold(base, |icon, rule| rule(sample).unwrap_or(icon))
}

/// Base classification by cloud cover, before any override.
///
/// Every `u8` lands in a band; values above 100 count as overcast.
pub fn cloud_band_icon(cloud_cover_percent: u8, precipitation_rate: f64) -> Icon {
    let dry = precipitation_rate < SHOWER_RATE;
    match cloud_cover_percent {
        0..20 => Icon::Clear,
        20..60 => Icon::PartlyCloudy,
        60..80 if dry => Icon::Cloudy,
        60..80 => Icon::OccasionalShowers,
        _ if dry => Icon::Fog,
        _ => Icon::LightRain,
    }
}

fn precipitation(sample: &ForecastSample) -> Option<Icon> {
    (sample.precipitation_rate >= SHOWER_RATE).then(|| {
        if sample.humidity_percent > MIXED_HUMIDITY { Icon::RainSnowMix } else { Icon::Rain }
    })
}

fn snow(sample: &ForecastSample) -> Option<Icon> {
    (sample.precipitation_rate >= SHOWER_RATE && sample.is_snow()).then_some(Icon::Snow)
}

fn instability(sample: &ForecastSample) -> Option<Icon> {
    (sample.lifted_index < UNSTABLE_LIFTED_INDEX).then(|| {
        if sample.precipitation_rate > SHOWER_RATE {
            Icon::ThunderstormRain
        } else {
            Icon::ThunderstormPossible
        }
    })
}

fn wind(sample: &ForecastSample) -> Option<Icon> {
    (sample.wind_speed > WINDY_SPEED).then_some(Icon::Windy)
}
