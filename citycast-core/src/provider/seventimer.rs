use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::{Forecast, ForecastSample, ForecastSlot, Location};

use super::{ForecastProvider, truncate_body};

/// Cloud cover percent at the middle of each 7Timer band (1..=9).
const CLOUD_COVER_PERCENT: [u8; 9] = [3, 13, 25, 38, 50, 63, 75, 88, 97];

/// Representative wind speed in m/s for each 7Timer band (1..=8).
/// Band 5 starts at 10.8 m/s.
const WIND_SPEED_MPS: [f64; 8] = [0.15, 1.85, 5.7, 9.4, 14.0, 20.85, 28.55, 36.0];

/// Client for the 7Timer! "civil" forecast product.
#[derive(Debug, Clone)]
pub struct SevenTimerProvider {
    base_url: String,
    http: Client,
}

impl SevenTimerProvider {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_url, http })
    }
}

#[async_trait]
impl ForecastProvider for SevenTimerProvider {
    async fn get_forecast(&self, location: &Location) -> Result<Forecast> {
        let lon = location.longitude.to_string();
        let lat = location.latitude.to_string();
        debug!(url = %self.base_url, %lon, %lat, "requesting 7Timer civil forecast");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lon", lon.as_str()),
                ("lat", lat.as_str()),
                ("product", "civil"),
                ("output", "json"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send forecast request for {location}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read 7Timer response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "7Timer forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let forecast = parse_civil(&body)?;
        debug!(init = %forecast.init, slots = forecast.slots.len(), "parsed forecast");

        Ok(forecast)
    }
}

/// Maps a 7Timer civil JSON document to a [`Forecast`].
pub fn parse_civil(body: &str) -> Result<Forecast> {
    let parsed: CivilResponse =
        serde_json::from_str(body).context("Failed to parse 7Timer civil JSON")?;

    let init = parse_init(&parsed.init)?;

    let slots = parsed
        .dataseries
        .into_iter()
        .map(|entry| entry.into_slot(init))
        .collect::<Result<Vec<_>>>()?;

    Ok(Forecast { init, slots })
}

/// Parses the `YYYYMMDDHH` init stamp.
fn parse_init(init: &str) -> Result<NaiveDateTime> {
    let invalid = || anyhow!("Invalid forecast init time '{init}', expected YYYYMMDDHH");

    if init.len() != 10 || !init.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let num = |range: std::ops::Range<usize>| init[range].parse::<u32>().map_err(|_| invalid());
    let year = i32::try_from(num(0..4)?).map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, num(4..6)?, num(6..8)?)
        .and_then(|date| date.and_hms_opt(num(8..10).ok()?, 0, 0))
        .ok_or_else(invalid)
}

fn cloud_cover_percent(band: u8) -> Result<u8> {
    band.checked_sub(1)
        .and_then(|idx| CLOUD_COVER_PERCENT.get(usize::from(idx)).copied())
        .ok_or_else(|| anyhow!("Cloud cover band {band} is outside 1..=9"))
}

fn wind_speed_mps(band: u8) -> Result<f64> {
    band.checked_sub(1)
        .and_then(|idx| WIND_SPEED_MPS.get(usize::from(idx)).copied())
        .ok_or_else(|| anyhow!("Wind speed band {band} is outside 1..=8"))
}

#[derive(Debug, Deserialize)]
struct CivilResponse {
    init: String,
    dataseries: Vec<CivilEntry>,
}

#[derive(Debug, Deserialize)]
struct CivilWind {
    direction: String,
    speed: u8,
}

/// `rh2m` is "85%" in the civil product; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CivilHumidity {
    Text(String),
    Number(f64),
}

impl CivilHumidity {
    fn percent(&self) -> Result<u8> {
        match self {
            CivilHumidity::Text(text) => text
                .trim()
                .trim_end_matches('%')
                .trim()
                .parse::<u8>()
                .with_context(|| format!("Invalid relative humidity '{text}'")),
            CivilHumidity::Number(n) if n.is_finite() && (0.0..=255.0).contains(n) => {
                Ok(n.round() as u8)
            }
            CivilHumidity::Number(n) => Err(anyhow!("Invalid relative humidity {n}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CivilEntry {
    timepoint: u32,
    cloudcover: u8,
    lifted_index: f64,
    prec_type: Option<String>,
    prec_amount: f64,
    temp2m: f64,
    rh2m: CivilHumidity,
    wind10m: CivilWind,
    weather: String,
}

impl CivilEntry {
    fn into_slot(self, init: NaiveDateTime) -> Result<ForecastSlot> {
        let timepoint = self.timepoint;
        let context = || format!("Invalid forecast entry at timepoint {timepoint}");

        let sample = ForecastSample {
            cloud_cover_percent: cloud_cover_percent(self.cloudcover).with_context(context)?,
            precipitation_rate: self.prec_amount,
            humidity_percent: self.rh2m.percent().with_context(context)?,
            lifted_index: self.lifted_index,
            wind_speed: wind_speed_mps(self.wind10m.speed).with_context(context)?,
            is_snow: self.prec_type.as_deref().map(|t| t.eq_ignore_ascii_case("snow")),
        };
        sample.validate().with_context(context)?;

        let valid_at = init
            .checked_add_signed(Duration::hours(i64::from(timepoint)))
            .ok_or_else(|| anyhow!("Forecast time {timepoint} hours after {init} is out of range"))
            .with_context(context)?;

        Ok(ForecastSlot {
            timepoint,
            valid_at,
            temperature_c: self.temp2m,
            wind_direction: self.wind10m.direction,
            weather: self.weather,
            sample,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{Icon, select_icon};

    const CIVIL: &str = r#"{
        "product": "civil",
        "init": "2025052018",
        "dataseries": [
            {
                "timepoint": 3, "cloudcover": 2, "lifted_index": 6,
                "prec_type": "none", "prec_amount": 0, "temp2m": 14,
                "rh2m": "71%", "wind10m": { "direction": "SW", "speed": 2 },
                "weather": "clearnight"
            },
            {
                "timepoint": 6, "cloudcover": 9, "lifted_index": 2,
                "prec_type": "snow", "prec_amount": 5, "temp2m": -1,
                "rh2m": "96%", "wind10m": { "direction": "N", "speed": 3 },
                "weather": "snowday"
            },
            {
                "timepoint": 9, "cloudcover": 6, "lifted_index": -6,
                "prec_type": "rain", "prec_amount": 6, "temp2m": 22,
                "rh2m": 80, "wind10m": { "direction": "E", "speed": 5 },
                "weather": "tsrainday"
            }
        ]
    }"#;

    #[test]
    fn parses_init_and_timepoints() {
        let forecast = parse_civil(CIVIL).unwrap();

        let init = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap().and_hms_opt(18, 0, 0).unwrap();
        assert_eq!(forecast.init, init);
        assert_eq!(forecast.slots.len(), 3);
        assert_eq!(forecast.slots[0].valid_at, init + Duration::hours(3));
        assert_eq!(forecast.slots[2].valid_at.to_string(), "2025-05-21 03:00:00");
    }

    #[test]
    fn maps_bands_to_sample_units() {
        let forecast = parse_civil(CIVIL).unwrap();
        let clear = &forecast.slots[0];

        assert_eq!(clear.sample.cloud_cover_percent, 13);
        assert_eq!(clear.sample.humidity_percent, 71);
        assert_eq!(clear.sample.wind_speed, 1.85);
        assert_eq!(clear.sample.is_snow, Some(false));
        assert_eq!(clear.wind_direction, "SW");
        assert_eq!(clear.weather, "clearnight");
        assert_eq!(clear.temperature_c, 14.0);

        let stormy = &forecast.slots[2];
        assert_eq!(stormy.sample.humidity_percent, 80);
        assert!(stormy.sample.wind_speed > 10.8);
    }

    #[test]
    fn parsed_samples_select_expected_icons() {
        let forecast = parse_civil(CIVIL).unwrap();
        let icons: Vec<_> = forecast.slots.iter().map(|s| select_icon(&s.sample)).collect();

        assert_eq!(icons, [Icon::Clear, Icon::Snow, Icon::Windy]);
    }

    #[test]
    fn missing_prec_type_leaves_snow_unknown() {
        let body = r#"{"init":"2025010100","dataseries":[{
            "timepoint": 3, "cloudcover": 1, "lifted_index": 2, "prec_amount": 0,
            "temp2m": 1, "rh2m": "50%", "wind10m": {"direction": "S", "speed": 1},
            "weather": "clearday"
        }]}"#;

        let forecast = parse_civil(body).unwrap();
        assert_eq!(forecast.slots[0].sample.is_snow, None);
    }

    #[test]
    fn rejects_bad_init() {
        for init in ["2025052", "2025133018", "2025052025", "20250520ab"] {
            let body = format!(r#"{{"init":"{init}","dataseries":[]}}"#);
            let err = parse_civil(&body).unwrap_err();
            assert!(err.to_string().contains("Invalid forecast init time"), "{init}");
        }
    }

    #[test]
    fn huge_timepoint_is_an_error() {
        let body = r#"{"init":"2025010100","dataseries":[{
            "timepoint": 4294967295, "cloudcover": 1, "lifted_index": 2, "prec_amount": 0,
            "temp2m": 1, "rh2m": "50%", "wind10m": {"direction": "S", "speed": 1},
            "weather": "clearday"
        }]}"#;

        let err = parse_civil(body).unwrap_err();
        assert!(err.to_string().contains("timepoint 4294967295"));
        assert!(format!("{err:#}").contains("out of range"));
    }

    #[test]
    fn rejects_out_of_range_bands() {
        assert!(cloud_cover_percent(0).is_err());
        assert!(cloud_cover_percent(10).is_err());
        assert_eq!(cloud_cover_percent(9).unwrap(), 97);

        assert!(wind_speed_mps(0).is_err());
        assert!(wind_speed_mps(9).is_err());
        assert_eq!(wind_speed_mps(4).unwrap(), 9.4);
    }

    #[test]
    fn invalid_humidity_names_timepoint() {
        let body = r#"{"init":"2025010100","dataseries":[{
            "timepoint": 12, "cloudcover": 1, "lifted_index": 2, "prec_amount": 0,
            "temp2m": 1, "rh2m": "120%", "wind10m": {"direction": "S", "speed": 1},
            "weather": "clearday"
        }]}"#;

        let err = parse_civil(body).unwrap_err();
        assert!(err.to_string().contains("timepoint 12"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_civil("<html>busy</html>").unwrap_err();
        assert!(err.to_string().contains("Failed to parse 7Timer civil JSON"));
    }
}
