//! Core library for the `citycast` CLI.
//!
//! This crate defines:
//! - Weather icon selection for a forecast sample
//! - The CSV location catalog
//! - Abstraction over forecast providers (7Timer! civil product)
//! - Forecast cards and their renderers
//! - Configuration handling
//!
//! It is used by `citycast-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast;
pub mod icon;
pub mod model;
pub mod provider;
pub mod render;

pub use catalog::{CatalogSource, LocationCatalog};
pub use config::{Config, ForecastConfig, RenderConfig};
pub use error::{CatalogError, SampleError};
pub use forecast::build_cards;
pub use icon::{Icon, select_icon};
pub use model::{Card, Detail, Forecast, ForecastSample, ForecastSlot, Location};
pub use provider::ForecastProvider;
pub use render::{CardRenderer, OutputFormat};

/// Fetches the forecast for `location` and turns its first `limit` slots
/// into cards.
pub async fn forecast_cards(
    provider: &dyn ForecastProvider,
    location: &Location,
    limit: usize,
) -> anyhow::Result<Vec<Card>> {
    let forecast = provider.get_forecast(location).await?;
    Ok(build_cards(&forecast, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct FixedProvider(Forecast);

    #[async_trait]
    impl ForecastProvider for FixedProvider {
        async fn get_forecast(&self, _location: &Location) -> anyhow::Result<Forecast> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl ForecastProvider for FailingProvider {
        async fn get_forecast(&self, location: &Location) -> anyhow::Result<Forecast> {
            Err(anyhow::anyhow!("service unavailable for {location}"))
        }
    }

    fn location() -> Location {
        Location {
            longitude: 10.75,
            latitude: 59.91,
            city: "Oslo".into(),
            country: "Norway".into(),
        }
    }

    fn slot(timepoint: u32, sample: ForecastSample) -> ForecastSlot {
        let init = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        ForecastSlot {
            timepoint,
            valid_at: init + chrono::Duration::hours(i64::from(timepoint)),
            temperature_c: -3.0,
            wind_direction: "N".into(),
            weather: "snowday".into(),
            sample,
        }
    }

    #[tokio::test]
    async fn cards_from_provider() {
        let snowy = ForecastSample {
            cloud_cover_percent: 97,
            precipitation_rate: 5.0,
            humidity_percent: 85,
            lifted_index: 4.0,
            wind_speed: 1.85,
            is_snow: Some(true),
        };
        let gusty = ForecastSample { wind_speed: 14.0, ..snowy };

        let forecast = Forecast {
            init: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            slots: vec![slot(3, snowy), slot(6, gusty), slot(9, snowy)],
        };

        let cards = forecast_cards(&FixedProvider(forecast), &location(), 2).await.unwrap();
        let icons: Vec<_> = cards.iter().map(|c| c.icon).collect();
        assert_eq!(icons, [Icon::Snow, Icon::Windy]);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let err = forecast_cards(&FailingProvider, &location(), 7).await.unwrap_err();
        assert!(err.to_string().contains("Oslo, Norway"));
    }
}
