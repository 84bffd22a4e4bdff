use crate::{Config, Forecast, Location, provider::seventimer::SevenTimerProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod seventimer;

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn get_forecast(&self, location: &Location) -> anyhow::Result<Forecast>;
}

/// Construct the forecast provider described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let provider = SevenTimerProvider::new(
        config.forecast.base_url.clone(),
        std::time::Duration::from_secs(config.forecast.timeout_secs),
    )?;

    Ok(Box::new(provider))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
