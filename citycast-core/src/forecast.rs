//! Turns forecast slots into display cards.

use crate::{
    icon::select_icon,
    model::{Card, Detail, Forecast, ForecastSlot},
};

/// Builds one card for each of the first `limit` slots, in forecast order.
pub fn build_cards(forecast: &Forecast, limit: usize) -> Vec<Card> {
    forecast.slots.iter().take(limit).map(card_for_slot).collect()
}

pub fn card_for_slot(slot: &ForecastSlot) -> Card {
    let wind_kmh = slot.sample.wind_speed * 3.6;

    Card {
        title: slot.valid_at.format("%-d %b %Y %H:%M").to_string(),
        icon: select_icon(&slot.sample),
        details: vec![
            Detail::new("Temperature", format!("{}°C", slot.temperature_c)),
            Detail::new("Weather", slot.weather.as_str()),
            Detail::new("Wind", format!("{} at {wind_kmh:.1} km/h", slot.wind_direction)),
            Detail::new("Humidity", format!("{}%", slot.sample.humidity_percent)),
        ],
    }
}
