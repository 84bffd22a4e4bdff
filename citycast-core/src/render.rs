//! Card output.
//!
//! A [`CardRenderer`] writes a row of forecast cards for one location. The
//! terminal, HTML and JSON renderers all take the asset base used to build
//! icon paths.

use serde::Serialize;
use std::io::{self, Write};

use crate::{
    config::DEFAULT_ASSET_BASE,
    icon::Icon,
    model::{Card, Detail, Location},
};

pub trait CardRenderer {
    fn render(&self, location: &Location, cards: &[Card], out: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }

    pub const fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Text, OutputFormat::Html, OutputFormat::Json]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OutputFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!(
                "Unknown output format '{value}'. Supported formats: text, html, json."
            )),
        }
    }
}

/// Construct the renderer for a format.
pub fn renderer_for(format: OutputFormat, asset_base: &str) -> Box<dyn CardRenderer> {
    let asset_base = asset_base.to_string();
    match format {
        OutputFormat::Text => Box::new(TextRenderer { asset_base }),
        OutputFormat::Html => Box::new(HtmlRenderer { asset_base }),
        OutputFormat::Json => Box::new(JsonRenderer { asset_base }),
    }
}

#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub asset_base: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { asset_base: DEFAULT_ASSET_BASE.to_string() }
    }
}

impl CardRenderer for TextRenderer {
    fn render(&self, location: &Location, cards: &[Card], out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Forecast for {location}")?;

        if cards.is_empty() {
            return writeln!(out, "No forecast data available.");
        }

        for card in cards {
            writeln!(out)?;
            writeln!(out, "== {} ==", card.title)?;
            writeln!(out, "{} ({})", card.icon, card.icon.asset_path(&self.asset_base))?;

            let width = card.details.iter().map(|d| d.label.len()).max().unwrap_or(0);
            for Detail { label, value } in &card.details {
                writeln!(out, "  {:<width$}  {value}", format!("{label}:"), width = width + 1)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    pub asset_base: String,
}

impl CardRenderer for HtmlRenderer {
    fn render(&self, location: &Location, cards: &[Card], out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            r#"<div id="card-container" data-location="{}">"#,
            escape_html(&location.label())
        )?;

        for card in cards {
            writeln!(out, r#"  <div class="card">"#)?;
            writeln!(out, r#"    <div class="card-header">{}</div>"#, escape_html(&card.title))?;
            writeln!(out, r#"    <div class="card-body">"#)?;
            writeln!(
                out,
                r#"      <img src="{}" alt="Weather Icon" title="{}">"#,
                escape_html(&card.icon.asset_path(&self.asset_base)),
                card.icon.description(),
            )?;
            writeln!(out, "      <ul>")?;
            for detail in &card.details {
                writeln!(
                    out,
                    "        <li><strong>{}:</strong> {}</li>",
                    escape_html(&detail.label),
                    escape_html(&detail.value),
                )?;
            }
            writeln!(out, "      </ul>")?;
            writeln!(out, "    </div>")?;
            writeln!(out, "  </div>")?;
        }

        writeln!(out, "</div>")
    }
}

#[derive(Debug, Clone)]
pub struct JsonRenderer {
    pub asset_base: String,
}

#[derive(Serialize)]
struct JsonCard<'a> {
    title: &'a str,
    icon: Icon,
    icon_path: String,
    details: &'a [Detail],
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    location: &'a Location,
    cards: Vec<JsonCard<'a>>,
}

impl CardRenderer for JsonRenderer {
    fn render(&self, location: &Location, cards: &[Card], out: &mut dyn Write) -> io::Result<()> {
        let doc = JsonDocument {
            location,
            cards: cards
                .iter()
                .map(|card| JsonCard {
                    title: &card.title,
                    icon: card.icon,
                    icon_path: card.icon.asset_path(&self.asset_base),
                    details: &card.details,
                })
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
