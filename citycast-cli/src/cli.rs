use anyhow::Context;
use citycast_core::{
    Config, Location, LocationCatalog, OutputFormat, catalog::catalog_source,
    forecast_cards, provider::provider_from_config, render::renderer_for,
};
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use std::{io, path::PathBuf};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "City weather forecast cards")]
pub struct Cli {
    /// Print debug logs to stderr; takes precedence over RUST_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the cities in the location catalog.
    Cities,

    /// Show forecast cards for a city.
    Show {
        /// City name or "City, Country" label; prompts when absent and no
        /// default city is configured.
        #[arg(long)]
        city: Option<String>,

        /// Output format: text, html or json.
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: OutputFormat,

        /// Number of cards; defaults to `forecast.max_cards` from the config.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Configure the city catalog, default city and icon asset base.
    Configure,
}

fn parse_format(value: &str) -> anyhow::Result<OutputFormat> {
    OutputFormat::try_from(value)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Cities => {
                let catalog = load_catalog(&config)?;
                for location in catalog.locations() {
                    println!(
                        "{:<32} {:>9.4} {:>9.4}",
                        location.label(),
                        location.longitude,
                        location.latitude
                    );
                }
            }
            Command::Show { city, format, limit } => {
                let catalog = load_catalog(&config)?;
                let location = match city.or_else(|| config.default_city.clone()) {
                    Some(name) => catalog.find(&name)?.clone(),
                    None => prompt_city(&catalog)?,
                };

                let provider = provider_from_config(&config)?;
                let limit = limit.unwrap_or(config.forecast.max_cards);
                info!(%location, limit, "fetching forecast");

                let cards = forecast_cards(provider.as_ref(), &location, limit).await?;

                let renderer = renderer_for(format, &config.render.asset_base);
                renderer
                    .render(&location, &cards, &mut io::stdout().lock())
                    .context("Failed to write forecast cards")?;
            }
            Command::Configure => {
                configure(&mut config)?;
                config.save()?;
                println!("Saved configuration to {}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn load_catalog(config: &Config) -> anyhow::Result<LocationCatalog> {
    let catalog = catalog_source(config.catalog_path.clone())
        .load()
        .context("Failed to load location catalog")?;
    Ok(catalog)
}

fn prompt_city(catalog: &LocationCatalog) -> anyhow::Result<Location> {
    Select::new("Choose a city:", catalog.locations().to_vec())
        .with_page_size(12)
        .prompt()
        .context("City selection cancelled")
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let current_path = config
        .catalog_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let path = Text::new("City catalog CSV (leave empty for the bundled list):")
        .with_default(&current_path)
        .prompt()
        .context("Configuration cancelled")?;
    let path = path.trim();
    config.catalog_path = (!path.is_empty()).then(|| PathBuf::from(path));

    let catalog = load_catalog(config)?;

    const NO_DEFAULT: &str = "(ask every time)";
    let mut choices = vec![NO_DEFAULT.to_string()];
    choices.extend(catalog.locations().iter().map(Location::label));

    let choice = Select::new("Default city:", choices)
        .with_page_size(12)
        .prompt()
        .context("Configuration cancelled")?;
    config.default_city = (choice != NO_DEFAULT).then_some(choice);

    let asset_base = Text::new("Icon asset base path:")
        .with_default(&config.render.asset_base)
        .prompt()
        .context("Configuration cancelled")?;
    config.render.asset_base = asset_base.trim().to_string();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_arguments() {
        let cli = Cli::try_parse_from([
            "citycast", "-v", "show", "--city", "Paris", "--format", "html", "--limit", "3",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Show { city, format, limit } => {
                assert_eq!(city.as_deref(), Some("Paris"));
                assert_eq!(format, OutputFormat::Html);
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_defaults_to_text() {
        let cli = Cli::try_parse_from(["citycast", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Show { city: None, format: OutputFormat::Text, limit: None }
        ));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["citycast", "show", "--format", "pdf"]).is_err());
    }
}
