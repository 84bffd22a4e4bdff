use csv::{ReaderBuilder, StringRecord, Trim};
use std::{fs::File, io::Read, path::PathBuf};
use tracing::{debug, warn};

use crate::{error::CatalogError, model::Location};

const BUNDLED_CSV: &str = include_str!("../data/city_coordinates.csv");

/// Cities with their coordinates, in file order.
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    /// Parses `longitude,latitude,city,country` rows after a header row.
    ///
    /// Rows that do not have exactly four columns are skipped, as are rows
    /// whose coordinates are not numbers.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut locations = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            // header is line 1
            let line = idx + 2;

            if record.len() != 4 {
                debug!(
                    line,
                    columns = record.len(),
                    "skipping catalog row with wrong column count"
                );
                continue;
            }

            match parse_location(&record) {
                Some(location) => locations.push(location),
                None => warn!(line, "skipping catalog row with invalid coordinates"),
            }
        }

        Ok(Self { locations })
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| CatalogError::Open(path.clone(), e))?;
        let catalog = Self::from_reader(file)?;
        debug!(path = %path.display(), count = catalog.len(), "loaded location catalog");
        Ok(catalog)
    }

    /// The city list shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_reader(BUNDLED_CSV.as_bytes())
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Finds a location by city name or by its "City, Country" label,
    /// ignoring case. The first match in file order wins.
    pub fn find(&self, query: &str) -> Result<&Location, CatalogError> {
        let query = query.trim();
        self.locations
            .iter()
            .find(|l| l.label().eq_ignore_ascii_case(query))
            .or_else(|| self.locations.iter().find(|l| l.city.eq_ignore_ascii_case(query)))
            .ok_or_else(|| CatalogError::UnknownCity(query.to_string()))
    }
}

fn parse_location(record: &StringRecord) -> Option<Location> {
    let longitude = record.get(0)?.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let latitude = record.get(1)?.parse::<f64>().ok().filter(|v| v.is_finite())?;

    Some(Location {
        longitude,
        latitude,
        city: record.get(2)?.to_string(),
        country: record.get(3)?.to_string(),
    })
}

/// Where the CLI gets its location list from.
pub trait CatalogSource {
    fn load(&self) -> Result<LocationCatalog, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct FileCatalog {
    pub path: PathBuf,
}

impl CatalogSource for FileCatalog {
    fn load(&self) -> Result<LocationCatalog, CatalogError> {
        non_empty(LocationCatalog::from_path(&self.path)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl CatalogSource for BundledCatalog {
    fn load(&self) -> Result<LocationCatalog, CatalogError> {
        non_empty(LocationCatalog::bundled()?)
    }
}

fn non_empty(catalog: LocationCatalog) -> Result<LocationCatalog, CatalogError> {
    if catalog.is_empty() { Err(CatalogError::Empty) } else { Ok(catalog) }
}

/// Picks the file catalog when a path is configured, the bundled one otherwise.
pub fn catalog_source(path: Option<PathBuf>) -> Box<dyn CatalogSource> {
    match path {
        Some(path) => Box::new(FileCatalog { path }),
        None => Box::new(BundledCatalog),
    }
}
