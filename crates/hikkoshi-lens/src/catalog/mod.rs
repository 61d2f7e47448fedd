//! Normalizes raw station records from the search collaborator into [`Station`]s.

mod location;
mod market;
mod parser;

pub use location::{parse_wkt_point, LocationField};
pub use market::MarketFilter;
pub use parser::StationRecord;

use crate::ranking::{
    domain::mean_positive_rent, haversine_km, Coordinates, InMemoryLineDirectory, Station,
    StationId,
};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read station data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid station CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid station JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("station {station_id} has an unusable location '{raw}'")]
    MalformedLocation { station_id: StationId, raw: String },
    #[error("record {row} is missing a station name")]
    MissingIdentifier { row: usize },
    #[error("station {0} appears more than once")]
    DuplicateStation(StationId),
    #[error("station {station_id} has a non-finite {field}")]
    NonFiniteValue {
        station_id: StationId,
        field: &'static str,
    },
}

/// What to do with a record whose location cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Substitute (0, 0) and log a warning.
    #[default]
    Fallback,
    /// Fail the import.
    Reject,
}

impl FromStr for CoordinatePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "reject" => Ok(Self::Reject),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for CoordinatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fallback => f.write_str("fallback"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub coordinate_policy: CoordinatePolicy,
    /// Reference point used to fill in missing distances.
    pub origin: Option<Coordinates>,
    pub market: MarketFilter,
}

/// Normalized stations from one search response.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: &ImportOptions,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            Self::from_csv_reader(file, options)
        } else {
            Self::from_json_reader(file, options)
        }
    }

    pub fn from_json_reader<R: Read>(
        reader: R,
        options: &ImportOptions,
    ) -> Result<Self, CatalogError> {
        Self::from_records(parser::parse_json(reader)?, options)
    }

    pub fn from_csv_reader<R: Read>(
        reader: R,
        options: &ImportOptions,
    ) -> Result<Self, CatalogError> {
        Self::from_records(parser::parse_csv(reader)?, options)
    }

    pub fn from_records(
        records: Vec<StationRecord>,
        options: &ImportOptions,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut stations = Vec::with_capacity(records.len());

        for (row, record) in records.into_iter().enumerate() {
            let station = normalize_record(row, record, options)?;
            if !seen.insert(station.id) {
                return Err(CatalogError::DuplicateStation(station.id));
            }
            stations.push(station);
        }

        Ok(Self { stations })
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Lines in file order, for stop-range expansion over the same data set.
    pub fn line_directory(&self) -> InMemoryLineDirectory {
        InMemoryLineDirectory::from_stations(&self.stations)
    }
}

fn normalize_record(
    row: usize,
    record: StationRecord,
    options: &ImportOptions,
) -> Result<Station, CatalogError> {
    let name = record.name.trim();
    if name.is_empty() {
        return Err(CatalogError::MissingIdentifier { row });
    }
    let id = StationId(record.id);

    let raw_location = record
        .location
        .as_ref()
        .map(LocationField::raw)
        .unwrap_or_default();
    let parsed = record.location.as_ref().and_then(LocationField::coordinates);
    let coordinates = match (parsed, options.coordinate_policy) {
        (Some(coordinates), _) => Some(coordinates),
        (None, CoordinatePolicy::Fallback) => {
            tracing::warn!(
                station = %id,
                location = %raw_location,
                "unusable station location, defaulting to (0, 0)"
            );
            None
        }
        (None, CoordinatePolicy::Reject) => {
            return Err(CatalogError::MalformedLocation {
                station_id: id,
                raw: raw_location,
            });
        }
    };

    for (field, value) in [
        ("distance", record.distance_meters),
        ("rent_avg", record.rent_avg),
    ] {
        if value.is_some_and(|value| !value.is_finite()) {
            return Err(CatalogError::NonFiniteValue {
                station_id: id,
                field,
            });
        }
    }

    // A zero or missing distance is recomputed from the origin, but only from real
    // coordinates; a (0, 0) fallback never yields a distance.
    let reported = record.distance_meters.filter(|meters| *meters != 0.0);
    let distance_km = match (reported, options.origin, coordinates) {
        (Some(meters), _, _) => Some(meters / 1000.0),
        (None, Some(origin), Some(coordinates)) => Some(haversine_km(origin, coordinates)),
        _ => record.distance_meters.map(|meters| meters / 1000.0),
    };

    let market_prices = options.market.retain(record.market_prices);
    let rent_avg = options
        .market
        .matching_rent(&market_prices)
        .or_else(|| record.rent_avg.filter(|rent| *rent > 0.0))
        .or_else(|| mean_positive_rent(&market_prices));

    let mut station = Station::new(
        id.0,
        name,
        record.operator_code.unwrap_or_default(),
        record.line_name.unwrap_or_default(),
        coordinates.unwrap_or_default(),
    );
    station.distance_km = distance_km;
    station.rent_avg = rent_avg;
    station.market_prices = market_prices;
    station.is_nearby = record.is_nearby;
    station.source_station = record.source_station;
    station.stops_from_source = record.stops_from_source;

    Ok(station)
}
