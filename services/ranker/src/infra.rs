use clap::Args;
use hikkoshi_lens::catalog::{CoordinatePolicy, ImportOptions, MarketFilter, StationCatalog};
use hikkoshi_lens::config::AppConfig;
use hikkoshi_lens::error::AppError;
use hikkoshi_lens::ranking::{expand_within_stops, Coordinates, RawWeights, Station, WeightError};
use serde::Serialize;
use std::path::PathBuf;

/// Where stations come from and which of them are candidates.
#[derive(Args, Debug)]
pub(crate) struct SourceArgs {
    /// Station search results as JSON, or CSV when the file ends in .csv
    #[arg(long, short = 's')]
    pub(crate) stations: PathBuf,
    /// Reference point "lat,lon" used to fill in missing distances
    #[arg(long, value_parser = parse_origin, allow_hyphen_values = true)]
    pub(crate) origin: Option<Coordinates>,
    /// Only keep stations within this many kilometres of the reference point
    #[arg(long)]
    pub(crate) radius_km: Option<f64>,
    /// Add stations a few stops along the line from each candidate
    #[arg(long)]
    pub(crate) expand: bool,
    /// Stops to walk in each direction when expanding (implies --expand)
    #[arg(long)]
    pub(crate) stop_range: Option<u32>,
    /// Fail on unreadable station locations instead of placing them at (0, 0)
    #[arg(long)]
    pub(crate) strict_locations: bool,
    /// Market price building type, e.g. mansion
    #[arg(long)]
    pub(crate) building_type: Option<String>,
    /// Market price layout, e.g. 1r_1k_1dk
    #[arg(long)]
    pub(crate) layout: Option<String>,
    /// Lower rent bound for market prices
    #[arg(long, default_value_t = 0.0)]
    pub(crate) min_rent: f64,
    /// Upper rent bound for market prices
    #[arg(long, default_value_t = 0.0)]
    pub(crate) max_rent: f64,
}

impl SourceArgs {
    fn import_options(&self, config: &AppConfig) -> ImportOptions {
        let coordinate_policy = if self.strict_locations {
            CoordinatePolicy::Reject
        } else {
            config.ranking.coordinate_policy
        };

        ImportOptions {
            coordinate_policy,
            origin: self.origin,
            market: MarketFilter {
                building_type: self.building_type.clone(),
                layout: self.layout.clone(),
                min_rent: self.min_rent,
                max_rent: self.max_rent,
            },
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct WeightArgs {
    /// Factor weights such as "access=40,rent=30,safety=30"; omitted means equal weights
    #[arg(long)]
    pub(crate) weights: Option<String>,
}

impl WeightArgs {
    pub(crate) fn raw(&self) -> Result<RawWeights, WeightError> {
        match self.weights.as_deref() {
            Some(pairs) => RawWeights::parse_pairs(pairs),
            None => Ok(RawWeights::new()),
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Print JSON instead of a text listing
    #[arg(long)]
    pub(crate) json: bool,
}

/// Reads the station file and narrows it to the candidate set.
pub(crate) fn load_stations(
    source: &SourceArgs,
    config: &AppConfig,
) -> Result<Vec<Station>, AppError> {
    let options = source.import_options(config);
    let catalog = StationCatalog::from_path(&source.stations, &options)?;
    tracing::info!(
        path = %source.stations.display(),
        stations = catalog.len(),
        "station catalog loaded"
    );

    let nearby: Vec<Station> = match source.radius_km {
        Some(radius) => catalog
            .stations()
            .iter()
            .filter(|station| station.distance_km.is_some_and(|km| km <= radius))
            .cloned()
            .collect(),
        None => catalog.stations().to_vec(),
    };

    if !source.expand && source.stop_range.is_none() {
        return Ok(nearby);
    }

    let range = source.stop_range.unwrap_or(config.ranking.stop_range);
    let expanded = expand_within_stops(&nearby, &catalog.line_directory(), range);
    tracing::info!(
        nearby = nearby.len(),
        expanded = expanded.len(),
        range,
        "expanded candidates along their lines"
    );
    Ok(expanded)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub(crate) fn parse_origin(raw: &str) -> Result<Coordinates, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lon', got '{raw}'"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid latitude '{lat}' ({err})"))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid longitude '{lng}' ({err})"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinates out of range: {lat},{lng}"));
    }
    Ok(Coordinates::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hikkoshi_lens::ranking::FactorKind;

    #[test]
    fn origin_parses_lat_then_lon() {
        let origin = parse_origin(" 35.681236, 139.767125 ").expect("origin parses");
        assert_eq!(origin, Coordinates::new(35.681236, 139.767125));
    }

    #[test]
    fn origin_rejects_swapped_or_malformed_input() {
        assert!(parse_origin("139.76,35.68").is_err());
        assert!(parse_origin("35.68").is_err());
        assert!(parse_origin("north,east").is_err());
    }

    fn weight_args(pairs: Option<&str>) -> WeightArgs {
        WeightArgs {
            weights: pairs.map(str::to_string),
        }
    }

    #[test]
    fn weights_report_the_offending_entry() {
        let err = weight_args(Some("access=40,comfort=10"))
            .raw()
            .expect_err("unknown factor");
        assert_eq!(err, WeightError::UnknownFactor("comfort".to_string()));

        let weights = weight_args(Some("access=40 rent=60"))
            .raw()
            .expect("weights parse");
        assert_eq!(weights.get(FactorKind::Access), 40.0);
        assert!(weight_args(None).raw().expect("defaults").is_empty());
    }

    #[test]
    fn bad_weights_surface_as_application_errors() {
        let result: Result<RawWeights, AppError> =
            weight_args(Some("access=-1")).raw().map_err(AppError::from);
        match result {
            Err(AppError::Weights(WeightError::Negative { factor, .. })) => {
                assert_eq!(factor, FactorKind::Access);
            }
            other => panic!("expected a weight error, got {other:?}"),
        }
    }
}
