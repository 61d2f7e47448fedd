//! Widening a radius search to stations a few stops along each nearby station's line.

use super::domain::{Station, StationId};
use std::collections::{HashMap, HashSet};

/// Default number of stops on either side of a nearby station.
pub const DEFAULT_STOP_RANGE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("line {operator_code}/{line_name} is unknown")]
    UnknownLine {
        operator_code: String,
        line_name: String,
    },
    #[error("line directory unavailable: {0}")]
    Unavailable(String),
}

/// Source of the stations on a line, in track order.
pub trait LineDirectory {
    fn stations_on_line(
        &self,
        operator_code: &str,
        line_name: &str,
    ) -> Result<Vec<Station>, DirectoryError>;
}

/// Directory backed by station lists already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLineDirectory {
    lines: HashMap<(String, String), Vec<Station>>,
}

impl InMemoryLineDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_line(
        &mut self,
        operator_code: impl Into<String>,
        line_name: impl Into<String>,
        stations: Vec<Station>,
    ) {
        self.lines
            .insert((operator_code.into(), line_name.into()), stations);
    }

    /// Builds lines from a flat list, taking each line's stations in the order given.
    pub fn from_stations(stations: &[Station]) -> Self {
        let mut directory = Self::new();
        for station in stations {
            directory
                .lines
                .entry((station.operator_code.clone(), station.line_name.clone()))
                .or_default()
                .push(station.clone());
        }
        directory
    }
}

impl LineDirectory for InMemoryLineDirectory {
    fn stations_on_line(
        &self,
        operator_code: &str,
        line_name: &str,
    ) -> Result<Vec<Station>, DirectoryError> {
        self.lines
            .get(&(operator_code.to_string(), line_name.to_string()))
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownLine {
                operator_code: operator_code.to_string(),
                line_name: line_name.to_string(),
            })
    }
}

/// Adds the stations within `range` stops of every nearby station.
///
/// Nearby stations come first, in input order, flagged `is_nearby`. Added stations record
/// which nearby station pulled them in and how many stops away they are. A station already
/// present keeps its first entry. Lines the directory cannot serve are skipped.
pub fn expand_within_stops<D>(nearby: &[Station], directory: &D, range: u32) -> Vec<Station>
where
    D: LineDirectory + ?Sized,
{
    let mut seen: HashSet<StationId> = HashSet::new();
    let mut expanded = Vec::with_capacity(nearby.len());

    for station in nearby {
        if seen.insert(station.id) {
            expanded.push(Station {
                is_nearby: Some(true),
                source_station: None,
                stops_from_source: None,
                ..station.clone()
            });
        }
    }

    for source in nearby {
        let line = match directory.stations_on_line(&source.operator_code, &source.line_name) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(station = %source.id, error = %err, "skipping stop expansion");
                continue;
            }
        };

        let Some(window) = stop_window(&line, source.id, range) else {
            tracing::warn!(
                station = %source.id,
                line = %source.line_name,
                "station missing from its own line, skipping stop expansion"
            );
            continue;
        };

        for (station, stops) in window {
            if !seen.insert(station.id) {
                continue;
            }
            expanded.push(Station {
                is_nearby: Some(false),
                source_station: Some(source.name.clone()),
                stops_from_source: Some(stops),
                ..station.clone()
            });
        }
    }

    expanded
}

/// The stations within `range` stops of `target` on `line`, in line order.
///
/// Every returned station carries its stop count from the target, the target itself zero.
/// When the target is not on the line, only the target is returned.
pub fn stations_within_stops(target: &Station, line: &[Station], range: u32) -> Vec<Station> {
    match stop_window(line, target.id, range) {
        Some(window) => window
            .map(|(station, stops)| Station {
                is_nearby: Some(stops == 0),
                source_station: Some(target.name.clone()),
                stops_from_source: Some(stops),
                ..station.clone()
            })
            .collect(),
        None => vec![target.clone()],
    }
}

fn stop_window(
    line: &[Station],
    center: StationId,
    range: u32,
) -> Option<impl Iterator<Item = (&Station, u32)>> {
    let center_index = line.iter().position(|station| station.id == center)?;
    let range = range as usize;
    let start = center_index.saturating_sub(range);
    let end = center_index.saturating_add(range).min(line.len() - 1);

    Some(
        line[start..=end]
            .iter()
            .enumerate()
            .map(move |(offset, station)| {
                let index = start + offset;
                (station, index.abs_diff(center_index) as u32)
            }),
    )
}
