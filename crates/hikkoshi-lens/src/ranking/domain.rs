use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier wrapper for stations returned by the search collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub i64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scoring dimensions understood by the strategy registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Access,
    Rent,
    Facility,
    Safety,
    Disaster,
}

impl FactorKind {
    pub const COUNT: usize = 5;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Access,
            Self::Rent,
            Self::Facility,
            Self::Safety,
            Self::Disaster,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Rent => "rent",
            Self::Facility => "facility",
            Self::Safety => "safety",
            Self::Disaster => "disaster",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FactorKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|factor| factor.key() == normalized)
            .ok_or_else(|| value.trim().to_string())
    }
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Observed rent for one building type and layout near a station, in 10k currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    #[serde(default)]
    pub building_type: String,
    #[serde(default)]
    pub layout: String,
    pub rent: f64,
}

/// Per-factor scores keyed by factor, each within 0..=100.
pub type ScoreDetails = BTreeMap<FactorKind, f64>;

/// Transit stop candidate carried through a single ranking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    #[serde(default)]
    pub line_name: String,
    #[serde(default)]
    pub operator_code: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub market_prices: Vec<MarketPrice>,
    #[serde(default)]
    pub score_details: ScoreDetails,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nearby: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_station: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops_from_source: Option<u32>,
}

impl Station {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        operator_code: impl Into<String>,
        line_name: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            id: StationId(id),
            name: name.into(),
            line_name: line_name.into(),
            operator_code: operator_code.into(),
            coordinates,
            distance_km: None,
            rent_avg: None,
            market_prices: Vec::new(),
            score_details: ScoreDetails::new(),
            total_score: 0.0,
            is_nearby: None,
            source_station: None,
            stops_from_source: None,
        }
    }

    pub fn with_distance_km(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }

    pub fn with_rent_avg(mut self, rent_avg: f64) -> Self {
        self.rent_avg = Some(rent_avg);
        self
    }

    pub fn with_market_prices(mut self, market_prices: Vec<MarketPrice>) -> Self {
        self.market_prices = market_prices;
        self
    }

    pub fn with_stops_from_source(mut self, source: impl Into<String>, stops: u32) -> Self {
        self.is_nearby = Some(false);
        self.source_station = Some(source.into());
        self.stops_from_source = Some(stops);
        self
    }

    /// Average rent used for scoring and display.
    ///
    /// A positive `rent_avg` wins; otherwise the mean of the positive market price rents.
    /// Returns `None` when neither source carries a usable value.
    pub fn resolved_rent(&self) -> Option<f64> {
        if let Some(rent) = self.rent_avg.filter(|rent| *rent > 0.0) {
            return Some(rent);
        }
        mean_positive_rent(&self.market_prices)
    }

    /// Grouping key used by the line overview.
    pub fn line_key(&self) -> (&str, &str) {
        (self.operator_code.as_str(), self.line_name.as_str())
    }
}

pub(crate) fn mean_positive_rent(prices: &[MarketPrice]) -> Option<f64> {
    let (total, count) = prices
        .iter()
        .map(|price| price.rent)
        .filter(|rent| *rent > 0.0)
        .fold((0.0, 0usize), |(total, count), rent| (total + rent, count + 1));

    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}
