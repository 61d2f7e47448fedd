//! Multi-factor station scoring, ranking, line grouping, and subsidy-adjusted rent.

pub mod aggregate;
pub mod distance;
pub mod domain;
pub mod expansion;
pub mod group;
pub mod order;
pub mod pipeline;
pub mod strategy;
pub mod subsidy;
pub mod weights;

pub use aggregate::ScoreAggregator;
pub use distance::{haversine_km, haversine_meters, EARTH_RADIUS_METERS};
pub use domain::{Coordinates, FactorKind, MarketPrice, ScoreDetails, Station, StationId};
pub use expansion::{
    expand_within_stops, stations_within_stops, DirectoryError, InMemoryLineDirectory,
    LineDirectory, DEFAULT_STOP_RANGE,
};
pub use group::{group_by_line, LineGroup, DEFAULT_GROUP_LIMIT};
pub use order::{compare_stations, rank, SCORE_TIE_EPSILON};
pub use pipeline::{RankingError, RankingPipeline};
pub use strategy::{ScoreFn, StrategyRegistry};
pub use subsidy::{EffectiveRent, RentDisplay, SubsidyCondition, SubsidySettings};
pub use weights::{RawWeights, WeightError, WeightSet};
