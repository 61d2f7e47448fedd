use super::aggregate::ScoreAggregator;
use super::domain::{FactorKind, Station, StationId};
use super::group::{self, LineGroup, DEFAULT_GROUP_LIMIT};
use super::order;
use super::strategy::StrategyRegistry;
use super::subsidy::{self, RentDisplay, SubsidySettings};
use super::weights::{RawWeights, WeightSet};
use std::collections::HashSet;

/// Structural problems that stop a ranking request before any scoring happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("station {0} appears more than once in the request")]
    DuplicateStation(StationId),
    #[error("station {0} has no name")]
    MissingName(StationId),
    #[error("group limit must be at least 1")]
    InvalidGroupLimit,
}

/// Request-scoped ranking over one batch of stations.
///
/// Holds no state between calls; inputs are borrowed and every result is a new value.
#[derive(Debug, Clone)]
pub struct RankingPipeline {
    aggregator: ScoreAggregator,
    group_limit: usize,
}

impl Default for RankingPipeline {
    fn default() -> Self {
        Self {
            aggregator: ScoreAggregator::default(),
            group_limit: DEFAULT_GROUP_LIMIT,
        }
    }
}

impl RankingPipeline {
    pub fn new(registry: StrategyRegistry, group_limit: usize) -> Result<Self, RankingError> {
        if group_limit == 0 {
            return Err(RankingError::InvalidGroupLimit);
        }
        Ok(Self {
            aggregator: ScoreAggregator::new(registry),
            group_limit,
        })
    }

    pub fn group_limit(&self) -> usize {
        self.group_limit
    }

    pub fn score_all(
        &self,
        stations: &[Station],
        weights: &RawWeights,
    ) -> Result<Vec<Station>, RankingError> {
        validate(stations)?;
        let weights = weights.normalize();
        log_run(stations.len(), &weights);
        Ok(self.aggregator.score_all(stations, &weights))
    }

    /// Flat view: scored stations, best first.
    pub fn rank(
        &self,
        stations: &[Station],
        weights: &RawWeights,
    ) -> Result<Vec<Station>, RankingError> {
        let scored = self.score_all(stations, weights)?;
        Ok(order::rank(scored))
    }

    /// Line overview: scored stations grouped by line, at most `group_limit` groups.
    pub fn group_by_line(
        &self,
        stations: &[Station],
        weights: &RawWeights,
    ) -> Result<Vec<LineGroup>, RankingError> {
        let scored = self.score_all(stations, weights)?;
        Ok(group::group_by_line(&scored, self.group_limit))
    }

    pub fn rent_display(&self, stations: &[Station], settings: &SubsidySettings) -> Vec<RentDisplay> {
        stations
            .iter()
            .map(|station| subsidy::evaluate(station, settings))
            .collect()
    }
}

/// Rejects requests with blank names or repeated ids.
pub fn validate(stations: &[Station]) -> Result<(), RankingError> {
    let mut seen = HashSet::with_capacity(stations.len());
    for station in stations {
        if station.name.trim().is_empty() {
            return Err(RankingError::MissingName(station.id));
        }
        if !seen.insert(station.id) {
            return Err(RankingError::DuplicateStation(station.id));
        }
    }
    Ok(())
}

fn log_run(count: usize, weights: &WeightSet) {
    tracing::debug!(
        stations = count,
        access = weights.get(FactorKind::Access),
        rent = weights.get(FactorKind::Rent),
        facility = weights.get(FactorKind::Facility),
        safety = weights.get(FactorKind::Safety),
        disaster = weights.get(FactorKind::Disaster),
        "scoring stations"
    );
}
