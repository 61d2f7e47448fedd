use super::domain::{ScoreDetails, Station};
use super::strategy::StrategyRegistry;
use super::weights::WeightSet;

/// Combines per-factor scores into one total per station.
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    registry: StrategyRegistry,
}

impl ScoreAggregator {
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Returns a scored copy of `station`.
    ///
    /// `score_details` always holds every factor. `total_score` is the weighted average over
    /// the factors whose weight is positive; unweighted factors are recorded but ignored.
    pub fn score(&self, station: &Station, weights: &WeightSet) -> Station {
        let mut details = ScoreDetails::new();
        let mut weighted_sum = 0.0;
        let mut active_weight = 0.0;

        for factor in self.registry.factors() {
            let raw = self.registry.score(factor, station);
            details.insert(factor, raw);

            let weight = weights.get(factor);
            if weight > 0.0 {
                weighted_sum += raw * weight;
                active_weight += weight;
            }
        }

        let total_score = if active_weight > 0.0 {
            weighted_sum / active_weight
        } else {
            0.0
        };

        Station {
            score_details: details,
            total_score,
            ..station.clone()
        }
    }

    pub fn score_all(&self, stations: &[Station], weights: &WeightSet) -> Vec<Station> {
        stations
            .iter()
            .map(|station| self.score(station, weights))
            .collect()
    }
}
