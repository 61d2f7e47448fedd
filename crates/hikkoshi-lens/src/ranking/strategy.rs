use super::domain::{FactorKind, Station};
use std::fmt;
use std::sync::Arc;

pub const MAX_SCORE: f64 = 100.0;
pub const MIN_SCORE: f64 = 0.0;

/// Exponential decay rate per kilometer for the access factor.
pub const ACCESS_DECAY_PER_KM: f64 = 0.15;
/// Rent (10k units) at or below which the rent factor is maxed out.
pub const RENT_FLOOR: f64 = 6.0;
/// Score points lost per 10k units of rent above the floor.
pub const RENT_POINTS_PER_UNIT: f64 = 10.0;
/// Rent score when no rent information is available.
pub const RENT_NEUTRAL_SCORE: f64 = 50.0;

pub const FACILITY_PLACEHOLDER: f64 = 75.0;
pub const SAFETY_PLACEHOLDER: f64 = 80.0;
pub const DISASTER_PLACEHOLDER: f64 = 70.0;

/// Pure per-factor scoring function.
pub type ScoreFn = Arc<dyn Fn(&Station) -> f64 + Send + Sync>;

/// Table of one scoring function per factor.
///
/// The table is always complete: it starts from [`StrategyRegistry::standard`] and
/// individual entries can only be replaced, never removed.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: [ScoreFn; FactorKind::COUNT],
}

impl StrategyRegistry {
    pub fn standard() -> Self {
        Self {
            strategies: [
                Arc::new(access_score) as ScoreFn,
                Arc::new(rent_score) as ScoreFn,
                Arc::new(facility_score) as ScoreFn,
                Arc::new(safety_score) as ScoreFn,
                Arc::new(disaster_score) as ScoreFn,
            ],
        }
    }

    /// Swap in a different implementation for one factor.
    pub fn with_strategy<F>(mut self, factor: FactorKind, strategy: F) -> Self
    where
        F: Fn(&Station) -> f64 + Send + Sync + 'static,
    {
        self.strategies[factor.index()] = Arc::new(strategy);
        self
    }

    /// Score a station on one factor, clamped to 0..=100. A NaN result scores zero.
    pub fn score(&self, factor: FactorKind, station: &Station) -> f64 {
        clamp_score((self.strategies[factor.index()])(station))
    }

    pub fn factors(&self) -> [FactorKind; FactorKind::COUNT] {
        FactorKind::ordered()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("factors", &FactorKind::ordered())
            .finish()
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// Closer is better: 100 at the reference point, about 50 at 4.6 km.
///
/// An unknown distance scores as if the station sat on the reference point.
pub fn access_score(station: &Station) -> f64 {
    let distance_km = station.distance_km.unwrap_or(0.0);
    if distance_km == 0.0 {
        return MAX_SCORE;
    }
    clamp_score(MAX_SCORE * (-ACCESS_DECAY_PER_KM * distance_km).exp())
}

/// Cheaper is better: 100 at or below 6 (10k units), 0 at or above 16.
pub fn rent_score(station: &Station) -> f64 {
    match station.resolved_rent() {
        Some(rent) => clamp_score(MAX_SCORE - (rent - RENT_FLOOR) * RENT_POINTS_PER_UNIT),
        None => RENT_NEUTRAL_SCORE,
    }
}

// TODO: replace the three placeholders once the OSM facility, crime statistics and
// hazard map tables are loaded.
pub fn facility_score(_station: &Station) -> f64 {
    FACILITY_PLACEHOLDER
}

pub fn safety_score(_station: &Station) -> f64 {
    SAFETY_PLACEHOLDER
}

pub fn disaster_score(_station: &Station) -> f64 {
    DISASTER_PLACEHOLDER
}
