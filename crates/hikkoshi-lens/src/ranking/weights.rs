use super::domain::FactorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total every normalized weight set sums to.
pub const WEIGHT_TOTAL: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("weight for {factor} must not be negative (got {value})")]
    Negative { factor: FactorKind, value: f64 },
    #[error("weight for {factor} must be a finite number")]
    NotFinite { factor: FactorKind },
    #[error("unknown scoring factor '{0}'")]
    UnknownFactor(String),
    #[error("malformed weight entry '{0}', expected factor=value")]
    Malformed(String),
}

/// User supplied factor weights on an arbitrary scale.
///
/// Factors left out count as zero. Construction rejects negative and non-finite values,
/// so every `RawWeights` can be normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct RawWeights {
    values: BTreeMap<FactorKind, f64>,
}

impl RawWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, factor: FactorKind, value: f64) -> Result<(), WeightError> {
        if !value.is_finite() {
            return Err(WeightError::NotFinite { factor });
        }
        if value < 0.0 {
            return Err(WeightError::Negative { factor, value });
        }
        self.values.insert(factor, value);
        Ok(())
    }

    pub fn with(mut self, factor: FactorKind, value: f64) -> Result<Self, WeightError> {
        self.set(factor, value)?;
        Ok(self)
    }

    pub fn get(&self, factor: FactorKind) -> f64 {
        self.values.get(&factor).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses `access=30,rent=20` style input; whitespace also separates entries.
    pub fn parse_pairs(raw: &str) -> Result<Self, WeightError> {
        let mut weights = Self::new();
        for entry in raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|entry| !entry.is_empty())
        {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| WeightError::Malformed(entry.to_string()))?;
            let factor = key.parse::<FactorKind>().map_err(WeightError::UnknownFactor)?;
            let value = value
                .trim()
                .parse::<f64>()
                .map_err(|_| WeightError::Malformed(entry.to_string()))?;
            weights.set(factor, value)?;
        }
        Ok(weights)
    }

    pub fn normalize(&self) -> WeightSet {
        normalize(self)
    }
}

impl TryFrom<BTreeMap<String, f64>> for RawWeights {
    type Error = WeightError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut weights = Self::new();
        for (key, value) in raw {
            let factor = key.parse::<FactorKind>().map_err(WeightError::UnknownFactor)?;
            weights.set(factor, value)?;
        }
        Ok(weights)
    }
}

impl From<RawWeights> for BTreeMap<String, f64> {
    fn from(weights: RawWeights) -> Self {
        weights
            .values
            .into_iter()
            .map(|(factor, value)| (factor.key().to_string(), value))
            .collect()
    }
}

/// Weights rescaled to a 100-sum distribution over every factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSet {
    values: [f64; FactorKind::COUNT],
}

impl WeightSet {
    pub fn equal_split() -> Self {
        Self {
            values: [WEIGHT_TOTAL / FactorKind::COUNT as f64; FactorKind::COUNT],
        }
    }

    pub fn get(&self, factor: FactorKind) -> f64 {
        self.values[factor.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactorKind, f64)> + '_ {
        FactorKind::ordered()
            .into_iter()
            .map(move |factor| (factor, self.get(factor)))
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Sum over the factors that carry weight.
    pub fn active_total(&self) -> f64 {
        self.values.iter().filter(|weight| **weight > 0.0).sum()
    }
}

pub fn normalize(raw: &RawWeights) -> WeightSet {
    let largest = FactorKind::ordered()
        .into_iter()
        .map(|factor| raw.get(factor))
        .fold(0.0, f64::max);

    if largest <= 0.0 {
        return WeightSet::equal_split();
    }

    // Relative to the largest weight first, so the sum stays finite near f64::MAX.
    let mut values = [0.0; FactorKind::COUNT];
    for factor in FactorKind::ordered() {
        values[factor.index()] = raw.get(factor) / largest;
    }
    let scale = WEIGHT_TOTAL / values.iter().sum::<f64>();
    for value in &mut values {
        *value *= scale;
    }
    WeightSet { values }
}
