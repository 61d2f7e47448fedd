use crate::ranking::MarketPrice;
use serde::{Deserialize, Serialize};

/// Building type, layout, and rent bounds narrowing a station's market prices.
///
/// Bounds at or below zero are unbounded. The filter only applies when both the building
/// type and the layout are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketFilter {
    pub building_type: Option<String>,
    pub layout: Option<String>,
    #[serde(default)]
    pub min_rent: f64,
    #[serde(default)]
    pub max_rent: f64,
}

impl MarketFilter {
    fn target(&self) -> Option<(&str, &str)> {
        match (self.building_type.as_deref(), self.layout.as_deref()) {
            (Some(building_type), Some(layout))
                if !building_type.is_empty() && !layout.is_empty() =>
            {
                Some((building_type, layout))
            }
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.target().is_some()
    }

    fn matches(&self, price: &MarketPrice) -> bool {
        self.target().is_some_and(|(building_type, layout)| {
            price.building_type == building_type && price.layout == layout
        })
    }

    fn within_bounds(&self, rent: f64) -> bool {
        (self.min_rent <= 0.0 || rent >= self.min_rent)
            && (self.max_rent <= 0.0 || rent <= self.max_rent)
    }

    /// Keeps the prices matching building type, layout, and rent bounds.
    pub fn retain(&self, prices: Vec<MarketPrice>) -> Vec<MarketPrice> {
        if !self.is_active() {
            return prices;
        }
        prices
            .into_iter()
            .filter(|price| self.matches(price) && self.within_bounds(price.rent))
            .collect()
    }

    /// Rent of the first price matching building type and layout.
    pub fn matching_rent(&self, prices: &[MarketPrice]) -> Option<f64> {
        prices
            .iter()
            .find(|price| self.matches(price))
            .map(|price| price.rent)
    }
}
