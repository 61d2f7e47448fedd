use super::domain::{Station, StationId};
use serde::{Deserialize, Serialize, Serializer};

/// Condition a station must meet for the housing allowance to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidyCondition {
    #[default]
    None,
    /// `condition_value` is a radius in kilometers.
    Distance,
    /// `condition_value` is a stop count from the source station.
    Stops,
}

/// Allowance settings supplied with each evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidySettings {
    pub amount: f64,
    pub condition_type: SubsidyCondition,
    #[serde(default)]
    pub condition_value: f64,
}

impl SubsidySettings {
    pub fn new(amount: f64, condition_type: SubsidyCondition, condition_value: f64) -> Self {
        Self {
            amount,
            condition_type,
            condition_value,
        }
    }
}

/// Rent shown to the user, or an explicit marker when no rent is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectiveRent {
    Amount(f64),
    Unknown,
}

impl EffectiveRent {
    pub fn amount(self) -> Option<f64> {
        match self {
            Self::Amount(value) => Some(value),
            Self::Unknown => None,
        }
    }
}

impl Serialize for EffectiveRent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Amount(value) => serializer.serialize_f64(*value),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentDisplay {
    pub station_id: StationId,
    pub effective_rent: EffectiveRent,
    pub market_rent: Option<f64>,
    pub is_subsidized: bool,
}

pub fn is_eligible(station: &Station, settings: &SubsidySettings) -> bool {
    match settings.condition_type {
        SubsidyCondition::None => false,
        SubsidyCondition::Distance => station
            .distance_km
            .is_some_and(|distance| distance <= settings.condition_value),
        SubsidyCondition::Stops => station
            .stops_from_source
            .is_some_and(|stops| f64::from(stops) <= settings.condition_value),
    }
}

/// Rent display for one station; `is_subsidized` reports eligibility.
pub fn evaluate(station: &Station, settings: &SubsidySettings) -> RentDisplay {
    let eligible = is_eligible(station, settings);
    let market_rent = station.resolved_rent();

    let effective_rent = match market_rent {
        Some(rent) if eligible => EffectiveRent::Amount((rent - settings.amount).max(0.0)),
        Some(rent) => EffectiveRent::Amount(rent),
        None => EffectiveRent::Unknown,
    };

    RentDisplay {
        station_id: station.id,
        effective_rent,
        market_rent,
        is_subsidized: eligible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::domain::Coordinates;
    use proptest::prelude::*;

    fn station(distance_km: f64, rent: f64) -> Station {
        Station::new(1, "Kichijoji", "JR", "Chuo", Coordinates::default())
            .with_distance_km(distance_km)
            .with_rent_avg(rent)
    }

    #[test]
    fn distance_condition_applies_within_radius() {
        let settings = SubsidySettings::new(3.0, SubsidyCondition::Distance, 2.0);

        let near = evaluate(&station(1.5, 10.0), &settings);
        assert_eq!(near.effective_rent, EffectiveRent::Amount(7.0));
        assert!(near.is_subsidized);

        let far = evaluate(&station(3.0, 10.0), &settings);
        assert_eq!(far.effective_rent, EffectiveRent::Amount(10.0));
        assert!(!far.is_subsidized);
    }

    #[test]
    fn distance_condition_requires_known_distance() {
        let settings = SubsidySettings::new(3.0, SubsidyCondition::Distance, 2.0);
        let mut unknown = station(0.0, 10.0);
        unknown.distance_km = None;
        assert!(!is_eligible(&unknown, &settings));
    }

    #[test]
    fn stops_condition_uses_stop_count() {
        let settings = SubsidySettings::new(2.0, SubsidyCondition::Stops, 3.0);
        let within = station(8.0, 9.0).with_stops_from_source("Mitaka", 3);
        let beyond = station(8.0, 9.0).with_stops_from_source("Mitaka", 4);
        let radius_only = station(0.5, 9.0);

        assert_eq!(evaluate(&within, &settings).effective_rent, EffectiveRent::Amount(7.0));
        assert!(!is_eligible(&beyond, &settings));
        assert!(!is_eligible(&radius_only, &settings));
    }

    #[test]
    fn subsidy_never_drives_rent_negative() {
        let settings = SubsidySettings::new(12.0, SubsidyCondition::Distance, 5.0);
        let display = evaluate(&station(1.0, 7.5), &settings);
        assert_eq!(display.effective_rent, EffectiveRent::Amount(0.0));
    }

    #[test]
    fn unknown_market_rent_is_reported_explicitly() {
        let settings = SubsidySettings::new(3.0, SubsidyCondition::Distance, 2.0);
        let mut no_rent = station(1.0, 0.0);
        no_rent.rent_avg = None;

        let display = evaluate(&no_rent, &settings);

        assert_eq!(display.effective_rent, EffectiveRent::Unknown);
        assert_eq!(display.market_rent, None);
        let json = serde_json::to_value(&display).expect("display serializes");
        assert_eq!(json["effectiveRent"], "unknown");
        assert_eq!(json["isSubsidized"], true);
    }

    #[test]
    fn settings_deserialize_from_camel_case() {
        let settings: SubsidySettings = serde_json::from_str(
            r#"{"amount": 3, "conditionType": "stops", "conditionValue": 2}"#,
        )
        .expect("settings deserialize");
        assert_eq!(settings, SubsidySettings::new(3.0, SubsidyCondition::Stops, 2.0));
    }

    proptest! {
        #[test]
        fn effective_rent_is_never_negative(
            amount in 0.0f64..50.0,
            rent in 0.01f64..40.0,
            distance in 0.0f64..10.0,
            limit in 0.0f64..10.0,
        ) {
            let settings = SubsidySettings::new(amount, SubsidyCondition::Distance, limit);
            let display = evaluate(&station(distance, rent), &settings);
            let effective = display.effective_rent.amount().expect("rent is known");
            prop_assert!(effective >= 0.0);
        }

        #[test]
        fn no_condition_leaves_rent_unchanged(amount in 0.0f64..50.0, rent in 0.01f64..40.0) {
            let settings = SubsidySettings::new(amount, SubsidyCondition::None, 100.0);
            let display = evaluate(&station(0.0, rent), &settings);
            prop_assert_eq!(display.effective_rent, EffectiveRent::Amount(rent));
            prop_assert!(!display.is_subsidized);
        }
    }
}
