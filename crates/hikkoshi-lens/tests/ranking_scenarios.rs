use approx::assert_relative_eq;
use hikkoshi_lens::ranking::{
    Coordinates, EffectiveRent, FactorKind, RankingPipeline, RawWeights, Station,
    SubsidyCondition, SubsidySettings,
};

fn station(id: i64, name: &str, line: &str, distance_km: f64) -> Station {
    Station::new(id, name, "JR", line, Coordinates::new(35.68, 139.76)).with_distance_km(distance_km)
}

#[test]
fn access_only_weights_rank_by_distance() {
    let weights = RawWeights::new()
        .with(FactorKind::Access, 100.0)
        .expect("valid weight");
    let stations = vec![
        station(2, "Far", "Chuo", 5.0),
        station(1, "Here", "Chuo", 0.0),
    ];

    let ranked = RankingPipeline::default()
        .rank(&stations, &weights)
        .expect("ranking succeeds");

    assert_eq!(ranked[0].name, "Here");
    assert_relative_eq!(ranked[0].total_score, 100.0);
    assert_eq!(ranked[1].name, "Far");
    assert_relative_eq!(ranked[1].total_score, 47.2366, epsilon = 1e-3);
    assert!(ranked
        .iter()
        .all(|station| station.score_details.len() == FactorKind::COUNT));
}

#[test]
fn weights_near_the_float_limit_still_score() {
    let weights = RawWeights::parse_pairs("access=1e308,facility=1e308").expect("weights parse");
    let stations = vec![
        station(2, "Far", "Chuo", 5.0),
        station(1, "Here", "Chuo", 0.0),
    ];

    let ranked = RankingPipeline::default()
        .rank(&stations, &weights)
        .expect("ranking succeeds");

    // Equal halves of access and the facility placeholder (75).
    assert_relative_eq!(ranked[0].total_score, 87.5, epsilon = 1e-9);
    assert_relative_eq!(ranked[1].total_score, 61.1183, epsilon = 1e-3);
}

#[test]
fn empty_weights_average_every_factor() {
    let stations = vec![station(1, "Cheap", "Chuo", 0.0).with_rent_avg(6.0)];

    let ranked = RankingPipeline::default()
        .rank(&stations, &RawWeights::new())
        .expect("ranking succeeds");

    assert_relative_eq!(ranked[0].total_score, 85.0, epsilon = 1e-9);
    assert_eq!(ranked[0].score_details[&FactorKind::Facility], 75.0);
    assert_eq!(ranked[0].score_details[&FactorKind::Safety], 80.0);
    assert_eq!(ranked[0].score_details[&FactorKind::Disaster], 70.0);
}

#[test]
fn distance_subsidy_only_applies_inside_threshold() {
    let settings = SubsidySettings::new(3.0, SubsidyCondition::Distance, 2.0);
    let stations = vec![
        station(1, "Close", "Chuo", 1.5).with_rent_avg(10.0),
        station(2, "Beyond", "Chuo", 3.0).with_rent_avg(10.0),
        station(3, "Unpriced", "Chuo", 1.0),
    ];

    let displays = RankingPipeline::default().rent_display(&stations, &settings);

    assert_eq!(displays[0].effective_rent, EffectiveRent::Amount(7.0));
    assert!(displays[0].is_subsidized);
    assert_eq!(displays[1].effective_rent, EffectiveRent::Amount(10.0));
    assert!(!displays[1].is_subsidized);
    assert_eq!(displays[2].effective_rent, EffectiveRent::Unknown);
    assert_eq!(displays[2].market_rent, None);
}

#[test]
fn line_overview_keeps_the_ten_best_lines() {
    let weights = RawWeights::new()
        .with(FactorKind::Access, 1.0)
        .expect("valid weight");
    // Worst lines first so input order cannot explain the result.
    let stations: Vec<Station> = (0..12)
        .rev()
        .map(|index| {
            station(
                index,
                &format!("Station {index}"),
                &format!("Line {index}"),
                index as f64,
            )
        })
        .collect();

    let groups = RankingPipeline::default()
        .group_by_line(&stations, &weights)
        .expect("grouping succeeds");

    assert_eq!(groups.len(), 10);
    let lines: Vec<&str> = groups.iter().map(|group| group.line_name.as_str()).collect();
    let expected: Vec<String> = (0..10).map(|index| format!("Line {index}")).collect();
    assert_eq!(lines, expected);
}

#[test]
fn ties_fall_back_to_distance_with_unknown_last() {
    let weights = RawWeights::new()
        .with(FactorKind::Rent, 1.0)
        .expect("valid weight");
    let unknown = Station::new(3, "Unknown", "JR", "Chuo", Coordinates::default()).with_rent_avg(8.0);
    let stations = vec![
        unknown,
        station(2, "Further", "Chuo", 2.0).with_rent_avg(8.0),
        station(1, "Nearer", "Chuo", 1.0).with_rent_avg(8.0),
    ];

    let ranked = RankingPipeline::default()
        .rank(&stations, &weights)
        .expect("ranking succeeds");

    let names: Vec<&str> = ranked.iter().map(|station| station.name.as_str()).collect();
    assert_eq!(names, ["Nearer", "Further", "Unknown"]);
}
