use super::domain::Station;
use std::cmp::Ordering;

/// Scores closer than this are treated as tied and fall back to distance.
pub const SCORE_TIE_EPSILON: f64 = 0.001;

/// Ranking comparator: `total_score` descending, ties broken by `distance_km` ascending
/// with an unknown distance sorting last.
pub fn compare_stations(a: &Station, b: &Station) -> Ordering {
    if (a.total_score - b.total_score).abs() < SCORE_TIE_EPSILON {
        return sortable_distance(a).total_cmp(&sortable_distance(b));
    }
    b.total_score.total_cmp(&a.total_score)
}

fn sortable_distance(station: &Station) -> f64 {
    station.distance_km.unwrap_or(f64::INFINITY)
}

/// Ranks scored stations best first.
pub fn rank(mut stations: Vec<Station>) -> Vec<Station> {
    sort_by_neighbours(&mut stations, compare_stations);
    stations
}

/// Stable insertion sort; afterwards no adjacent pair compares `Greater`, even when
/// `compare` is not transitive.
pub(crate) fn sort_by_neighbours<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for inserted in 1..items.len() {
        let mut position = inserted;
        while position > 0 && compare(&items[position - 1], &items[position]) == Ordering::Greater
        {
            items.swap(position - 1, position);
            position -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::domain::{Coordinates, StationId};
    use proptest::prelude::*;

    fn scored(id: i64, total_score: f64, distance_km: Option<f64>) -> Station {
        let mut station = Station::new(id, format!("S{id}"), "OP", "Line", Coordinates::default());
        station.total_score = total_score;
        station.distance_km = distance_km;
        station
    }

    fn ids(stations: &[Station]) -> Vec<i64> {
        stations.iter().map(|station| station.id.0).collect()
    }

    #[test]
    fn higher_scores_rank_first() {
        let ranked = rank(vec![
            scored(1, 40.0, Some(1.0)),
            scored(2, 90.0, Some(3.0)),
            scored(3, 65.0, None),
        ]);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn near_ties_break_on_distance_with_unknown_last() {
        let ranked = rank(vec![
            scored(1, 80.0, None),
            scored(2, 80.0005, Some(2.5)),
            scored(3, 80.0, Some(0.4)),
        ]);
        assert_eq!(ids(&ranked), vec![3, 2, 1]);
    }

    #[test]
    fn empty_input_ranks_to_empty_output() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn comparator_is_antisymmetric_for_ties() {
        let a = scored(1, 70.0, Some(1.0));
        let b = scored(2, 70.0002, None);
        assert_eq!(compare_stations(&a, &b), Ordering::Less);
        assert_eq!(compare_stations(&b, &a), Ordering::Greater);
    }

    fn arbitrary_station() -> impl Strategy<Value = (f64, Option<f64>)> {
        (
            prop_oneof![0.0f64..100.0, (0u8..4).prop_map(|step| 50.0 + f64::from(step) * 0.0004)],
            proptest::option::of(0.0f64..30.0),
        )
    }

    proptest! {
        #[test]
        fn ranking_is_an_ordered_permutation(
            entries in proptest::collection::vec(arbitrary_station(), 0..60)
        ) {
            let stations: Vec<Station> = entries
                .iter()
                .enumerate()
                .map(|(index, (score, distance))| scored(index as i64, *score, *distance))
                .collect();

            let ranked = rank(stations.clone());

            let mut input_ids: Vec<StationId> = stations.iter().map(|s| s.id).collect();
            let mut output_ids: Vec<StationId> = ranked.iter().map(|s| s.id).collect();
            input_ids.sort();
            output_ids.sort();
            prop_assert_eq!(input_ids, output_ids);

            for pair in ranked.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert_ne!(compare_stations(a, b), Ordering::Greater);
                if (a.total_score - b.total_score).abs() >= SCORE_TIE_EPSILON {
                    prop_assert!(a.total_score > b.total_score);
                } else {
                    prop_assert!(sortable_distance(a) <= sortable_distance(b));
                }
            }
        }
    }
}
