use super::domain::Station;
use super::order::{compare_stations, rank, sort_by_neighbours};
use serde::Serialize;
use std::collections::HashMap;

/// Number of line groups returned by the line overview.
pub const DEFAULT_GROUP_LIMIT: usize = 10;

/// Stations sharing an operator and line, best member first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGroup {
    pub operator_code: String,
    pub line_name: String,
    pub members: Vec<Station>,
}

impl LineGroup {
    pub fn top(&self) -> Option<&Station> {
        self.members.first()
    }
}

/// Groups stations by `(operator_code, line_name)` and keeps the best `limit` groups.
///
/// Members are ordered with the ranking comparator, and groups are ordered by comparing
/// their top members with the same comparator.
pub fn group_by_line(stations: &[Station], limit: usize) -> Vec<LineGroup> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut partitions: Vec<Vec<Station>> = Vec::new();

    for station in stations {
        let slot = *index.entry(station.line_key()).or_insert_with(|| {
            partitions.push(Vec::new());
            partitions.len() - 1
        });
        partitions[slot].push(station.clone());
    }

    let mut groups: Vec<LineGroup> = partitions
        .into_iter()
        .filter(|members| !members.is_empty())
        .map(|members| {
            let members = rank(members);
            LineGroup {
                operator_code: members[0].operator_code.clone(),
                line_name: members[0].line_name.clone(),
                members,
            }
        })
        .collect();

    sort_by_neighbours(&mut groups, |a, b| compare_stations(&a.members[0], &b.members[0]));

    if groups.len() > limit {
        tracing::debug!(
            groups = groups.len(),
            limit,
            "truncating line overview to group limit"
        );
        groups.truncate(limit);
    }

    groups
}
