use super::location::LocationField;
use crate::ranking::MarketPrice;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Station record as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "organization_code", alias = "company")]
    pub operator_code: Option<String>,
    #[serde(default)]
    pub line_name: Option<String>,
    #[serde(default)]
    pub location: Option<LocationField>,
    #[serde(default, alias = "distance")]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub rent_avg: Option<f64>,
    #[serde(default)]
    pub market_prices: Vec<MarketPrice>,
    #[serde(default)]
    pub is_nearby: Option<bool>,
    #[serde(default)]
    pub source_station: Option<String>,
    #[serde(default)]
    pub stops_from_source: Option<u32>,
}

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<StationRecord>, serde_json::Error> {
    serde_json::from_reader(reader)
}

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<StationRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<CsvRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

/// Flat CSV export; market prices are not carried in this format.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: i64,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    operator_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    line_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default)]
    distance_meters: Option<f64>,
    #[serde(default)]
    rent_avg: Option<f64>,
    #[serde(default)]
    is_nearby: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source_station: Option<String>,
    #[serde(default)]
    stops_from_source: Option<u32>,
}

impl CsvRow {
    fn into_record(self) -> StationRecord {
        StationRecord {
            id: self.id,
            name: self.name,
            operator_code: self.operator_code,
            line_name: self.line_name,
            location: self.location.map(LocationField::Wkt),
            distance_meters: self.distance_meters,
            rent_avg: self.rent_avg,
            market_prices: Vec::new(),
            is_nearby: self.is_nearby,
            source_station: self.source_station,
            stops_from_source: self.stops_from_source,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_records_accept_backend_field_names() {
        let json = r#"[{
            "id": 12,
            "name": "Akabane",
            "organization_code": "JR",
            "line_name": "Saikyo",
            "location": "POINT(139.7209 35.7778)",
            "distance": 850.0,
            "market_prices": [{"building_type": "mansion", "layout": "1k", "rent": 7.2, "sample_size": 40}]
        }]"#;

        let records = parse_json(json.as_bytes()).expect("json parses");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.operator_code.as_deref(), Some("JR"));
        assert_eq!(record.distance_meters, Some(850.0));
        assert_eq!(record.market_prices[0].rent, 7.2);
    }

    #[test]
    fn json_rejects_null_identifiers() {
        let json = r#"[{"id": null, "name": "Nowhere"}]"#;
        assert!(parse_json(json.as_bytes()).is_err());
    }

    #[test]
    fn csv_rows_treat_blank_cells_as_missing() {
        let csv = "id,name,operator_code,line_name,location,distance_meters,rent_avg\n\
1,Jujo,JR,Saikyo,POINT(139.7219 35.7635),1200,\n\
2,Itabashi, , ,POINT(139.7194 35.7456),,6.8\n";

        let records = parse_csv(csv.as_bytes()).expect("csv parses");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].distance_meters, Some(1200.0));
        assert_eq!(records[0].rent_avg, None);
        assert_eq!(records[1].operator_code, None);
        assert_eq!(records[1].line_name, None);
        assert_eq!(records[1].distance_meters, None);
        assert_eq!(records[1].rent_avg, Some(6.8));
        assert_eq!(
            records[1].location,
            Some(LocationField::Wkt("POINT(139.7194 35.7456)".to_string()))
        );
    }
}
