use crate::ranking::Coordinates;
use serde::Deserialize;
use wkt::TryFromWkt;

/// Location as delivered by the search collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocationField {
    /// Point geometry text, `POINT(lon lat)`.
    Wkt(String),
    Parsed {
        lat: f64,
        #[serde(alias = "lon")]
        lng: f64,
    },
}

impl LocationField {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Wkt(raw) => parse_wkt_point(raw),
            Self::Parsed { lat, lng } => valid_coordinates(*lat, *lng),
        }
    }

    pub fn raw(&self) -> String {
        match self {
            Self::Wkt(raw) => raw.clone(),
            Self::Parsed { lat, lng } => format!("{{lat: {lat}, lng: {lng}}}"),
        }
    }
}

/// Parses `POINT(lon lat)`; anything else, including out-of-range degrees, is `None`.
pub fn parse_wkt_point(raw: &str) -> Option<Coordinates> {
    let point = geo::Point::<f64>::try_from_wkt_str(raw.trim()).ok()?;
    valid_coordinates(point.y(), point.x())
}

fn valid_coordinates(lat: f64, lng: f64) -> Option<Coordinates> {
    let in_range = lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng);
    in_range.then(|| Coordinates::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_longitude_first() {
        let coordinates = parse_wkt_point("POINT(139.767125 35.681236)").expect("valid point");
        assert_eq!(coordinates, Coordinates::new(35.681236, 139.767125));
    }

    #[test]
    fn accepts_surrounding_whitespace() {
        assert!(parse_wkt_point("  POINT (139.7 35.6) ").is_some());
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(parse_wkt_point("POINT(abc def)"), None);
        assert_eq!(parse_wkt_point("LINESTRING(0 0, 1 1)"), None);
        assert_eq!(parse_wkt_point(""), None);
        assert_eq!(parse_wkt_point("POINT EMPTY"), None);
    }

    #[test]
    fn rejects_out_of_range_degrees() {
        assert_eq!(parse_wkt_point("POINT(35.6 139.7)"), None);
    }

    #[test]
    fn deserializes_both_encodings() {
        let wkt: LocationField =
            serde_json::from_str(r#""POINT(139.76 35.68)""#).expect("wkt location");
        let parsed: LocationField =
            serde_json::from_str(r#"{"lat": 35.68, "lng": 139.76}"#).expect("object location");
        assert_eq!(wkt.coordinates(), parsed.coordinates());
    }
}
