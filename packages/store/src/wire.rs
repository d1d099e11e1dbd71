//! Mapping between [`ShelterRecord`] and the backend's property JSON.
//!
//! This is the only place that knows the `(0, 0)` sentinel: records
//! without coordinates serialize to the sentinel geo-pair, and the
//! sentinel (or a missing/partial pair) deserializes back to `None`.

use serde_json::{Value, json};
use shelter_map_shelter_models::{GeoPoint, ShelterRecord};

/// Backend class name for the shelter collection.
pub const SHELTER_CLASS: &str = "Shelter";

/// GraphQL field selection for a full shelter fetch.
pub const SHELTER_FIELDS: &str =
    "name address bookingLink phoneNumber notes coordinates { latitude longitude }";

/// Full class definition for the shelter collection.
#[must_use]
pub fn shelter_class_definition() -> Value {
    json!({
        "class": SHELTER_CLASS,
        "description": "Emergency shelters for disaster response",
        "properties": [
            { "name": "name", "dataType": ["text"], "description": "Display name of the shelter" },
            { "name": "address", "dataType": ["text"], "description": "Full postal address" },
            { "name": "bookingLink", "dataType": ["text"], "description": "URL for booking or more information" },
            { "name": "coordinates", "dataType": ["geoCoordinates"], "description": "Geographic position (latitude, longitude)" },
            { "name": "phoneNumber", "dataType": ["text"], "description": "Contact phone number" },
            { "name": "notes", "dataType": ["text"], "description": "Additional free-text information" },
        ],
    })
}

/// Serializes a record into backend properties.
///
/// Absent coordinates become the `(0, 0)` sentinel. The geo-pair
/// property is required by the class definition, so there is always a
/// value on the wire.
#[must_use]
pub fn to_properties(record: &ShelterRecord) -> Value {
    let coords = record.coordinates.unwrap_or(GeoPoint::new(0.0, 0.0));
    json!({
        "name": record.name,
        "address": record.address,
        "bookingLink": record.booking_link,
        "coordinates": {
            "latitude": coords.lat,
            "longitude": coords.lon,
        },
        "phoneNumber": record.phone_number,
        "notes": record.notes,
    })
}

/// Materializes a record from a fetched property map.
///
/// A missing, partial, or sentinel geo-pair normalizes to `None`. The
/// name falls back to the address when the stored name is empty.
#[must_use]
pub fn from_properties(properties: &Value) -> ShelterRecord {
    let text = |field: &str| {
        properties[field]
            .as_str()
            .unwrap_or_default()
            .to_string()
    };

    let coordinates = parse_geo_pair(&properties["coordinates"]);

    let address = text("address");
    let mut name = text("name");
    if name.is_empty() {
        name.clone_from(&address);
    }

    ShelterRecord {
        id: properties["_additional"]["id"].as_str().map(String::from),
        name,
        address,
        booking_link: text("bookingLink"),
        phone_number: text("phoneNumber"),
        notes: text("notes"),
        coordinates,
        distance_km: None,
    }
}

/// Parses a stored geo-pair, treating the sentinel and partial pairs
/// as absent.
fn parse_geo_pair(value: &Value) -> Option<GeoPoint> {
    let lat = value["latitude"].as_f64()?;
    let lon = value["longitude"].as_f64()?;
    let point = GeoPoint::new(lat, lon);
    if point.is_sentinel() { None } else { Some(point) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(coordinates: Option<GeoPoint>) -> ShelterRecord {
        ShelterRecord {
            id: None,
            name: "Evac Center".to_string(),
            address: "123 Main St, Los Angeles, CA".to_string(),
            booking_link: "https://example.com/book".to_string(),
            phone_number: "555-1234".to_string(),
            notes: "Pets allowed".to_string(),
            coordinates,
            distance_km: None,
        }
    }

    #[test]
    fn absent_coordinates_serialize_to_sentinel() {
        let props = to_properties(&record_with(None));
        assert_eq!(props["coordinates"]["latitude"], 0.0);
        assert_eq!(props["coordinates"]["longitude"], 0.0);
    }

    #[test]
    fn present_coordinates_round_trip() {
        let original = record_with(Some(GeoPoint::new(34.0522, -118.2437)));
        let props = to_properties(&original);
        let restored = from_properties(&props);
        assert_eq!(restored.coordinates, original.coordinates);
        assert_eq!(restored.phone_number, original.phone_number);
    }

    #[test]
    fn sentinel_deserializes_to_none() {
        let props = to_properties(&record_with(None));
        let restored = from_properties(&props);
        assert!(restored.coordinates.is_none());
    }

    #[test]
    fn partial_geo_pair_normalizes_to_none() {
        let props = serde_json::json!({
            "name": "Evac Center",
            "address": "123 Main St",
            "coordinates": { "latitude": 34.0522 },
        });
        assert!(from_properties(&props).coordinates.is_none());
    }

    #[test]
    fn missing_geo_pair_normalizes_to_none() {
        let props = serde_json::json!({
            "name": "Evac Center",
            "address": "123 Main St",
        });
        assert!(from_properties(&props).coordinates.is_none());
    }

    #[test]
    fn empty_name_falls_back_to_address() {
        let props = serde_json::json!({
            "name": "",
            "address": "456 Elm St",
            "coordinates": { "latitude": 34.0, "longitude": -118.0 },
        });
        assert_eq!(from_properties(&props).name, "456 Elm St");
    }

    #[test]
    fn class_definition_covers_all_fields() {
        let def = shelter_class_definition();
        let names: Vec<&str> = def["properties"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["name", "address", "bookingLink", "coordinates", "phoneNumber", "notes"]
        );
    }
}
