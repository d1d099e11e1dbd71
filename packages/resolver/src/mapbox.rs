//! Mapbox forward geocoding client.
//!
//! One query, one best match: the request asks for `limit=1` and only
//! the top feature is used; there is no disambiguation UI downstream.
//!
//! See <https://docs.mapbox.com/api/search/geocoding/>

use serde_json::Value;
use shelter_map_shelter_models::GeoPoint;

use crate::ResolveError;

/// Production endpoint for the places dataset.
pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Geocodes a single address, returning the best match or `None`.
///
/// Results are restricted to the US.
///
/// # Errors
///
/// Returns [`ResolveError::Upstream`] on a non-2xx response and
/// [`ResolveError::Http`] on transport failure.
pub async fn geocode_forward(
    client: &reqwest::Client,
    base_url: &str,
    access_token: &str,
    address: &str,
) -> Result<Option<GeoPoint>, ResolveError> {
    let url = build_query_url(base_url, address)?;

    log::info!("Geocoding address: {address}");
    let resp = client
        .get(url)
        .query(&[
            ("access_token", access_token),
            ("limit", "1"),
            ("country", "US"),
        ])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ResolveError::Upstream {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }

    let body: Value = resp.json().await?;
    Ok(parse_best_match(&body))
}

/// Builds the request URL, percent-encoding the address into the path.
fn build_query_url(base_url: &str, address: &str) -> Result<reqwest::Url, ResolveError> {
    let mut url = reqwest::Url::parse(base_url).map_err(|e| ResolveError::Upstream {
        status: 0,
        body: format!("invalid geocoder base URL: {e}"),
    })?;
    url.path_segments_mut()
        .map_err(|()| ResolveError::Upstream {
            status: 0,
            body: "geocoder base URL cannot carry a path".to_string(),
        })?
        .push(&format!("{address}.json"));
    Ok(url)
}

/// Extracts the top feature's position from a geocoding response.
///
/// Mapbox returns `center` as `[longitude, latitude]`; the order is
/// inverted here to the domain's `(lat, lon)`.
fn parse_best_match(body: &Value) -> Option<GeoPoint> {
    let center = body["features"].get(0)?.get("center")?.as_array()?;
    let lon = center.first()?.as_f64()?;
    let lat = center.get(1)?.as_f64()?;
    Some(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_best_match_and_inverts_order() {
        let body = json!({
            "features": [
                { "center": [-118.2437, 34.0522], "place_name": "Los Angeles, CA" },
                { "center": [-74.0060, 40.7128], "place_name": "New York, NY" },
            ]
        });
        let point = parse_best_match(&body).unwrap();
        assert!((point.lat - 34.0522).abs() < 1e-6);
        assert!((point.lon - -118.2437).abs() < 1e-6);
    }

    #[test]
    fn empty_features_is_no_match() {
        assert!(parse_best_match(&json!({ "features": [] })).is_none());
        assert!(parse_best_match(&json!({})).is_none());
    }

    #[test]
    fn malformed_center_is_no_match() {
        let body = json!({ "features": [ { "center": [-118.2437] } ] });
        assert!(parse_best_match(&body).is_none());
    }

    #[test]
    fn encodes_address_into_path() {
        let url = build_query_url(DEFAULT_BASE_URL, "123 Main St, Los Angeles, CA").unwrap();
        let path = url.path();
        assert!(path.ends_with(".json"));
        assert!(!path.contains(' '), "spaces must be percent-encoded: {path}");
    }
}
