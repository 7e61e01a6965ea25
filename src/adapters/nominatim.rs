use crate::adapters::http::join_url;
use crate::domain::model::Coordinates;
use crate::domain::ports::CoordinateResolver;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Deserialize)]
struct Place {
    lat: serde_json::Value,
    lon: serde_json::Value,
}

/// Reads a coordinate that may come as a JSON string or number. Rust's float
/// parser always uses `.` as the decimal separator.
fn parse_degrees(value: &serde_json::Value) -> Option<f64> {
    let degrees = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    degrees.is_finite().then_some(degrees)
}

fn to_coordinates(place: &Place) -> Option<Coordinates> {
    let latitude = parse_degrees(&place.lat)?;
    let longitude = parse_degrees(&place.lon)?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Coordinates::new(latitude, longitude))
}

pub struct NominatimResolver {
    client: Client,
    base_url: String,
}

impl NominatimResolver {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn search_url(&self, query: &str) -> Option<Url> {
        Url::parse_with_params(
            &join_url(&self.base_url, "search"),
            &[
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", "br"),
                ("q", query),
            ],
        )
        .map_err(|e| tracing::warn!("⚠️ Invalid geocoding URL {}: {}", self.base_url, e))
        .ok()
    }
}

#[async_trait]
impl CoordinateResolver for NominatimResolver {
    async fn resolve(&self, query: &str) -> Option<Coordinates> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let url = self.search_url(query)?;
        tracing::debug!("Making geocoding request to: {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("⚠️ Geocoding request failed: {}", e);
                return None;
            }
        };

        tracing::debug!("Geocoding response status: {}", response.status());
        if !response.status().is_success() {
            return None;
        }

        let places: Vec<Place> = match response.json().await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!("⚠️ Unreadable geocoding response: {}", e);
                return None;
            }
        };

        places.first().and_then(to_coordinates)
    }
}
