use crate::error::GeocodeError;
use crate::models::{Coordinates, PropertyRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Resolves free-text addresses to coordinates
#[async_trait]
pub trait Geocode: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Body of a geocode API response; only the fields read here
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Take the first result of an `OK` response.
pub fn interpret_response(response: GeocodeResponse) -> Result<Coordinates, GeocodeError> {
    if response.status != "OK" {
        return Err(GeocodeError::Status(response.status));
    }
    let location = &response
        .results
        .first()
        .ok_or(GeocodeError::NoResults)?
        .geometry
        .location;

    Ok(Coordinates {
        latitude: location.lat,
        longitude: location.lng,
    })
}

/// Google Geocoding API client
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create geocoding client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocode for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let response: GeocodeResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        interpret_response(response)
    }
}

/// Attach coordinates for the record's address. Returns whether it succeeded.
pub async fn add_geocode_data(geocoder: &dyn Geocode, record: &mut PropertyRecord) -> bool {
    let Some(address) = record.address.as_deref() else {
        warn!("No address to geocode for {}", record.source_url);
        return false;
    };

    match geocoder.geocode(address).await {
        Ok(coordinates) => {
            debug!(
                "Geocoded '{}' to {}, {}",
                address, coordinates.latitude, coordinates.longitude
            );
            record.coordinates = Some(coordinates);
            true
        }
        Err(e) => {
            warn!("Could not geocode address: {} ({})", address, e);
            false
        }
    }
}
