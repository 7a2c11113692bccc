// src/services/geolocation.rs
use crate::errors::BreedSenseError;
use crate::models::Location;
use async_trait::async_trait;

/// Device location lookup, mapped to the state/district/city triple the
/// hospital search form uses.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<Location, BreedSenseError>;
}

/// Always reports Pune, Maharashtra.
pub struct MockGeolocator;

#[async_trait]
impl Geolocator for MockGeolocator {
    async fn locate(&self) -> Result<Location, BreedSenseError> {
        Ok(Location {
            state: "Maharashtra".to_string(),
            district: "Pune".to_string(),
            city: "Pune".to_string(),
        })
    }
}
