use crate::domain::model::{Cep, Coordinates, MapPoint};
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn viacep_url(&self) -> &str;
    fn nominatim_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
    fn fallback_address(&self) -> &str;
    fn output_path(&self) -> &str;
    fn map_file(&self) -> &str;
    fn ready_timeout_ms(&self) -> u64;
    fn start_location(&self) -> Option<Coordinates>;
    fn location_permission_granted(&self) -> bool;
}

/// Resolves a CEP into a formatted address. An `Ok` holding an empty string
/// means the service answered but had nothing usable.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, cep: &Cep) -> std::result::Result<String, LookupError>;
}

/// Geocodes free text. Never fails: anything short of a clean hit is `None`.
#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> Option<Coordinates>;
}

#[async_trait]
pub trait MapPresentation: Send {
    async fn render(&mut self, points: &[MapPoint]) -> Result<()>;
    async fn set_start(&mut self, latitude: f64, longitude: f64) -> Result<()>;
    async fn clear(&mut self) -> Result<()>;
    async fn fit_to_view(&mut self) -> Result<()>;
}

#[async_trait]
pub trait DeviceLocationProvider: Send + Sync {
    async fn current_location(&self) -> Option<Coordinates>;
}
