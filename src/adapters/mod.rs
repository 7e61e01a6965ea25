// Adapters layer: concrete implementations for external systems (lookup services, map surface, device location).

pub mod deferred_map;
pub mod http;
pub mod leaflet;
pub mod location;
pub mod nominatim;
pub mod viacep;
