pub mod normalizer;
pub mod registration;
pub mod route_list;
pub mod session;

pub use crate::domain::model::{Cep, Coordinates, Entry, MapPoint};
pub use crate::domain::ports::{
    AddressResolver, ConfigProvider, CoordinateResolver, DeviceLocationProvider,
    MapPresentation, Storage,
};
pub use crate::utils::error::Result;
