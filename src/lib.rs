pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::console::Console;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    registration::RegistrationPipeline,
    route_list::RouteList,
    session::{MapOutcome, RouteSession},
};
pub use utils::error::{AppError, LookupError, RegistrationError, Result};
