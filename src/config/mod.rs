pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, Coordinates};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cep-route")]
#[command(about = "Register Brazilian CEPs, order them and show the route on a map")]
pub struct CliConfig {
    #[arg(long, default_value = crate::adapters::viacep::DEFAULT_VIACEP_URL)]
    pub viacep_url: String,

    #[arg(long, default_value = crate::adapters::nominatim::DEFAULT_NOMINATIM_URL)]
    pub nominatim_url: String,

    #[arg(long, default_value = "15", help = "Per-request timeout for both lookups")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = crate::adapters::http::DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value = crate::core::registration::DEFAULT_FALLBACK_ADDRESS)]
    pub fallback_address: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "map.html")]
    pub map_file: String,

    #[arg(long, default_value = "3000", help = "How long map commands wait for the page")]
    pub ready_timeout_ms: u64,

    #[arg(
        long,
        value_name = "LAT,LON",
        allow_hyphen_values = true,
        value_parser = validation::parse_coordinates,
        help = "Device position used as the start pin"
    )]
    pub start: Option<Coordinates>,

    #[arg(long, help = "Behave as if location permission was refused")]
    pub deny_location: bool,

    #[arg(long = "cep", help = "Register these CEPs, open the map and exit")]
    pub ceps: Vec<String>,

    #[arg(long, help = "Read settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn viacep_url(&self) -> &str {
        &self.viacep_url
    }

    fn nominatim_url(&self) -> &str {
        &self.nominatim_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn fallback_address(&self) -> &str {
        &self.fallback_address
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn map_file(&self) -> &str {
        &self.map_file
    }

    fn ready_timeout_ms(&self) -> u64 {
        self.ready_timeout_ms
    }

    fn start_location(&self) -> Option<Coordinates> {
        self.start
    }

    fn location_permission_granted(&self) -> bool {
        !self.deny_location
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_provider(self)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["cep-route"]);

        assert_eq!(config.viacep_url(), "https://viacep.com.br");
        assert_eq!(config.nominatim_url(), "https://nominatim.openstreetmap.org");
        assert_eq!(config.timeout_seconds(), 15);
        assert_eq!(config.fallback_address(), "(address not found)");
        assert_eq!(config.map_file(), "map.html");
        assert_eq!(config.start_location(), None);
        assert!(config.location_permission_granted());
        assert!(config.ceps.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_start_and_batch_ceps() {
        let config = CliConfig::parse_from([
            "cep-route",
            "--start",
            "-5.79,-35.21",
            "--deny-location",
            "--cep",
            "59064-320",
            "--cep",
            "01001000",
        ]);

        assert_eq!(config.start_location(), Some(Coordinates::new(-5.79, -35.21)));
        assert!(!config.location_permission_granted());
        assert_eq!(config.ceps, vec!["59064-320", "01001000"]);
    }

    #[test]
    fn test_bad_start_is_rejected() {
        let result = CliConfig::try_parse_from(["cep-route", "--start", "north"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let config = CliConfig::parse_from(["cep-route", "--timeout-seconds", "0"]);
        assert!(config.validate().is_err());
    }
}
