use crate::adapters::{http, nominatim, viacep};
use crate::core::registration::DEFAULT_FALLBACK_ADDRESS;
use crate::core::{ConfigProvider, Coordinates};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub services: ServicesConfig,
    pub registration: RegistrationConfig,
    pub map: MapConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub viacep_url: String,
    pub nominatim_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            viacep_url: viacep::DEFAULT_VIACEP_URL.to_string(),
            nominatim_url: nominatim::DEFAULT_NOMINATIM_URL.to_string(),
            timeout_seconds: 15,
            user_agent: http::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub fallback_address: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            fallback_address: DEFAULT_FALLBACK_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub output_path: String,
    pub file_name: String,
    pub ready_timeout_ms: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            file_name: "map.html".to_string(),
            ready_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub permission_granted: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission_granted: true,
            latitude: None,
            longitude: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${NOMINATIM_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        // 緯度與經度必須成對出現
        match (self.location.latitude, self.location.longitude) {
            (Some(_), None) => {
                validation::validate_required_field("location.longitude", &self.location.longitude)?;
            }
            (None, Some(_)) => {
                validation::validate_required_field("location.latitude", &self.location.latitude)?;
            }
            _ => {}
        }

        validation::validate_provider(self)
    }
}

impl ConfigProvider for TomlConfig {
    fn viacep_url(&self) -> &str {
        &self.services.viacep_url
    }

    fn nominatim_url(&self) -> &str {
        &self.services.nominatim_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.services.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.services.user_agent
    }

    fn fallback_address(&self) -> &str {
        &self.registration.fallback_address
    }

    fn output_path(&self) -> &str {
        &self.map.output_path
    }

    fn map_file(&self) -> &str {
        &self.map.file_name
    }

    fn ready_timeout_ms(&self) -> u64 {
        self.map.ready_timeout_ms
    }

    fn start_location(&self) -> Option<Coordinates> {
        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    fn location_permission_granted(&self) -> bool {
        self.location.permission_granted
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
