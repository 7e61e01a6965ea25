use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AppError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::HttpError(_) => "Could not prepare the HTTP client".to_string(),
            AppError::IoError(e) => format!("File system error: {}", e),
            AppError::SerializationError(_) => "Could not serialize map data".to_string(),
            AppError::TomlError(e) => format!("Configuration file is not valid TOML: {}", e),
            AppError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            AppError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::HttpError(_) => "Check the TLS setup and the configured user agent",
            AppError::IoError(_) => "Check that the output path exists and is writable",
            AppError::SerializationError(_) => "Report the entry that could not be serialized",
            AppError::TomlError(_) => "Fix the syntax of the configuration file",
            AppError::MissingConfigError { .. }
            | AppError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the configuration file"
            }
        }
    }
}

/// Failure of an address lookup. Every variant is reported to the user as the
/// same `AddressLookupFailed` registration error.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("CEP '{0}' does not have 8 digits")]
    InvalidCep(String),

    #[error("CEP {0} not found")]
    NotFound(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service answered with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("'{digits}' has {} digits, expected 8", .digits.len())]
    InvalidLength { digits: String },

    #[error("CEP {cep} is already registered")]
    Duplicate { cep: String },

    #[error("address lookup for CEP {cep} failed: {reason}")]
    AddressLookupFailed { cep: String, reason: String },

    #[error("no address available for CEP {cep}")]
    AddressUnavailable { cep: String },
}

impl RegistrationError {
    /// Short message shown once to the user.
    pub fn user_message(&self) -> String {
        match self {
            RegistrationError::InvalidLength { .. } => {
                "Invalid CEP: type exactly 8 digits".to_string()
            }
            RegistrationError::Duplicate { cep } => format!("CEP {} is already in the list", cep),
            RegistrationError::AddressLookupFailed { cep, .. } => {
                format!("Could not look up CEP {}, check your connection", cep)
            }
            RegistrationError::AddressUnavailable { cep } => {
                format!("No address found for CEP {}", cep)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
