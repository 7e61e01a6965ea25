use crate::domain::model::Coordinates;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AppError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AppError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_coordinates(field_name: &str, coordinates: &Coordinates) -> Result<()> {
    if !coordinates.latitude.is_finite() || !coordinates.longitude.is_finite() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{},{}", coordinates.latitude, coordinates.longitude),
            reason: "Coordinates must be finite numbers".to_string(),
        });
    }
    validate_range(
        &format!("{}.latitude", field_name),
        coordinates.latitude,
        -90.0,
        90.0,
    )?;
    validate_range(
        &format!("{}.longitude", field_name),
        coordinates.longitude,
        -180.0,
        180.0,
    )
}

/// Parses `LAT,LON` with `.` as decimal separator.
pub fn parse_coordinates(value: &str) -> std::result::Result<Coordinates, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{}'", value))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

    let coordinates = Coordinates::new(latitude, longitude);
    validate_coordinates("start", &coordinates).map_err(|e| e.to_string())?;
    Ok(coordinates)
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("viacep_url", config.viacep_url())?;
    validate_url("nominatim_url", config.nominatim_url())?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 120)?;
    validate_non_empty_string("user_agent", config.user_agent())?;
    validate_path("output_path", config.output_path())?;
    validate_path("map_file", config.map_file())?;
    validate_range("ready_timeout_ms", config.ready_timeout_ms(), 0, 60_000)?;

    if let Some(start) = config.start_location() {
        validate_coordinates("start", &start)?;
    }

    Ok(())
}
