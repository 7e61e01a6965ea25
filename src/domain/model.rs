use serde::{Deserialize, Serialize};
use std::fmt;

pub const CEP_LENGTH: usize = 8;

/// Brazilian postal code: exactly 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

impl Cep {
    /// Accepts only an already-normalized digit string of the right length.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.len() == CEP_LENGTH && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(digits.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `59064-320` style, for display only.
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Cep {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_digits(&value).ok_or_else(|| format!("'{}' is not an 8-digit CEP", value))
    }
}

impl From<Cep> for String {
    fn from(cep: Cep) -> Self {
        cep.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One registered postal code. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    cep: Cep,
    address: String,
    coordinates: Option<Coordinates>,
}

impl Entry {
    pub fn new(cep: Cep, address: String, coordinates: Option<Coordinates>) -> Self {
        Self {
            cep,
            address,
            coordinates,
        }
    }

    pub fn cep(&self) -> &Cep {
        &self.cep
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Label used on the map: `<cep> - <address>`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.cep, self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

impl MapPoint {
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        entry.coordinates().map(|c| Self {
            lat: c.latitude,
            lon: c.longitude,
            label: entry.label(),
        })
    }
}
