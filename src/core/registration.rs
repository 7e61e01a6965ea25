use crate::core::normalizer::{classify, CepInput};
use crate::core::route_list::RouteList;
use crate::domain::model::Entry;
use crate::domain::ports::{AddressResolver, CoordinateResolver};
use crate::utils::error::RegistrationError;

pub const DEFAULT_FALLBACK_ADDRESS: &str = "(address not found)";

/// Validate, deduplicate, resolve the address, geocode it, append.
///
/// Every failing step stops the pipeline before the list is touched, so a
/// failed registration never leaves a partial entry behind. Taking the list
/// by `&mut` keeps registrations against the same list strictly sequential.
pub struct RegistrationPipeline<A: AddressResolver, C: CoordinateResolver> {
    addresses: A,
    coordinates: C,
    fallback_address: String,
}

impl<A: AddressResolver, C: CoordinateResolver> RegistrationPipeline<A, C> {
    pub fn new(addresses: A, coordinates: C) -> Self {
        Self::with_fallback(addresses, coordinates, DEFAULT_FALLBACK_ADDRESS)
    }

    pub fn with_fallback(addresses: A, coordinates: C, fallback_address: &str) -> Self {
        Self {
            addresses,
            coordinates,
            fallback_address: fallback_address.to_string(),
        }
    }

    /// `Ok(None)` means the input had no digits and nothing happened.
    pub async fn register(
        &self,
        raw: &str,
        list: &mut RouteList,
    ) -> Result<Option<Entry>, RegistrationError> {
        let cep = match classify(raw) {
            CepInput::Empty => return Ok(None),
            CepInput::InvalidLength(digits) => {
                return Err(RegistrationError::InvalidLength { digits })
            }
            CepInput::Valid(cep) => cep,
        };

        if list.contains(&cep) {
            return Err(RegistrationError::Duplicate {
                cep: cep.to_string(),
            });
        }

        let resolved = self.addresses.resolve(&cep).await.map_err(|e| {
            RegistrationError::AddressLookupFailed {
                cep: cep.to_string(),
                reason: e.to_string(),
            }
        })?;

        let address = if resolved.trim().is_empty() {
            tracing::debug!("Address for {} is blank, using fallback text", cep);
            self.fallback_address.clone()
        } else {
            resolved
        };
        if address.trim().is_empty() {
            return Err(RegistrationError::AddressUnavailable {
                cep: cep.to_string(),
            });
        }

        let query = format!("{}, Brasil", address);
        let coordinates = self.coordinates.resolve(&query).await;
        if coordinates.is_none() {
            tracing::warn!("⚠️ No coordinates for {} ({}), keeping it off the map", cep, address);
        }

        let entry = Entry::new(cep, address, coordinates);
        list.append(entry.clone())
            .map_err(|rejected| RegistrationError::Duplicate {
                cep: rejected.cep().to_string(),
            })?;

        Ok(Some(entry))
    }
}
