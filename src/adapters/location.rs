use crate::domain::model::Coordinates;
use crate::domain::ports::{ConfigProvider, DeviceLocationProvider};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPermission {
    Granted,
    Denied,
}

/// Device position taken from configuration instead of a GPS receiver.
#[derive(Debug, Clone)]
pub struct StaticLocation {
    permission: LocationPermission,
    fix: Option<Coordinates>,
}

impl StaticLocation {
    pub fn new(permission: LocationPermission, fix: Option<Coordinates>) -> Self {
        Self { permission, fix }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        let permission = if config.location_permission_granted() {
            LocationPermission::Granted
        } else {
            LocationPermission::Denied
        };
        Self::new(permission, config.start_location())
    }
}

#[async_trait]
impl DeviceLocationProvider for StaticLocation {
    async fn current_location(&self) -> Option<Coordinates> {
        match self.permission {
            LocationPermission::Granted => self.fix,
            LocationPermission::Denied => {
                tracing::debug!("Location permission denied, no start position");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_returns_fix() {
        let fix = Some(Coordinates::new(-5.79, -35.21));
        let provider = StaticLocation::new(LocationPermission::Granted, fix);
        assert_eq!(tokio_test::block_on(provider.current_location()), fix);
    }

    #[test]
    fn test_denied_hides_fix() {
        let provider = StaticLocation::new(
            LocationPermission::Denied,
            Some(Coordinates::new(-5.79, -35.21)),
        );
        assert_eq!(tokio_test::block_on(provider.current_location()), None);
    }

    #[test]
    fn test_granted_without_fix() {
        let provider = StaticLocation::new(LocationPermission::Granted, None);
        assert_eq!(tokio_test::block_on(provider.current_location()), None);
    }
}
