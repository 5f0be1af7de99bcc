//! Platform configuration schema for the sensor surface.

use serde::Deserialize;

use crate::sensor::{SensorKind, WasteSensor};

/// Fallback postcode; exists to satisfy schema validation, not a meaningful
/// production default.
pub const DEFAULT_POSTCODE: &str = "1111AA";
/// Fallback house number; exists to satisfy schema validation only.
pub const DEFAULT_HOUSE_NUMBER: &str = "1";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Violations of the platform configuration schema.
pub enum ConfigError {
    /// No resource keys were configured.
    #[error("At least one resource must be configured")]
    NoResources,
    /// The postcode field is blank.
    #[error("Postcode must not be empty")]
    EmptyPostcode,
    /// The house number field is blank.
    #[error("House number must not be empty")]
    EmptyHouseNumber,
}

#[derive(Debug, Clone, Deserialize)]
/// Declarative sensor-platform configuration.
pub struct PlatformConfig {
    /// Resource keys to expose as sensors: `today`, `tomorrow`, or a trash
    /// stream key such as `grey`. Unknown stream keys are accepted.
    #[serde(default)]
    pub resources: Vec<String>,
    /// Postcode of the serviced address.
    #[serde(default = "default_postcode")]
    pub postcode: String,
    /// House number of the serviced address.
    #[serde(default = "default_house_number")]
    pub house_number: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            postcode: default_postcode(),
            house_number: default_house_number(),
        }
    }
}

impl PlatformConfig {
    /// Check the schema requirements.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty resource list or blank address
    /// fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resources.is_empty() {
            return Err(ConfigError::NoResources);
        }
        if self.postcode.trim().is_empty() {
            return Err(ConfigError::EmptyPostcode);
        }
        if self.house_number.trim().is_empty() {
            return Err(ConfigError::EmptyHouseNumber);
        }
        Ok(())
    }

    /// Build the configured sensor set, one per resource key.
    #[must_use]
    pub fn sensors(&self) -> Vec<WasteSensor> {
        self.resources
            .iter()
            .map(|key| WasteSensor::new(SensorKind::from_key(key)))
            .collect()
    }
}

fn default_postcode() -> String {
    DEFAULT_POSTCODE.to_owned()
}

fn default_house_number() -> String {
    DEFAULT_HOUSE_NUMBER.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrashType;

    #[test]
    fn at_least_one_resource_is_required() {
        let config = PlatformConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::NoResources));
    }

    #[test]
    fn blank_address_fields_are_rejected() {
        let config = PlatformConfig {
            resources: vec!["grey".to_owned()],
            postcode: "  ".to_owned(),
            house_number: "1".to_owned(),
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPostcode));
    }

    #[test]
    fn resource_keys_map_to_sensor_kinds() {
        let config = PlatformConfig {
            resources: vec![
                "today".to_owned(),
                "GREY".to_owned(),
                "christmas tree".to_owned(),
            ],
            ..PlatformConfig::default()
        };
        assert!(config.validate().is_ok());

        let sensors = config.sensors();
        assert_eq!(sensors.len(), 3);
        assert_eq!(sensors.first().map(WasteSensor::kind), Some(&SensorKind::Today));
        assert_eq!(
            sensors.get(1).map(WasteSensor::kind),
            Some(&SensorKind::ByType(TrashType::Grey))
        );
        assert_eq!(
            sensors.get(2).map(WasteSensor::kind),
            Some(&SensorKind::ByType(TrashType::Other(
                "CHRISTMAS TREE".to_owned()
            )))
        );
    }
}
