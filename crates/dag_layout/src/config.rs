use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or changing layout properties
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown property {0:?}")]
    UnknownProperty(String),

    #[error("invalid value {value:?} for property {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("property {key} is out of range: {reason}")]
    OutOfRange {
        key: &'static str,
        reason: &'static str,
    },
}

/// Descriptor of a configurable property, for property sheets and CLIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub key: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

const CATEGORY: &str = "DAG Layout";

const PROPERTIES: [Property; 4] = [
    Property {
        key: "x_distance",
        name: "X Distance",
        category: CATEGORY,
        description: "The x distance between slots",
    },
    Property {
        key: "y_distance",
        name: "Y Distance",
        category: CATEGORY,
        description: "The y distance between layers",
    },
    Property {
        key: "speed",
        name: "Speed",
        category: CATEGORY,
        description: "Animation speed factor between 0 and 1",
    },
    Property {
        key: "randomizations_per_pass",
        name: "Random Optimizations",
        category: CATEGORY,
        description: "Random optimizations per pass",
    },
];

/// Tunable knobs of the DAG layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DagLayoutConfig {
    /// Horizontal distance between two slots
    pub x_distance: f32,

    /// Vertical distance between two layers
    pub y_distance: f32,

    /// Share of the remaining distance covered by each step, in `(0, 1]`
    pub speed: f32,

    /// Swap trials run by each step
    pub randomizations_per_pass: usize,
}

impl Default for DagLayoutConfig {
    fn default() -> Self {
        Self {
            x_distance: 100.0,
            y_distance: 100.0,
            speed: 0.00004,
            randomizations_per_pass: 20,
        }
    }
}

impl DagLayoutConfig {
    /// Descriptors for every property accepted by [`DagLayoutConfig::set_property`]
    pub fn properties() -> &'static [Property] {
        &PROPERTIES
    }

    /// Restore the default values
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check that the values can drive a layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed > 0.0 && self.speed <= 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "speed",
                reason: "must be in (0, 1]",
            });
        }
        if !self.x_distance.is_finite() {
            return Err(ConfigError::OutOfRange {
                key: "x_distance",
                reason: "must be finite",
            });
        }
        if !self.y_distance.is_finite() {
            return Err(ConfigError::OutOfRange {
                key: "y_distance",
                reason: "must be finite",
            });
        }
        Ok(())
    }

    /// Current value of a property, formatted as text
    pub fn get_property(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "x_distance" => Ok(self.x_distance.to_string()),
            "y_distance" => Ok(self.y_distance.to_string()),
            "speed" => Ok(self.speed.to_string()),
            "randomizations_per_pass" => Ok(self.randomizations_per_pass.to_string()),
            _ => Err(ConfigError::UnknownProperty(key.to_string())),
        }
    }

    /// Parse and assign a property; the config is left untouched on error
    pub fn set_property(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let property = PROPERTIES
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| ConfigError::UnknownProperty(key.to_string()))?;

        let invalid = || ConfigError::InvalidValue {
            key: property.key,
            value: value.to_string(),
        };

        let mut updated = self.clone();
        match property.key {
            "x_distance" => updated.x_distance = value.trim().parse().map_err(|_| invalid())?,
            "y_distance" => updated.y_distance = value.trim().parse().map_err(|_| invalid())?,
            "speed" => updated.speed = value.trim().parse().map_err(|_| invalid())?,
            _ => {
                updated.randomizations_per_pass = value.trim().parse().map_err(|_| invalid())?
            }
        }
        updated.validate()?;

        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DagLayoutConfig::default();
        assert_eq!(config.x_distance, 100.0);
        assert_eq!(config.y_distance, 100.0);
        assert_eq!(config.speed, 0.00004);
        assert_eq!(config.randomizations_per_pass, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn every_property_round_trips_through_text() {
        let mut config = DagLayoutConfig::default();
        for property in DagLayoutConfig::properties() {
            let value = config.get_property(property.key).unwrap();
            config.set_property(property.key, &value).unwrap();
            assert_eq!(property.category, "DAG Layout");
        }
        assert_eq!(config, DagLayoutConfig::default());
    }

    #[test]
    fn set_property_parses_values() {
        let mut config = DagLayoutConfig::default();
        config.set_property("x_distance", "40").unwrap();
        config.set_property("randomizations_per_pass", " 0 ").unwrap();
        config.set_property("speed", "0.5").unwrap();
        assert_eq!(config.x_distance, 40.0);
        assert_eq!(config.randomizations_per_pass, 0);
        assert_eq!(config.speed, 0.5);
    }

    #[test]
    fn rejected_values_leave_config_untouched() {
        let mut config = DagLayoutConfig::default();

        assert_eq!(
            config.set_property("depth", "1"),
            Err(ConfigError::UnknownProperty("depth".to_string()))
        );
        assert!(matches!(
            config.set_property("randomizations_per_pass", "-3"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set_property("speed", "1.5"),
            Err(ConfigError::OutOfRange { key: "speed", .. })
        ));
        assert!(matches!(
            config.set_property("speed", "0"),
            Err(ConfigError::OutOfRange { key: "speed", .. })
        ));
        assert_eq!(config, DagLayoutConfig::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut config = DagLayoutConfig {
            speed: 1.0,
            ..Default::default()
        };
        config.reset();
        assert_eq!(config, DagLayoutConfig::default());
    }

    #[test]
    fn partial_ron_uses_defaults() {
        let config: DagLayoutConfig = ron::from_str("(speed: 0.25)").unwrap();
        assert_eq!(config.speed, 0.25);
        assert_eq!(config.randomizations_per_pass, 20);
    }
}
