use std::{fs, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::TripDetectionError;

/// Parameters of one trip detection run. Missing keys in a config file fall
/// back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripDetectionConfig {
    pub accuracy_cutoff_meters: f64,
    pub erroneous_speed_kph: f64,
    pub break_interval_seconds: f64,
    pub subway_buffer_meters: f64,
    // velocity stitching is skipped unless this is set
    pub velocity_link_max_kph: Option<f64>,
    pub first_trip_num: u32,
}

impl Default for TripDetectionConfig {
    fn default() -> Self {
        TripDetectionConfig {
            accuracy_cutoff_meters: 50.,
            erroneous_speed_kph: 60.,
            break_interval_seconds: 360.,
            subway_buffer_meters: 300.,
            velocity_link_max_kph: None,
            first_trip_num: 1,
        }
    }
}

impl TripDetectionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TripDetectionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("loading trip detection config from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> std::result::Result<(), TripDetectionError> {
        let mut checks = vec![
            ("accuracy_cutoff_meters", self.accuracy_cutoff_meters),
            ("erroneous_speed_kph", self.erroneous_speed_kph),
            ("break_interval_seconds", self.break_interval_seconds),
            ("subway_buffer_meters", self.subway_buffer_meters),
        ];
        if let Some(kph) = self.velocity_link_max_kph {
            checks.push(("velocity_link_max_kph", kph));
        }
        for (name, value) in checks {
            if !value.is_finite() || value <= 0. {
                return Err(TripDetectionError::InvalidConfig(format!(
                    "`{name}` must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
