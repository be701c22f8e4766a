use thiserror::Error;

/// Failures that end the trip detection run of a single user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TripDetectionError {
    #[error("invalid coordinate: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("fix #{index} is missing required field `{field}`")]
    MissingField { field: &'static str, index: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TripDetectionError>;
