use thiserror::Error;

/// Reasons a request cannot be turned into a [`super::SearchContext`].
#[derive(Debug, Error, PartialEq)]
pub enum ContextError {
    #[error("location must include coordinates or a city/postal code")]
    MissingLocation,

    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("location has only one of latitude/longitude")]
    PartialCoordinates,

    #[error("invalid radius {0}: must be a positive number of miles")]
    InvalidRadius(f64),
}
