// error.rs
use crate::continent::ContinentId;
use crate::country::CountryId;
use thiserror::Error;

/// Rejections raised by the map mutators and the config loader.
///
/// Lookups that miss never produce one of these; they return `None` or an
/// empty collection instead.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("continent {0} does not exist")]
    UnknownContinent(ContinentId),

    #[error("no continent is named '{0}'")]
    UnknownContinentName(String),

    #[error("country '{country}' names continent '{given}' but continent {continent_id} is '{actual}'")]
    ContinentMismatch {
        country: String,
        continent_id: ContinentId,
        given: String,
        actual: String,
    },

    #[error("country {0} does not exist")]
    UnknownCountry(CountryId),

    #[error("no country is named '{0}'")]
    UnknownCountryName(String),

    #[error("country '{name}' clashes with existing country {existing}")]
    DuplicateCountry { name: String, existing: CountryId },

    #[error("continent '{name}' clashes with existing continent {existing}")]
    DuplicateContinent { name: String, existing: ContinentId },

    #[error("continent '{0}' must have a control value above zero")]
    InvalidControlValue(String),

    #[error("country {0} cannot border itself")]
    SelfBorder(CountryId),

    #[error("map invariant violated: {0}")]
    InvariantViolation(String),

    #[error("failed to read map config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map config: {0}")]
    Json(#[from] serde_json::Error),
}
