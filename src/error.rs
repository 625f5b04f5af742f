use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Record store errors surfaced by `RecordStore` implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend rejected request with status {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("{entity} row {id} not found or not visible")]
    MissingRow { entity: &'static str, id: String },

    #[error("backend returned no {entity} row for a write that should produce one")]
    EmptyResponse { entity: &'static str },

    #[error("joined {entity} detail missing for price {price_id}")]
    MissingJoin {
        entity: &'static str,
        price_id: String,
    },
}

/// Validation errors raised before any store round-trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("price must be positive, got {price}")]
    NonPositivePrice { price: rust_decimal::Decimal },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no authenticated user")]
    NotAuthenticated,

    #[error("authentication failed: {0}")]
    AuthFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
