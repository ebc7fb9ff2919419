//! Exchange calculations, form state and the services around them

pub mod config;
pub mod feed;
pub mod form;
pub mod log;
pub mod poller;
pub mod rates;
pub mod schema;
pub mod sum;
pub mod swap;

// Re-export main types for cleaner imports
pub use feed::PriceFeed;
pub use form::{ExchangeForm, Field, FieldUpdate, MissingRatePolicy};
pub use rates::{ExchangeError, RateRecord, RateSnapshot};
