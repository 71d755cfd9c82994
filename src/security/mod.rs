//! Handling of sensitive configuration values.

mod secrets;

pub use secrets::{SecretValue, REDACTED};
