//! Core type aliases used across all crates.

/// Database primary key type. All entity tables use BIGSERIAL.
pub type DbId = i64;

/// Timestamp type used throughout. Always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
