//! # Taskboard Shared Library
//!
//! Persistence layer for the Taskboard API: connection pooling, embedded
//! migrations and the `User`, `Category` and `Task` models.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migration runner
//! - `models`: Database models and their CRUD operations
//! - `deserializers`: Serde helpers shared by request types

pub mod db;
pub mod deserializers;
pub mod models;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
