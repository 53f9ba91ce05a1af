//! Services module for retail-service.

pub mod database;

pub use database::Database;
