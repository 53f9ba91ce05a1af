//! retail-service: text-menu retail order & reporting tool over PostgreSQL.

pub mod config;
pub mod console;
pub mod models;
pub mod services;
