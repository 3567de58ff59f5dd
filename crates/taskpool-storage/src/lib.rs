// Postgres storage layer with sqlx
//
// This crate provides implementations of the core TaskStore trait:
// - Database: Postgres-backed store (the production store)
// - MemoryTaskStore: in-memory store for dev mode and tests

pub mod memory;
pub mod models;
pub mod repositories;

pub use memory::MemoryTaskStore;
pub use models::TaskRow;
pub use repositories::Database;
