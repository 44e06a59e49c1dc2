//! Storage for the shopping list.
//!
//! This crate provides a storage abstraction for categories, products,
//! stores and shopping lists. It ships an in-memory store (for tests and
//! ephemeral sessions) and an embedded SQLite store.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::SqliteShopStore;
pub use traits::*;
