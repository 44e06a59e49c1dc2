//! Core entity definitions for the shopping list.
//!
//! This crate defines the data types shared by the store, the categorization
//! engine and the service layer: categories, products, stores and shopping
//! lists together with the invariants each of them maintains.

mod category;
mod error;
mod product;
mod shopping_list;
mod store;

pub use category::*;
pub use error::*;
pub use product::*;
pub use shopping_list::*;
pub use store::*;
