//! Shopping list core.
//!
//! Keyword based category suggestions, per-store product views, the built-in
//! category catalog, and [`ShoppingService`] which applies list and store
//! mutations on top of a [`shop_store::ShopStore`].

pub mod categorize;
mod error;
pub mod seed;
mod service;
pub mod store_view;

pub use categorize::{Suggestion, suggest, suggest_category};
pub use error::*;
pub use seed::{BUILTIN_CATEGORIES, CategorySeed, default_category_order};
pub use service::*;
pub use store_view::{
    ListStoreView, StoreView, StoreViewGroup, build_list_store_view, build_store_view,
};
