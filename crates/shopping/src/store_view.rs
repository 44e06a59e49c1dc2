//! Per-store product views.
//!
//! A store lists the categories it carries in aisle order. The view over a
//! product pool keeps the products whose category the store carries, groups
//! them in that order, and sorts each group by name.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use entities::{Category, ListProgress, Product, ShoppingList, Store};
use serde::Serialize;
use uuid::Uuid;

/// Products of one category as shown in a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreViewGroup {
    pub category_id: Uuid,
    pub category_name: String,
    /// Sorted by name.
    pub products: Vec<Product>,
}

/// Products available at one store, grouped in the store's category order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreView {
    pub store_id: Uuid,
    pub store_name: String,
    /// Never contains empty groups.
    pub groups: Vec<StoreViewGroup>,
}

impl StoreView {
    /// Number of products across all groups.
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.products.len()).sum()
    }

    /// Number of products in the view that are checked on `list`.
    pub fn checked_count(&self, list: &ShoppingList) -> usize {
        self.products().filter(|p| list.is_checked(p.id)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All products in display order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.groups.iter().flat_map(|g| g.products.iter())
    }
}

/// A shopping list seen through one store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListStoreView {
    pub list_id: Uuid,
    pub list_name: String,
    /// Listed products the store carries.
    pub view: StoreView,
    /// Listed products the store does not carry, sorted by name.
    pub other_products: Vec<Product>,
    /// Progress over the products in `view`.
    pub progress: ListProgress,
}

/// Builds the view of `products` for `store`.
///
/// Products without a category, or whose category the store does not carry,
/// are left out. Category ids in the store order that do not resolve to a
/// category in `categories` are skipped.
pub fn build_store_view(store: &Store, products: &[Product], categories: &[Category]) -> StoreView {
    let by_id: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let carried: HashSet<Uuid> = store.category_order().iter().copied().collect();

    let available: Vec<&Product> = products
        .iter()
        .filter(|p| p.category_id.is_some_and(|id| carried.contains(&id)))
        .collect();

    let mut groups = Vec::new();
    for category_id in store.category_order() {
        let mut selection: Vec<Product> = available
            .iter()
            .filter(|p| p.category_id == Some(*category_id))
            .map(|p| (*p).clone())
            .collect();
        if selection.is_empty() {
            continue;
        }
        let Some(category) = by_id.get(category_id) else {
            tracing::debug!(
                store_id = %store.id,
                category_id = %category_id,
                "Skipping unknown category in store order"
            );
            continue;
        };

        selection.sort_by(|a, b| compare_names(a.name(), b.name()));
        groups.push(StoreViewGroup {
            category_id: *category_id,
            category_name: category.name.clone(),
            products: selection,
        });
    }

    StoreView {
        store_id: store.id,
        store_name: store.name.clone(),
        groups,
    }
}

/// Builds the view of the products on `list` for `store`.
///
/// `products` may hold more than the listed products; anything not on the
/// list is ignored. List items whose product is missing are skipped.
pub fn build_list_store_view(
    list: &ShoppingList,
    store: &Store,
    products: &[Product],
    categories: &[Category],
) -> ListStoreView {
    let listed: Vec<Product> = products
        .iter()
        .filter(|p| list.contains(p.id))
        .cloned()
        .collect();

    let view = build_store_view(store, &listed, categories);
    let shown: HashSet<Uuid> = view.products().map(|p| p.id).collect();

    let mut other_products: Vec<Product> = listed
        .into_iter()
        .filter(|p| !shown.contains(&p.id))
        .collect();
    other_products.sort_by(|a, b| compare_names(a.name(), b.name()));

    let progress = ListProgress {
        total: view.total_count(),
        checked: view.checked_count(list),
    };

    ListStoreView {
        list_id: list.id,
        list_name: list.name().to_string(),
        view,
        other_products,
        progress,
    }
}

/// Case-insensitive name order, falling back to the raw names.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
