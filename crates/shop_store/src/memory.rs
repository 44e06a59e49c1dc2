//! In-memory shop store implementation for testing.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use entities::{Category, Product, ShoppingList, Store};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    CategoryFilter, ProductFilter, ShopStore, ShopStoreError, ShopStoreResult, ShoppingListFilter,
    StoreFilter, traits::name_key,
};

/// In-memory shop store for testing purposes.
///
/// Locks are always taken in the order categories, products, stores,
/// shopping lists.
#[derive(Debug, Default)]
pub struct MemoryShopStore {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    stores: Arc<RwLock<HashMap<Uuid, Store>>>,
    shopping_lists: Arc<RwLock<HashMap<Uuid, ShoppingList>>>,
}

impl MemoryShopStore {
    /// Creates a new in-memory shop store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_limit<T>(mut result: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit {
        result.truncate(limit as usize);
    }
    result
}

#[async_trait]
impl ShopStore for MemoryShopStore {
    // =========================================================================
    // Category operations
    // =========================================================================

    async fn create_category(&self, category: Category) -> ShopStoreResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.contains_key(&category.id) {
            return Err(ShopStoreError::already_exists("Category", category.id));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn create_categories(
        &self,
        new_categories: Vec<Category>,
    ) -> ShopStoreResult<Vec<Category>> {
        let mut categories = self.categories.write().await;
        let mut batch = HashSet::with_capacity(new_categories.len());
        for category in &new_categories {
            if categories.contains_key(&category.id) || !batch.insert(category.id) {
                return Err(ShopStoreError::already_exists("Category", category.id));
            }
        }
        for category in &new_categories {
            categories.insert(category.id, category.clone());
        }
        Ok(new_categories)
    }

    async fn get_category(&self, id: Uuid) -> ShopStoreResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn list_categories(&self, filter: CategoryFilter) -> ShopStoreResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        result.sort_by_cached_key(|c| name_key(&c.name));
        Ok(apply_limit(result, filter.limit))
    }

    async fn count_categories(&self) -> ShopStoreResult<u32> {
        let categories = self.categories.read().await;
        Ok(categories.len() as u32)
    }

    async fn update_category(&self, category: Category) -> ShopStoreResult<Category> {
        let mut categories = self.categories.write().await;
        if !categories.contains_key(&category.id) {
            return Err(ShopStoreError::not_found("Category", category.id));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> ShopStoreResult<()> {
        let mut categories = self.categories.write().await;
        let mut products = self.products.write().await;
        if categories.remove(&id).is_none() {
            return Err(ShopStoreError::not_found("Category", id));
        }
        for product in products.values_mut() {
            if product.category_id == Some(id) {
                product.set_category(None);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Product operations
    // =========================================================================

    async fn create_product(&self, product: Product) -> ShopStoreResult<Product> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(ShopStoreError::already_exists("Product", product.id));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> ShopStoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list_products(&self, filter: ProductFilter) -> ShopStoreResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        result.sort_by_cached_key(|p| name_key(p.name()));
        Ok(apply_limit(result, filter.limit))
    }

    async fn update_product(&self, product: Product) -> ShopStoreResult<Product> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(ShopStoreError::not_found("Product", product.id));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> ShopStoreResult<()> {
        let mut products = self.products.write().await;
        let mut lists = self.shopping_lists.write().await;
        if products.remove(&id).is_none() {
            return Err(ShopStoreError::not_found("Product", id));
        }
        for list in lists.values_mut() {
            list.remove_product(id);
        }
        Ok(())
    }

    // =========================================================================
    // Store operations
    // =========================================================================

    async fn create_store(&self, store: Store) -> ShopStoreResult<Store> {
        let mut stores = self.stores.write().await;
        if stores.contains_key(&store.id) {
            return Err(ShopStoreError::already_exists("Store", store.id));
        }
        stores.insert(store.id, store.clone());
        Ok(store)
    }

    async fn get_store(&self, id: Uuid) -> ShopStoreResult<Option<Store>> {
        let stores = self.stores.read().await;
        Ok(stores.get(&id).cloned())
    }

    async fn list_stores(&self, filter: StoreFilter) -> ShopStoreResult<Vec<Store>> {
        let stores = self.stores.read().await;
        let mut result: Vec<Store> = stores
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        result.sort_by_cached_key(|s| name_key(&s.name));
        Ok(apply_limit(result, filter.limit))
    }

    async fn update_store(&self, store: Store) -> ShopStoreResult<Store> {
        let mut stores = self.stores.write().await;
        if !stores.contains_key(&store.id) {
            return Err(ShopStoreError::not_found("Store", store.id));
        }
        stores.insert(store.id, store.clone());
        Ok(store)
    }

    async fn delete_store(&self, id: Uuid) -> ShopStoreResult<()> {
        let mut stores = self.stores.write().await;
        if stores.remove(&id).is_none() {
            return Err(ShopStoreError::not_found("Store", id));
        }
        Ok(())
    }

    // =========================================================================
    // Shopping list operations
    // =========================================================================

    async fn create_shopping_list(&self, list: ShoppingList) -> ShopStoreResult<ShoppingList> {
        let mut lists = self.shopping_lists.write().await;
        if lists.contains_key(&list.id) {
            return Err(ShopStoreError::already_exists("ShoppingList", list.id));
        }
        lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn get_shopping_list(&self, id: Uuid) -> ShopStoreResult<Option<ShoppingList>> {
        let lists = self.shopping_lists.read().await;
        Ok(lists.get(&id).cloned())
    }

    async fn list_shopping_lists(
        &self,
        filter: ShoppingListFilter,
    ) -> ShopStoreResult<Vec<ShoppingList>> {
        let lists = self.shopping_lists.read().await;
        let mut result: Vec<ShoppingList> = lists
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(apply_limit(result, filter.limit))
    }

    async fn update_shopping_list(&self, list: ShoppingList) -> ShopStoreResult<ShoppingList> {
        let mut lists = self.shopping_lists.write().await;
        if !lists.contains_key(&list.id) {
            return Err(ShopStoreError::not_found("ShoppingList", list.id));
        }
        lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn delete_shopping_list(&self, id: Uuid) -> ShopStoreResult<()> {
        let mut lists = self.shopping_lists.write().await;
        if lists.remove(&id).is_none() {
            return Err(ShopStoreError::not_found("ShoppingList", id));
        }
        Ok(())
    }
}
