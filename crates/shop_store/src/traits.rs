//! Shop store trait definitions.

use async_trait::async_trait;
use entities::{Category, Product, ShoppingList, Store, StoreType};
use uuid::Uuid;

use crate::ShopStoreResult;

/// Filter options for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    /// Case-insensitive substring of the category name.
    pub name_contains: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        name_matches(&category.name, self.name_contains.as_deref())
    }
}

/// Filter options for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Filter by category ID.
    pub category_id: Option<Uuid>,
    /// Only products without a category. Ignored when `category_id` is set.
    pub uncategorized: bool,
    /// Case-insensitive substring of the product name.
    pub name_contains: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let category_matches = match self.category_id {
            Some(category_id) => product.category_id == Some(category_id),
            None => !self.uncategorized || product.is_uncategorized(),
        };
        category_matches && name_matches(product.name(), self.name_contains.as_deref())
    }
}

/// Filter options for listing stores.
#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    /// Filter by store type.
    pub store_type: Option<StoreType>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

impl StoreFilter {
    pub fn matches(&self, store: &Store) -> bool {
        self.store_type.is_none_or(|t| store.store_type == t)
    }
}

/// Filter options for listing shopping lists.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListFilter {
    /// Only lists that contain this product.
    pub contains_product: Option<Uuid>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

impl ShoppingListFilter {
    pub fn matches(&self, list: &ShoppingList) -> bool {
        self.contains_product.is_none_or(|id| list.contains(id))
    }
}

fn name_matches(name: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| name.to_lowercase().contains(&needle.trim().to_lowercase()))
}

/// Ordering key used for name-sorted listings.
pub(crate) fn name_key(name: &str) -> (String, String) {
    (name.to_lowercase(), name.to_string())
}

/// Trait for shop storage operations.
///
/// Categories, products and stores are listed by name; shopping lists are
/// listed most recently updated first. Deletes cascade as follows:
/// deleting a category uncategorizes its products, deleting a product removes
/// it from every shopping list, deleting a shopping list removes its items.
/// Stores never cascade.
#[async_trait]
pub trait ShopStore: Send + Sync {
    // =========================================================================
    // Category operations
    // =========================================================================

    /// Creates a new category.
    async fn create_category(&self, category: Category) -> ShopStoreResult<Category>;

    /// Creates several categories at once. Either all are stored or none.
    async fn create_categories(&self, categories: Vec<Category>)
    -> ShopStoreResult<Vec<Category>>;

    /// Gets a category by ID.
    async fn get_category(&self, id: Uuid) -> ShopStoreResult<Option<Category>>;

    /// Lists categories with optional filters.
    async fn list_categories(&self, filter: CategoryFilter) -> ShopStoreResult<Vec<Category>>;

    /// Counts all categories.
    async fn count_categories(&self) -> ShopStoreResult<u32>;

    /// Updates a category.
    async fn update_category(&self, category: Category) -> ShopStoreResult<Category>;

    /// Deletes a category and clears it from every product.
    async fn delete_category(&self, id: Uuid) -> ShopStoreResult<()>;

    // =========================================================================
    // Product operations
    // =========================================================================

    /// Creates a new product.
    async fn create_product(&self, product: Product) -> ShopStoreResult<Product>;

    /// Gets a product by ID.
    async fn get_product(&self, id: Uuid) -> ShopStoreResult<Option<Product>>;

    /// Lists products with optional filters.
    async fn list_products(&self, filter: ProductFilter) -> ShopStoreResult<Vec<Product>>;

    /// Updates a product.
    async fn update_product(&self, product: Product) -> ShopStoreResult<Product>;

    /// Deletes a product and removes it from every shopping list.
    async fn delete_product(&self, id: Uuid) -> ShopStoreResult<()>;

    // =========================================================================
    // Store operations
    // =========================================================================

    /// Creates a new store.
    async fn create_store(&self, store: Store) -> ShopStoreResult<Store>;

    /// Gets a store by ID.
    async fn get_store(&self, id: Uuid) -> ShopStoreResult<Option<Store>>;

    /// Lists stores with optional filters.
    async fn list_stores(&self, filter: StoreFilter) -> ShopStoreResult<Vec<Store>>;

    /// Updates a store.
    async fn update_store(&self, store: Store) -> ShopStoreResult<Store>;

    /// Deletes a store.
    async fn delete_store(&self, id: Uuid) -> ShopStoreResult<()>;

    // =========================================================================
    // Shopping list operations
    // =========================================================================

    /// Creates a new shopping list together with its items.
    async fn create_shopping_list(&self, list: ShoppingList) -> ShopStoreResult<ShoppingList>;

    /// Gets a shopping list by ID.
    async fn get_shopping_list(&self, id: Uuid) -> ShopStoreResult<Option<ShoppingList>>;

    /// Lists shopping lists with optional filters.
    async fn list_shopping_lists(
        &self,
        filter: ShoppingListFilter,
    ) -> ShopStoreResult<Vec<ShoppingList>>;

    /// Replaces a shopping list and its items.
    async fn update_shopping_list(&self, list: ShoppingList) -> ShopStoreResult<ShoppingList>;

    /// Deletes a shopping list and its items.
    async fn delete_shopping_list(&self, id: Uuid) -> ShopStoreResult<()>;
}

#[cfg(test)]
mod tests {
    use entities::{Location, Quantity};

    use super::*;

    #[test]
    fn test_product_filter() {
        let category_id = Uuid::new_v4();
        let milk = Product::new("Milk", Quantity::one())
            .unwrap()
            .with_category(category_id);
        let hammer = Product::new("Hammer", Quantity::one()).unwrap();

        let by_category = ProductFilter {
            category_id: Some(category_id),
            ..Default::default()
        };
        assert!(by_category.matches(&milk));
        assert!(!by_category.matches(&hammer));

        let uncategorized = ProductFilter {
            uncategorized: true,
            ..Default::default()
        };
        assert!(!uncategorized.matches(&milk));
        assert!(uncategorized.matches(&hammer));

        let by_name = ProductFilter {
            name_contains: Some("MIL".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&milk));
        assert!(!by_name.matches(&hammer));
    }

    #[test]
    fn test_store_filter() {
        let store = Store::new("Catena", StoreType::Pharmacy, Location::default());

        assert!(StoreFilter::default().matches(&store));
        assert!(
            StoreFilter {
                store_type: Some(StoreType::Pharmacy),
                ..Default::default()
            }
            .matches(&store)
        );
        assert!(
            !StoreFilter {
                store_type: Some(StoreType::Hardware),
                ..Default::default()
            }
            .matches(&store)
        );
    }
}
