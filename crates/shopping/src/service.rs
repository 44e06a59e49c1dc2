//! List, product and store management on top of a [`ShopStore`].

use std::sync::Arc;

use entities::{Category, Location, Product, Quantity, ShoppingList, Store, StoreType};
use shop_store::{CategoryFilter, ProductFilter, ShopStore, ShoppingListFilter, StoreFilter};
use uuid::Uuid;

use crate::{
    CategorySeed, ListStoreView, ShoppingError, ShoppingResult, StoreView, Suggestion,
    build_list_store_view, build_store_view, default_category_order, suggest,
};

/// Input for creating a product, as entered in a product form.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    /// Amount as typed; defaults to one.
    pub amount: Option<String>,
    /// Unit; falls back to the category's default unit, then to pieces.
    pub unit: Option<String>,
    /// Category; suggested from the name when absent.
    pub category_id: Option<Uuid>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Service applying shopping list operations to a store.
///
/// Every mutation loads one entity, changes it in memory and writes it back
/// in a single store call. Nothing is returned to the caller before the
/// write has succeeded.
pub struct ShoppingService<S: ShopStore> {
    store: Arc<S>,
}

impl<S: ShopStore> Clone for ShoppingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ShopStore> ShoppingService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Inserts `catalog` when the store has no categories yet.
    ///
    /// The catalog is written in one batch, so a failed seed leaves no
    /// categories behind and the next call starts over. Returns the number
    /// of categories created; zero when categories already exist.
    pub async fn seed_categories(&self, catalog: &[CategorySeed]) -> ShoppingResult<usize> {
        let existing = self.store.count_categories().await?;
        if existing > 0 {
            tracing::debug!(existing, "Categories present, skipping seed");
            return Ok(0);
        }

        let categories = catalog.iter().map(CategorySeed::to_category).collect();
        let created = self.store.create_categories(categories).await?;
        tracing::info!(count = created.len(), "Seeded built-in categories");
        Ok(created.len())
    }

    /// All categories, by name.
    pub async fn categories(&self) -> ShoppingResult<Vec<Category>> {
        Ok(self.store.list_categories(CategoryFilter::default()).await?)
    }

    /// Creates a user defined category.
    pub async fn create_category(
        &self,
        name: &str,
        keywords: &[String],
        default_unit: Option<&str>,
    ) -> ShoppingResult<Category> {
        if name.trim().is_empty() {
            return Err(entities::EntityError::EmptyName.into());
        }
        let mut category = Category::new(name).with_keywords(keywords);
        if let Some(unit) = default_unit {
            category = category.with_default_unit(unit);
        }
        let category = self.store.create_category(category).await?;
        tracing::debug!(category_id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    /// Deletes a category. Its products become uncategorized.
    pub async fn delete_category(&self, id: Uuid) -> ShoppingResult<()> {
        self.store.delete_category(id).await?;
        tracing::debug!(category_id = %id, "Deleted category");
        Ok(())
    }

    /// Suggests a category for a product name.
    pub async fn suggest_category(&self, product_name: &str) -> ShoppingResult<Option<Suggestion>> {
        let categories = self.categories().await?;
        Ok(suggest(product_name, &categories))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product from form input.
    ///
    /// Without an explicit category the name is matched against the
    /// categories, and the match also provides the unit when none was given.
    pub async fn create_product(&self, draft: ProductDraft) -> ShoppingResult<Product> {
        let mut category_id = draft.category_id;
        let mut unit = draft.unit.filter(|u| !u.trim().is_empty());

        match category_id {
            Some(id) => {
                let category = self.require_category(id).await?;
                if unit.is_none() {
                    unit = category.default_unit;
                }
            }
            None => {
                if let Some(suggestion) = self.suggest_category(&draft.name).await? {
                    tracing::debug!(
                        product = %draft.name,
                        category = %suggestion.category_name,
                        keyword = %suggestion.matched_keyword,
                        "Suggested category"
                    );
                    category_id = Some(suggestion.category_id);
                    if unit.is_none() {
                        unit = suggestion.default_unit;
                    }
                }
            }
        }

        let amount = draft.amount.as_deref().unwrap_or("1");
        let quantity = Quantity::parse(amount, unit.unwrap_or_default())?;
        let mut product = Product::new(draft.name, quantity)?;
        product.category_id = category_id;

        let product = self.store.create_product(product).await?;
        tracing::debug!(product_id = %product.id, name = %product.name(), "Created product");
        Ok(product)
    }

    /// Products matching `filter`, by name.
    pub async fn products(&self, filter: ProductFilter) -> ShoppingResult<Vec<Product>> {
        Ok(self.store.list_products(filter).await?)
    }

    pub async fn rename_product(&self, id: Uuid, name: &str) -> ShoppingResult<Product> {
        let mut product = self.require_product(id).await?;
        product.rename(name)?;
        Ok(self.store.update_product(product).await?)
    }

    /// Replaces a product's quantity. Without a unit the current one is kept.
    pub async fn update_product_quantity(
        &self,
        id: Uuid,
        amount: &str,
        unit: Option<&str>,
    ) -> ShoppingResult<Product> {
        let mut product = self.require_product(id).await?;
        let unit = unit.unwrap_or(product.quantity.unit()).to_string();
        let quantity = Quantity::parse(amount, unit)?;
        product.set_quantity(quantity);
        Ok(self.store.update_product(product).await?)
    }

    /// Moves a product to another category, or clears its category.
    pub async fn set_product_category(
        &self,
        id: Uuid,
        category_id: Option<Uuid>,
    ) -> ShoppingResult<Product> {
        if let Some(category_id) = category_id {
            self.require_category(category_id).await?;
        }
        let mut product = self.require_product(id).await?;
        product.set_category(category_id);
        Ok(self.store.update_product(product).await?)
    }

    /// Deletes a product and removes it from every list.
    pub async fn delete_product(&self, id: Uuid) -> ShoppingResult<()> {
        self.store.delete_product(id).await?;
        tracing::debug!(product_id = %id, "Deleted product");
        Ok(())
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Creates a store arranged by its type's default categories.
    pub async fn create_store(
        &self,
        name: &str,
        store_type: StoreType,
        location: Location,
    ) -> ShoppingResult<Store> {
        if name.trim().is_empty() {
            return Err(entities::EntityError::EmptyName.into());
        }
        let categories = self.categories().await?;
        let order = default_category_order(store_type, &categories);
        let store = Store::new(name, store_type, location).with_category_order(order)?;

        let store = self.store.create_store(store).await?;
        tracing::info!(
            store_id = %store.id,
            store_type = %store.store_type,
            categories = store.category_order().len(),
            "Created store"
        );
        Ok(store)
    }

    /// Stores matching `filter`, by name.
    pub async fn stores(&self, filter: StoreFilter) -> ShoppingResult<Vec<Store>> {
        Ok(self.store.list_stores(filter).await?)
    }

    /// Appends a category to a store. Returns false if it was already there.
    pub async fn add_store_category(&self, store_id: Uuid, category_id: Uuid) -> ShoppingResult<bool> {
        self.require_category(category_id).await?;
        let mut store = self.require_store(store_id).await?;
        if !store.add_category(category_id) {
            return Ok(false);
        }
        self.store.update_store(store).await?;
        Ok(true)
    }

    /// Removes a category from a store. Returns false if it was not there.
    pub async fn remove_store_category(
        &self,
        store_id: Uuid,
        category_id: Uuid,
    ) -> ShoppingResult<bool> {
        let mut store = self.require_store(store_id).await?;
        if !store.remove_category(category_id) {
            return Ok(false);
        }
        self.store.update_store(store).await?;
        Ok(true)
    }

    /// Moves the category at position `from` to position `to`.
    pub async fn move_store_category(
        &self,
        store_id: Uuid,
        from: usize,
        to: usize,
    ) -> ShoppingResult<Store> {
        let mut store = self.require_store(store_id).await?;
        store.move_category(from, to)?;
        Ok(self.store.update_store(store).await?)
    }

    /// Replaces a store's whole category order.
    pub async fn set_store_category_order(
        &self,
        store_id: Uuid,
        order: Vec<Uuid>,
    ) -> ShoppingResult<Store> {
        let mut store = self.require_store(store_id).await?;
        store.set_category_order(order)?;
        Ok(self.store.update_store(store).await?)
    }

    pub async fn delete_store(&self, id: Uuid) -> ShoppingResult<()> {
        self.store.delete_store(id).await?;
        tracing::debug!(store_id = %id, "Deleted store");
        Ok(())
    }

    /// All products available at a store, grouped by the store's categories.
    pub async fn store_view(&self, store_id: Uuid) -> ShoppingResult<StoreView> {
        let store = self.require_store(store_id).await?;
        let categories = self.categories().await?;
        let products = self.store.list_products(ProductFilter::default()).await?;
        Ok(build_store_view(&store, &products, &categories))
    }

    // =========================================================================
    // Shopping lists
    // =========================================================================

    pub async fn create_list(&self, name: &str) -> ShoppingResult<ShoppingList> {
        let list = self.store.create_shopping_list(ShoppingList::new(name)?).await?;
        tracing::debug!(list_id = %list.id, name = %list.name(), "Created shopping list");
        Ok(list)
    }

    /// Shopping lists, most recently updated first.
    pub async fn lists(&self, filter: ShoppingListFilter) -> ShoppingResult<Vec<ShoppingList>> {
        Ok(self.store.list_shopping_lists(filter).await?)
    }

    pub async fn list(&self, list_id: Uuid) -> ShoppingResult<ShoppingList> {
        self.require_list(list_id).await
    }

    /// Adds a product to a list. Returns false if it was already listed.
    pub async fn add_product_to_list(&self, list_id: Uuid, product_id: Uuid) -> ShoppingResult<bool> {
        self.require_product(product_id).await?;
        let mut list = self.require_list(list_id).await?;
        if !list.add_product(product_id) {
            return Ok(false);
        }
        self.store.update_shopping_list(list).await?;
        tracing::debug!(list_id = %list_id, product_id = %product_id, "Added product to list");
        Ok(true)
    }

    /// Removes a product from a list. Returns false if it was not listed.
    pub async fn remove_product_from_list(
        &self,
        list_id: Uuid,
        product_id: Uuid,
    ) -> ShoppingResult<bool> {
        let mut list = self.require_list(list_id).await?;
        if !list.remove_product(product_id) {
            return Ok(false);
        }
        self.store.update_shopping_list(list).await?;
        Ok(true)
    }

    /// Flips a product's checked state on a list and returns the new state.
    pub async fn toggle_list_item(&self, list_id: Uuid, product_id: Uuid) -> ShoppingResult<bool> {
        let mut list = self.require_list(list_id).await?;
        let checked = list
            .toggle_product(product_id)
            .ok_or(ShoppingError::NotInList {
                list_id,
                product_id,
            })?;
        self.store.update_shopping_list(list).await?;
        Ok(checked)
    }

    /// Unchecks every item on a list. Returns how many were checked.
    pub async fn clear_checked(&self, list_id: Uuid) -> ShoppingResult<usize> {
        let mut list = self.require_list(list_id).await?;
        let cleared = list.clear_checked();
        if cleared > 0 {
            self.store.update_shopping_list(list).await?;
        }
        Ok(cleared)
    }

    pub async fn rename_list(&self, list_id: Uuid, name: &str) -> ShoppingResult<ShoppingList> {
        let mut list = self.require_list(list_id).await?;
        list.rename(name)?;
        Ok(self.store.update_shopping_list(list).await?)
    }

    /// Deletes a list and its items. Products are kept.
    pub async fn delete_list(&self, list_id: Uuid) -> ShoppingResult<()> {
        self.store.delete_shopping_list(list_id).await?;
        tracing::debug!(list_id = %list_id, "Deleted shopping list");
        Ok(())
    }

    /// The products on a list as arranged in one store.
    pub async fn list_store_view(
        &self,
        list_id: Uuid,
        store_id: Uuid,
    ) -> ShoppingResult<ListStoreView> {
        let list = self.require_list(list_id).await?;
        let store = self.require_store(store_id).await?;
        let categories = self.categories().await?;

        let mut products = Vec::with_capacity(list.items().len());
        for item in list.items() {
            match self.store.get_product(item.product_id).await? {
                Some(product) => products.push(product),
                None => tracing::warn!(
                    list_id = %list_id,
                    product_id = %item.product_id,
                    "Skipping list item for missing product"
                ),
            }
        }

        Ok(build_list_store_view(&list, &store, &products, &categories))
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    async fn require_category(&self, id: Uuid) -> ShoppingResult<Category> {
        self.store
            .get_category(id)
            .await?
            .ok_or(ShoppingError::not_found("Category", id))
    }

    async fn require_product(&self, id: Uuid) -> ShoppingResult<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or(ShoppingError::not_found("Product", id))
    }

    async fn require_store(&self, id: Uuid) -> ShoppingResult<Store> {
        self.store
            .get_store(id)
            .await?
            .ok_or(ShoppingError::not_found("Store", id))
    }

    async fn require_list(&self, id: Uuid) -> ShoppingResult<ShoppingList> {
        self.store
            .get_shopping_list(id)
            .await?
            .ok_or(ShoppingError::not_found("ShoppingList", id))
    }
}

#[cfg(test)]
mod tests {
    use entities::{EntityError, ListProgress};
    use rust_decimal::Decimal;
    use shop_store::MemoryShopStore;

    use super::*;
    use crate::BUILTIN_CATEGORIES;

    async fn seeded() -> ShoppingService<MemoryShopStore> {
        let service = ShoppingService::new(MemoryShopStore::new());
        service.seed_categories(BUILTIN_CATEGORIES).await.unwrap();
        service
    }

    fn category_named<'a>(categories: &'a [Category], name: &str) -> &'a Category {
        categories.iter().find(|c| c.name == name).unwrap()
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let service = ShoppingService::new(MemoryShopStore::new());

        let first = service.seed_categories(BUILTIN_CATEGORIES).await.unwrap();
        let second = service.seed_categories(BUILTIN_CATEGORIES).await.unwrap();

        assert_eq!(first, BUILTIN_CATEGORIES.len());
        assert_eq!(second, 0);
        assert_eq!(
            service.categories().await.unwrap().len(),
            BUILTIN_CATEGORIES.len()
        );
    }

    #[tokio::test]
    async fn test_failed_seed_can_be_retried() {
        let store = shop_store::SqliteShopStore::in_memory().await.unwrap();
        sqlx::raw_sql(
            "CREATE TRIGGER interrupt_seed BEFORE INSERT ON categories
             WHEN (SELECT COUNT(*) FROM categories) >= 2
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .execute(store.pool())
        .await
        .unwrap();
        let service = ShoppingService::new(store);

        let err = tokio_test::assert_err!(service.seed_categories(BUILTIN_CATEGORIES).await);
        assert!(matches!(err, ShoppingError::Store(_)));
        assert!(service.categories().await.unwrap().is_empty());

        sqlx::raw_sql("DROP TRIGGER interrupt_seed")
            .execute(service.store().pool())
            .await
            .unwrap();
        let created = tokio_test::assert_ok!(service.seed_categories(BUILTIN_CATEGORIES).await);
        assert_eq!(created, BUILTIN_CATEGORIES.len());
        assert_eq!(
            service.categories().await.unwrap().len(),
            BUILTIN_CATEGORIES.len()
        );
    }

    #[tokio::test]
    async fn test_seeding_skipped_when_user_categories_exist() {
        let service = ShoppingService::new(MemoryShopStore::new());
        service
            .create_category("Pets", &["cat food".to_string()], Some("kg"))
            .await
            .unwrap();

        assert_eq!(service.seed_categories(BUILTIN_CATEGORIES).await.unwrap(), 0);
        assert_eq!(service.categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_product_uses_suggestion() {
        let service = seeded().await;

        let product = service
            .create_product(ProductDraft::new("Lapte").with_amount("2"))
            .await
            .unwrap();

        let categories = service.categories().await.unwrap();
        assert_eq!(
            product.category_id,
            Some(category_named(&categories, "Dairy").id)
        );
        assert_eq!(product.quantity.unit(), "L");
        assert_eq!(product.quantity.amount(), Decimal::new(2, 0));
    }

    #[tokio::test]
    async fn test_create_product_keeps_explicit_values() {
        let service = seeded().await;
        let categories = service.categories().await.unwrap();
        let tools = category_named(&categories, "Tools").id;

        let product = service
            .create_product(
                ProductDraft::new("Milk frother")
                    .with_category(tools)
                    .with_unit("pcs"),
            )
            .await
            .unwrap();

        assert_eq!(product.category_id, Some(tools));
        assert_eq!(product.quantity.unit(), "pcs");
    }

    #[tokio::test]
    async fn test_create_product_without_match_is_uncategorized() {
        let service = seeded().await;

        let product = service
            .create_product(ProductDraft::new("xyzzy123"))
            .await
            .unwrap();

        assert!(product.is_uncategorized());
        assert_eq!(product.quantity, Quantity::one());
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_input() {
        let service = seeded().await;

        let err = service
            .create_product(ProductDraft::new("Milk").with_amount("0"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShoppingError::Entity(EntityError::NonPositiveAmount(_))
        ));

        let err = service
            .create_product(ProductDraft::new("Milk").with_amount("lots"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShoppingError::Entity(EntityError::InvalidAmount(_))
        ));

        let err = service
            .create_product(ProductDraft::new("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ShoppingError::Entity(EntityError::EmptyName)));

        assert!(
            service
                .products(ProductFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_add_product_to_list_twice() {
        let service = seeded().await;
        let product = service
            .create_product(ProductDraft::new("Bread"))
            .await
            .unwrap();
        let list = service.create_list("Weekly").await.unwrap();

        assert!(service.add_product_to_list(list.id, product.id).await.unwrap());
        assert!(!service.add_product_to_list(list.id, product.id).await.unwrap());

        let list = service.list(list.id).await.unwrap();
        let matching = list
            .items()
            .iter()
            .filter(|i| i.product_id == product.id)
            .count();
        assert_eq!(matching, 1);
    }

    #[tokio::test]
    async fn test_add_missing_product_fails() {
        let service = seeded().await;
        let list = service.create_list("Weekly").await.unwrap();

        let err = service
            .add_product_to_list(list.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShoppingError::NotFound {
                entity_type: "Product",
                ..
            }
        ));
        assert!(service.list(list.id).await.unwrap().items().is_empty());
    }

    #[tokio::test]
    async fn test_checked_state_is_per_list() {
        let service = seeded().await;
        let milk = service
            .create_product(ProductDraft::new("Milk"))
            .await
            .unwrap();
        let weekly = service.create_list("Weekly").await.unwrap();
        let party = service.create_list("Party").await.unwrap();
        service.add_product_to_list(weekly.id, milk.id).await.unwrap();
        service.add_product_to_list(party.id, milk.id).await.unwrap();

        assert!(service.toggle_list_item(weekly.id, milk.id).await.unwrap());

        assert!(service.list(weekly.id).await.unwrap().is_checked(milk.id));
        assert!(!service.list(party.id).await.unwrap().is_checked(milk.id));

        assert_eq!(service.clear_checked(weekly.id).await.unwrap(), 1);
        assert!(!service.list(weekly.id).await.unwrap().is_checked(milk.id));
    }

    #[tokio::test]
    async fn test_toggle_unlisted_product_fails() {
        let service = seeded().await;
        let list = service.create_list("Weekly").await.unwrap();

        let err = service
            .toggle_list_item(list.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ShoppingError::NotInList { .. }));
    }

    #[tokio::test]
    async fn test_store_created_with_type_defaults() {
        let service = seeded().await;

        let store = service
            .create_store("Catena", StoreType::Pharmacy, Location::default())
            .await
            .unwrap();

        let categories = service.categories().await.unwrap();
        let names: Vec<&str> = store
            .category_order()
            .iter()
            .map(|id| {
                categories
                    .iter()
                    .find(|c| c.id == *id)
                    .unwrap()
                    .name
                    .as_str()
            })
            .collect();
        assert_eq!(names, ["Medicine", "First Aid", "Personal Care", "Baby"]);
    }

    #[tokio::test]
    async fn test_store_category_management() {
        let service = seeded().await;
        let categories = service.categories().await.unwrap();
        let garden = category_named(&categories, "Garden").id;
        let store = service
            .create_store("Catena", StoreType::Pharmacy, Location::default())
            .await
            .unwrap();

        assert!(service.add_store_category(store.id, garden).await.unwrap());
        assert!(!service.add_store_category(store.id, garden).await.unwrap());

        let moved = service.move_store_category(store.id, 4, 0).await.unwrap();
        assert_eq!(moved.category_order()[0], garden);

        let err = service
            .move_store_category(store.id, 0, 99)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShoppingError::Entity(EntityError::PositionOutOfRange { .. })
        ));

        assert!(service.remove_store_category(store.id, garden).await.unwrap());
        assert!(!service.remove_store_category(store.id, garden).await.unwrap());

        let err = service
            .set_store_category_order(store.id, vec![garden, garden])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShoppingError::Entity(EntityError::DuplicateCategory(_))
        ));
    }

    #[tokio::test]
    async fn test_store_view_groups_products() {
        let service = seeded().await;
        for name in ["Milk", "Bananas", "Hammer", "Apples", "Cheese"] {
            service
                .create_product(ProductDraft::new(name))
                .await
                .unwrap();
        }
        let store = service
            .create_store("Mega Image", StoreType::Grocery, Location::default())
            .await
            .unwrap();

        let view = service.store_view(store.id).await.unwrap();

        let groups: Vec<(&str, Vec<&str>)> = view
            .groups
            .iter()
            .map(|g| {
                (
                    g.category_name.as_str(),
                    g.products.iter().map(|p| p.name()).collect(),
                )
            })
            .collect();
        assert_eq!(
            groups,
            vec![
                ("Fruits & Vegetables", vec!["Apples", "Bananas"]),
                ("Dairy", vec!["Cheese", "Milk"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_store_view_progress() {
        let service = seeded().await;
        let milk = service
            .create_product(ProductDraft::new("Milk"))
            .await
            .unwrap();
        let bread = service
            .create_product(ProductDraft::new("Bread"))
            .await
            .unwrap();
        let nails = service
            .create_product(ProductDraft::new("Nails"))
            .await
            .unwrap();
        let list = service.create_list("Weekly").await.unwrap();
        for product in [&milk, &bread, &nails] {
            service.add_product_to_list(list.id, product.id).await.unwrap();
        }
        service.toggle_list_item(list.id, bread.id).await.unwrap();
        let store = service
            .create_store("Profi", StoreType::Convenience, Location::default())
            .await
            .unwrap();

        let view = service.list_store_view(list.id, store.id).await.unwrap();

        assert_eq!(view.progress, ListProgress { total: 2, checked: 1 });
        assert_eq!(view.other_products.len(), 1);
        assert_eq!(view.other_products[0].id, nails.id);
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes_products() {
        let service = seeded().await;
        let milk = service
            .create_product(ProductDraft::new("Milk"))
            .await
            .unwrap();
        let dairy = milk.category_id.unwrap();

        service.delete_category(dairy).await.unwrap();

        let products = service
            .products(ProductFilter {
                uncategorized: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, milk.id);
    }

    #[tokio::test]
    async fn test_delete_product_and_list() {
        let service = seeded().await;
        let milk = service
            .create_product(ProductDraft::new("Milk"))
            .await
            .unwrap();
        let bread = service
            .create_product(ProductDraft::new("Bread"))
            .await
            .unwrap();
        let list = service.create_list("Weekly").await.unwrap();
        service.add_product_to_list(list.id, milk.id).await.unwrap();
        service.add_product_to_list(list.id, bread.id).await.unwrap();

        service.delete_product(milk.id).await.unwrap();
        let fetched = service.list(list.id).await.unwrap();
        assert!(!fetched.contains(milk.id));
        assert!(fetched.contains(bread.id));

        service.delete_list(list.id).await.unwrap();
        assert!(matches!(
            service.list(list.id).await.unwrap_err(),
            ShoppingError::NotFound { .. }
        ));
        let products = service.products(ProductFilter::default()).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, bread.id);
    }

    #[tokio::test]
    async fn test_product_updates() {
        let service = seeded().await;
        let product = service
            .create_product(ProductDraft::new("Milk"))
            .await
            .unwrap();

        let renamed = service.rename_product(product.id, "Oat milk").await.unwrap();
        assert_eq!(renamed.name(), "Oat milk");

        let updated = service
            .update_product_quantity(product.id, "1.5", Some("mL"))
            .await
            .unwrap();
        assert_eq!(updated.quantity.to_string(), "1.5 mL");

        let updated = service
            .update_product_quantity(product.id, "2", None)
            .await
            .unwrap();
        assert_eq!(updated.quantity.to_string(), "2 mL");

        let cleared = service.set_product_category(product.id, None).await.unwrap();
        assert!(cleared.is_uncategorized());

        let err = service
            .set_product_category(product.id, Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShoppingError::NotFound {
                entity_type: "Category",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_works_with_sqlite_store() {
        let store = shop_store::SqliteShopStore::in_memory().await.unwrap();
        let service = ShoppingService::new(store);
        service.seed_categories(BUILTIN_CATEGORIES).await.unwrap();

        let hammer = service
            .create_product(ProductDraft::new("Hammer"))
            .await
            .unwrap();
        let store = service
            .create_store("Dedeman", StoreType::Hardware, Location::default())
            .await
            .unwrap();
        let list = service.create_list("DIY").await.unwrap();
        service.add_product_to_list(list.id, hammer.id).await.unwrap();
        service.add_product_to_list(list.id, hammer.id).await.unwrap();

        let view = service.list_store_view(list.id, store.id).await.unwrap();
        assert_eq!(view.view.groups.len(), 1);
        assert_eq!(view.view.groups[0].category_name, "Tools");
        assert_eq!(view.progress.total, 1);
    }
}
