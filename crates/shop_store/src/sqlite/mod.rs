//! SQLite-backed shop store.

mod schema;

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use entities::{Category, Product, ShoppingList, ShoppingListItem, Store};
use sqlx::{
    Pool, QueryBuilder, Sqlite, SqliteConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use uuid::Uuid;

use self::schema::*;
use crate::{
    CategoryFilter, ProductFilter, ShopStore, ShopStoreError, ShopStoreResult, ShoppingListFilter,
    StoreFilter, traits::name_key,
};

const CATEGORY_COLUMNS: &str = "id, name, keywords, default_unit, created_at";
const PRODUCT_COLUMNS: &str =
    "id, name, category_id, quantity_amount, quantity_unit, created_at, updated_at";
const STORE_COLUMNS: &str = "id, name, store_type, latitude, longitude, address, category_order, \
                             created_at, updated_at";
const LIST_COLUMNS: &str = "id, name, created_at, updated_at";

/// Maps a unique constraint violation on insert to `AlreadyExists`.
fn map_insert_error(error: sqlx::Error, entity_type: &'static str, id: Uuid) -> ShopStoreError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return ShopStoreError::already_exists(entity_type, id);
        }
    }
    ShopStoreError::Database(error)
}

fn apply_limit<T>(mut result: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit {
        result.truncate(limit as usize);
    }
    result
}

/// Shop store persisting to an embedded SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteShopStore {
    pool: Pool<Sqlite>,
}

impl SqliteShopStore {
    /// Connects to the database at `database_url`, creating it if needed.
    pub async fn connect(database_url: &str) -> ShopStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that never expires.
    pub async fn in_memory() -> ShopStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::with_pool(pool).await
    }

    /// Wraps an existing pool and makes sure the schema exists.
    pub async fn with_pool(pool: Pool<Sqlite>) -> ShopStoreResult<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn run_migrations(&self) -> ShopStoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("Shop store schema is up to date");
        Ok(())
    }

    async fn load_items(
        conn: &mut SqliteConnection,
        list_id: &str,
    ) -> ShopStoreResult<Vec<ShoppingListItem>> {
        let rows: Vec<ShoppingListItemRow> = sqlx::query_as(
            "SELECT id, list_id, product_id, is_checked, added_at
             FROM shopping_list_items
             WHERE list_id = ?
             ORDER BY position",
        )
        .bind(list_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(ShoppingListItem::try_from).collect()
    }

    async fn insert_items(conn: &mut SqliteConnection, list: &ShoppingList) -> ShopStoreResult<()> {
        for (position, item) in list.items().iter().enumerate() {
            sqlx::query(
                "INSERT INTO shopping_list_items
                 (id, list_id, product_id, is_checked, added_at, position)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(item.id.to_string())
            .bind(list.id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.is_checked)
            .bind(format_timestamp(&item.added_at))
            .bind(position as i64)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ShopStore for SqliteShopStore {
    // =========================================================================
    // Category operations
    // =========================================================================

    async fn create_category(&self, category: Category) -> ShopStoreResult<Category> {
        let row = CategoryRow::from_category(&category)?;

        sqlx::query(
            "INSERT INTO categories (id, name, keywords, default_unit, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.keywords)
        .bind(&row.default_unit)
        .bind(&row.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "Category", category.id))?;

        Ok(category)
    }

    async fn create_categories(&self, categories: Vec<Category>) -> ShopStoreResult<Vec<Category>> {
        let mut tx = self.pool.begin().await?;

        for category in &categories {
            let row = CategoryRow::from_category(category)?;
            sqlx::query(
                "INSERT INTO categories (id, name, keywords, default_unit, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&row.id)
            .bind(&row.name)
            .bind(&row.keywords)
            .bind(&row.default_unit)
            .bind(&row.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, "Category", category.id))?;
        }

        tx.commit().await?;
        tracing::debug!(count = categories.len(), "Created categories");
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> ShopStoreResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Category::try_from).transpose()
    }

    async fn list_categories(&self, filter: CategoryFilter) -> ShopStoreResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let category = Category::try_from(row)?;
            if filter.matches(&category) {
                result.push(category);
            }
        }
        result.sort_by_cached_key(|c| name_key(&c.name));
        Ok(apply_limit(result, filter.limit))
    }

    async fn count_categories(&self) -> ShopStoreResult<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u32)
    }

    async fn update_category(&self, category: Category) -> ShopStoreResult<Category> {
        let row = CategoryRow::from_category(&category)?;

        let result = sqlx::query(
            "UPDATE categories SET name = ?, keywords = ?, default_unit = ?
             WHERE id = ?",
        )
        .bind(&row.name)
        .bind(&row.keywords)
        .bind(&row.default_unit)
        .bind(&row.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("Category", category.id));
        }
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> ShopStoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("Category", id));
        }

        let cleared = sqlx::query(
            "UPDATE products SET category_id = NULL, updated_at = ?
             WHERE category_id = ?",
        )
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            category_id = %id,
            uncategorized = cleared.rows_affected(),
            "Deleted category"
        );
        Ok(())
    }

    // =========================================================================
    // Product operations
    // =========================================================================

    async fn create_product(&self, product: Product) -> ShopStoreResult<Product> {
        let row = ProductRow::from(&product);

        sqlx::query(
            "INSERT INTO products
             (id, name, category_id, quantity_amount, quantity_unit, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.category_id)
        .bind(&row.quantity_amount)
        .bind(&row.quantity_unit)
        .bind(&row.created_at)
        .bind(&row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "Product", product.id))?;

        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> ShopStoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn list_products(&self, filter: ProductFilter) -> ShopStoreResult<Vec<Product>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        if let Some(category_id) = filter.category_id {
            query.push(" WHERE category_id = ").push_bind(category_id.to_string());
        } else if filter.uncategorized {
            query.push(" WHERE category_id IS NULL");
        }

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let product = Product::try_from(row)?;
            if filter.matches(&product) {
                result.push(product);
            }
        }
        result.sort_by_cached_key(|p| name_key(p.name()));
        Ok(apply_limit(result, filter.limit))
    }

    async fn update_product(&self, product: Product) -> ShopStoreResult<Product> {
        let row = ProductRow::from(&product);

        let result = sqlx::query(
            "UPDATE products
             SET name = ?, category_id = ?, quantity_amount = ?, quantity_unit = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&row.name)
        .bind(&row.category_id)
        .bind(&row.quantity_amount)
        .bind(&row.quantity_unit)
        .bind(&row.updated_at)
        .bind(&row.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("Product", product.id));
        }
        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> ShopStoreResult<()> {
        let id_text = id.to_string();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(&id_text)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("Product", id));
        }

        sqlx::query(
            "UPDATE shopping_lists SET updated_at = ?
             WHERE id IN (SELECT list_id FROM shopping_list_items WHERE product_id = ?)",
        )
        .bind(format_timestamp(&Utc::now()))
        .bind(&id_text)
        .execute(&mut *tx)
        .await?;

        let removed = sqlx::query("DELETE FROM shopping_list_items WHERE product_id = ?")
            .bind(&id_text)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            product_id = %id,
            list_items = removed.rows_affected(),
            "Deleted product"
        );
        Ok(())
    }

    // =========================================================================
    // Store operations
    // =========================================================================

    async fn create_store(&self, store: Store) -> ShopStoreResult<Store> {
        let row = StoreRow::from_store(&store)?;

        sqlx::query(
            "INSERT INTO stores
             (id, name, store_type, latitude, longitude, address, category_order, created_at,
              updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.store_type)
        .bind(row.latitude)
        .bind(row.longitude)
        .bind(&row.address)
        .bind(&row.category_order)
        .bind(&row.created_at)
        .bind(&row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "Store", store.id))?;

        Ok(store)
    }

    async fn get_store(&self, id: Uuid) -> ShopStoreResult<Option<Store>> {
        let row: Option<StoreRow> =
            sqlx::query_as(&format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Store::try_from).transpose()
    }

    async fn list_stores(&self, filter: StoreFilter) -> ShopStoreResult<Vec<Store>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {STORE_COLUMNS} FROM stores"));
        if let Some(store_type) = filter.store_type {
            query.push(" WHERE store_type = ").push_bind(store_type.as_str());
        }

        let rows: Vec<StoreRow> = query.build_query_as().fetch_all(&self.pool).await?;
        let mut result = rows
            .into_iter()
            .map(Store::try_from)
            .collect::<ShopStoreResult<Vec<_>>>()?;
        result.sort_by_cached_key(|s| name_key(&s.name));
        Ok(apply_limit(result, filter.limit))
    }

    async fn update_store(&self, store: Store) -> ShopStoreResult<Store> {
        let row = StoreRow::from_store(&store)?;

        let result = sqlx::query(
            "UPDATE stores
             SET name = ?, store_type = ?, latitude = ?, longitude = ?, address = ?,
                 category_order = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&row.name)
        .bind(&row.store_type)
        .bind(row.latitude)
        .bind(row.longitude)
        .bind(&row.address)
        .bind(&row.category_order)
        .bind(&row.updated_at)
        .bind(&row.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("Store", store.id));
        }
        Ok(store)
    }

    async fn delete_store(&self, id: Uuid) -> ShopStoreResult<()> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("Store", id));
        }
        Ok(())
    }

    // =========================================================================
    // Shopping list operations
    // =========================================================================

    async fn create_shopping_list(&self, list: ShoppingList) -> ShopStoreResult<ShoppingList> {
        let row = ShoppingListRow::from(&list);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO shopping_lists (id, name, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.created_at)
        .bind(&row.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, "ShoppingList", list.id))?;

        Self::insert_items(&mut tx, &list).await?;
        tx.commit().await?;

        Ok(list)
    }

    async fn get_shopping_list(&self, id: Uuid) -> ShopStoreResult<Option<ShoppingList>> {
        let mut conn = self.pool.acquire().await?;

        let row: Option<ShoppingListRow> = sqlx::query_as(&format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => {
                let items = Self::load_items(&mut conn, &row.id).await?;
                Ok(Some(row.into_shopping_list(items)?))
            }
            None => Ok(None),
        }
    }

    async fn list_shopping_lists(
        &self,
        filter: ShoppingListFilter,
    ) -> ShopStoreResult<Vec<ShoppingList>> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<ShoppingListRow> = sqlx::query_as(&format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists ORDER BY updated_at DESC, id"
        ))
        .fetch_all(&mut *conn)
        .await?;

        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            let items = Self::load_items(&mut conn, &row.id).await?;
            let list = row.into_shopping_list(items)?;
            if filter.matches(&list) {
                lists.push(list);
            }
        }
        Ok(apply_limit(lists, filter.limit))
    }

    async fn update_shopping_list(&self, list: ShoppingList) -> ShopStoreResult<ShoppingList> {
        let row = ShoppingListRow::from(&list);
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE shopping_lists SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&row.name)
            .bind(&row.updated_at)
            .bind(&row.id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("ShoppingList", list.id));
        }

        sqlx::query("DELETE FROM shopping_list_items WHERE list_id = ?")
            .bind(&row.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_items(&mut tx, &list).await?;

        tx.commit().await?;
        Ok(list)
    }

    async fn delete_shopping_list(&self, id: Uuid) -> ShopStoreResult<()> {
        let id_text = id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM shopping_list_items WHERE list_id = ?")
            .bind(&id_text)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = ?")
            .bind(&id_text)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ShopStoreError::not_found("ShoppingList", id));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use entities::{Location, Quantity, StoreType};

    use super::*;

    #[tokio::test]
    async fn test_category_crud() {
        let store = SqliteShopStore::in_memory().await.unwrap();

        let category = Category::new("Dairy")
            .with_keywords(["milk", "lapte"])
            .with_default_unit("L");
        let created = store.create_category(category.clone()).await.unwrap();
        assert!(matches!(
            store.create_category(category).await,
            Err(ShopStoreError::AlreadyExists { .. })
        ));

        let fetched = store.get_category(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Dairy");
        assert_eq!(fetched.keywords(), ["milk", "lapte"]);
        assert_eq!(fetched.default_unit.as_deref(), Some("L"));
        assert_eq!(store.count_categories().await.unwrap(), 1);

        let mut renamed = fetched.clone();
        renamed.name = "Milk & Cheese".to_string();
        store.update_category(renamed).await.unwrap();
        let categories = store
            .list_categories(CategoryFilter {
                name_contains: Some("cheese".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(categories.len(), 1);

        store.delete_category(created.id).await.unwrap();
        assert!(store.get_category(created.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_category(created.id).await,
            Err(ShopStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes_products() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        let category = store.create_category(Category::new("Dairy")).await.unwrap();
        let product = Product::new("Milk", Quantity::parse("1.5", "L").unwrap())
            .unwrap()
            .with_category(category.id);
        let product = store.create_product(product).await.unwrap();

        store.delete_category(category.id).await.unwrap();

        let fetched = store.get_product(product.id).await.unwrap().unwrap();
        assert!(fetched.is_uncategorized());
        assert_eq!(fetched.quantity.to_string(), "1.5 L");
    }

    #[tokio::test]
    async fn test_list_products_by_category() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        let dairy = Uuid::new_v4();
        for (name, category_id) in [("Milk", Some(dairy)), ("Cheese", Some(dairy)), ("Nails", None)]
        {
            let mut product = Product::new(name, Quantity::one()).unwrap();
            product.category_id = category_id;
            store.create_product(product).await.unwrap();
        }

        let dairy_products = store
            .list_products(ProductFilter {
                category_id: Some(dairy),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<&str> = dairy_products.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["Cheese", "Milk"]);

        let uncategorized = store
            .list_products(ProductFilter {
                uncategorized: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(uncategorized.len(), 1);
        assert_eq!(uncategorized[0].name(), "Nails");
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let shop_store = SqliteShopStore::in_memory().await.unwrap();
        let order = vec![Uuid::new_v4(), Uuid::new_v4()];
        let store = Store::new(
            "Dedeman",
            StoreType::Hardware,
            Location::new(44.4, 26.1).with_address("Str. Exemplu 1"),
        )
        .with_category_order(order.clone())
        .unwrap();

        shop_store.create_store(store.clone()).await.unwrap();

        let fetched = shop_store.get_store(store.id).await.unwrap().unwrap();
        assert_eq!(fetched.category_order(), order.as_slice());
        assert_eq!(fetched.store_type, StoreType::Hardware);
        assert_eq!(fetched.location.address.as_deref(), Some("Str. Exemplu 1"));

        let pharmacies = shop_store
            .list_stores(StoreFilter {
                store_type: Some(StoreType::Pharmacy),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(pharmacies.is_empty());

        shop_store.delete_store(store.id).await.unwrap();
        assert!(shop_store.get_store(store.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shopping_list_items_persisted_in_order() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        let (milk, bread) = (Uuid::new_v4(), Uuid::new_v4());

        let mut list = ShoppingList::new("Weekly").unwrap();
        list.add_product(milk);
        list.add_product(bread);
        let list = store.create_shopping_list(list).await.unwrap();

        let mut fetched = store.get_shopping_list(list.id).await.unwrap().unwrap();
        let products: Vec<Uuid> = fetched.items().iter().map(|i| i.product_id).collect();
        assert_eq!(products, [milk, bread]);

        fetched.toggle_product(bread);
        fetched.remove_product(milk);
        store.update_shopping_list(fetched).await.unwrap();

        let fetched = store.get_shopping_list(list.id).await.unwrap().unwrap();
        assert_eq!(fetched.items().len(), 1);
        assert!(fetched.is_checked(bread));
    }

    #[tokio::test]
    async fn test_delete_product_removes_list_items() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        let product = store
            .create_product(Product::new("Milk", Quantity::one()).unwrap())
            .await
            .unwrap();
        let mut list = ShoppingList::new("Weekly").unwrap();
        list.add_product(product.id);
        let list = store.create_shopping_list(list).await.unwrap();

        store.delete_product(product.id).await.unwrap();

        let fetched = store.get_shopping_list(list.id).await.unwrap().unwrap();
        assert!(fetched.items().is_empty());
        let containing = store
            .list_shopping_lists(ShoppingListFilter {
                contains_product: Some(product.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(containing.is_empty());
    }

    #[tokio::test]
    async fn test_delete_list_removes_items_only() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        let product = store
            .create_product(Product::new("Milk", Quantity::one()).unwrap())
            .await
            .unwrap();
        let mut list = ShoppingList::new("Weekly").unwrap();
        list.add_product(product.id);
        let list = store.create_shopping_list(list).await.unwrap();

        store.delete_shopping_list(list.id).await.unwrap();

        assert!(store.get_shopping_list(list.id).await.unwrap().is_none());
        assert!(store.get_product(product.id).await.unwrap().is_some());
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shopping_list_items")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(items, 0);
    }

    #[tokio::test]
    async fn test_update_missing_entities() {
        let store = SqliteShopStore::in_memory().await.unwrap();

        let product = Product::new("Ghost", Quantity::one()).unwrap();
        assert!(matches!(
            store.update_product(product).await,
            Err(ShopStoreError::NotFound { .. })
        ));

        let list = ShoppingList::new("Ghost").unwrap();
        assert!(matches!(
            store.update_shopping_list(list).await,
            Err(ShopStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_categories_is_all_or_nothing() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        sqlx::raw_sql(
            "CREATE TRIGGER reject_third_category BEFORE INSERT ON categories
             WHEN (SELECT COUNT(*) FROM categories) >= 2
             BEGIN SELECT RAISE(ABORT, 'category table full'); END;",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let batch = vec![
            Category::new("Dairy"),
            Category::new("Bakery"),
            Category::new("Meat"),
        ];
        let err = tokio_test::assert_err!(store.create_categories(batch.clone()).await);
        assert!(matches!(err, ShopStoreError::Database(_)));
        assert_eq!(store.count_categories().await.unwrap(), 0);

        sqlx::raw_sql("DROP TRIGGER reject_third_category")
            .execute(store.pool())
            .await
            .unwrap();
        let created = tokio_test::assert_ok!(store.create_categories(batch).await);
        assert_eq!(created.len(), 3);
        assert_eq!(store.count_categories().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_create_categories_rejects_existing_id() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        let dairy = store.create_category(Category::new("Dairy")).await.unwrap();

        let result = store
            .create_categories(vec![Category::new("Bakery"), dairy])
            .await;
        assert!(matches!(result, Err(ShopStoreError::AlreadyExists { .. })));
        assert_eq!(store.count_categories().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_listing_sorts_non_ascii_names_case_insensitively() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        for name in ["Ștergătoare", "șampon"] {
            let product = Product::new(name, Quantity::one()).unwrap();
            tokio_test::assert_ok!(store.create_product(product).await);
            tokio_test::assert_ok!(store.create_category(Category::new(name)).await);
            let shop = Store::new(name, StoreType::Grocery, Location::default());
            tokio_test::assert_ok!(store.create_store(shop).await);
        }

        let products = store.list_products(ProductFilter::default()).await.unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["șampon", "Ștergătoare"]);

        let categories = store
            .list_categories(CategoryFilter::default())
            .await
            .unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["șampon", "Ștergătoare"]);

        let stores = store
            .list_stores(StoreFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<&str> = stores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["șampon"]);
    }
}
