use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use entities::{
    Category, Location, Product, Quantity, ShoppingList, ShoppingListItem, Store, StoreType,
};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{ShopStoreError, ShopStoreResult};

/// Tables are created on connect; statements are idempotent.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    keywords TEXT NOT NULL DEFAULT '[]',
    default_unit TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    category_id TEXT,
    quantity_amount TEXT NOT NULL,
    quantity_unit TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_category_id ON products(category_id);

CREATE TABLE IF NOT EXISTS stores (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    store_type TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    address TEXT,
    category_order TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shopping_lists (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shopping_list_items (
    id TEXT PRIMARY KEY NOT NULL,
    list_id TEXT NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
    product_id TEXT NOT NULL,
    is_checked INTEGER NOT NULL DEFAULT 0,
    added_at TEXT NOT NULL,
    position INTEGER NOT NULL,
    UNIQUE (list_id, product_id)
);

CREATE INDEX IF NOT EXISTS idx_shopping_list_items_product_id ON shopping_list_items(product_id);
"#;

/// Fixed-width UTC timestamps so that text ordering matches time ordering.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> ShopStoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ShopStoreError::invalid_data(format!("timestamp {value:?}: {e}")))
}

fn parse_id(value: &str) -> ShopStoreResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| ShopStoreError::invalid_data(format!("id {value:?}: {e}")))
}

/// Database row for Category
#[derive(Debug, FromRow)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub keywords: String,
    pub default_unit: Option<String>,
    pub created_at: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = ShopStoreError;

    fn try_from(row: CategoryRow) -> ShopStoreResult<Self> {
        let keywords: Vec<String> = serde_json::from_str(&row.keywords)?;
        let mut category = Category::new(row.name).with_keywords(keywords);
        category.id = parse_id(&row.id)?;
        category.default_unit = row.default_unit;
        category.created_at = parse_timestamp(&row.created_at)?;
        Ok(category)
    }
}

impl CategoryRow {
    pub fn from_category(category: &Category) -> ShopStoreResult<Self> {
        Ok(Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            keywords: serde_json::to_string(category.keywords())?,
            default_unit: category.default_unit.clone(),
            created_at: format_timestamp(&category.created_at),
        })
    }
}

/// Database row for Product
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category_id: Option<String>,
    pub quantity_amount: String,
    pub quantity_unit: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = ShopStoreError;

    fn try_from(row: ProductRow) -> ShopStoreResult<Self> {
        let amount = Decimal::from_str(&row.quantity_amount).map_err(|e| {
            ShopStoreError::invalid_data(format!("quantity {:?}: {e}", row.quantity_amount))
        })?;
        let quantity = Quantity::new(amount, row.quantity_unit)
            .map_err(|e| ShopStoreError::invalid_data(e.to_string()))?;
        let category_id = row.category_id.as_deref().map(parse_id).transpose()?;

        Product::from_parts(
            parse_id(&row.id)?,
            row.name,
            category_id,
            quantity,
            parse_timestamp(&row.created_at)?,
            parse_timestamp(&row.updated_at)?,
        )
        .map_err(|e| ShopStoreError::invalid_data(e.to_string()))
    }
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name().to_string(),
            category_id: product.category_id.map(|id| id.to_string()),
            quantity_amount: product.quantity.amount().to_string(),
            quantity_unit: product.quantity.unit().to_string(),
            created_at: format_timestamp(&product.created_at),
            updated_at: format_timestamp(&product.updated_at),
        }
    }
}

/// Database row for Store
#[derive(Debug, FromRow)]
pub struct StoreRow {
    pub id: String,
    pub name: String,
    pub store_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub category_order: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<StoreRow> for Store {
    type Error = ShopStoreError;

    fn try_from(row: StoreRow) -> ShopStoreResult<Self> {
        let store_type = StoreType::from_str(&row.store_type)
            .map_err(|e| ShopStoreError::invalid_data(e.to_string()))?;
        let category_order: Vec<Uuid> = serde_json::from_str(&row.category_order)?;
        let location = Location {
            latitude: row.latitude,
            longitude: row.longitude,
            address: row.address,
        };

        let mut store = Store::new(row.name, store_type, location)
            .with_category_order(category_order)
            .map_err(|e| ShopStoreError::invalid_data(e.to_string()))?;
        store.id = parse_id(&row.id)?;
        store.created_at = parse_timestamp(&row.created_at)?;
        store.updated_at = parse_timestamp(&row.updated_at)?;
        Ok(store)
    }
}

impl StoreRow {
    pub fn from_store(store: &Store) -> ShopStoreResult<Self> {
        Ok(Self {
            id: store.id.to_string(),
            name: store.name.clone(),
            store_type: store.store_type.as_str().to_string(),
            latitude: store.location.latitude,
            longitude: store.location.longitude,
            address: store.location.address.clone(),
            category_order: serde_json::to_string(store.category_order())?,
            created_at: format_timestamp(&store.created_at),
            updated_at: format_timestamp(&store.updated_at),
        })
    }
}

/// Database row for ShoppingList
#[derive(Debug, FromRow)]
pub struct ShoppingListRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ShoppingListRow {
    pub fn into_shopping_list(self, items: Vec<ShoppingListItem>) -> ShopStoreResult<ShoppingList> {
        Ok(ShoppingList::from_parts(
            parse_id(&self.id)?,
            self.name,
            items,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

impl From<&ShoppingList> for ShoppingListRow {
    fn from(list: &ShoppingList) -> Self {
        Self {
            id: list.id.to_string(),
            name: list.name().to_string(),
            created_at: format_timestamp(&list.created_at),
            updated_at: format_timestamp(&list.updated_at),
        }
    }
}

/// Database row for ShoppingListItem
#[derive(Debug, FromRow)]
pub struct ShoppingListItemRow {
    pub id: String,
    pub list_id: String,
    pub product_id: String,
    pub is_checked: bool,
    pub added_at: String,
}

impl TryFrom<ShoppingListItemRow> for ShoppingListItem {
    type Error = ShopStoreError;

    fn try_from(row: ShoppingListItemRow) -> ShopStoreResult<Self> {
        Ok(ShoppingListItem {
            id: parse_id(&row.id)?,
            list_id: parse_id(&row.list_id)?,
            product_id: parse_id(&row.product_id)?,
            is_checked: row.is_checked,
            added_at: parse_timestamp(&row.added_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_are_fixed_width() {
        let a = format_timestamp(&Utc::now());
        let b = format_timestamp(&DateTime::from_timestamp(0, 0).unwrap());

        assert_eq!(a.len(), b.len());
        assert!(b < a);
    }

    #[test]
    fn test_product_row_round_trip() {
        let product = Product::new("Flour", Quantity::parse("2.5", "kg").unwrap())
            .unwrap()
            .with_category(Uuid::new_v4());

        let restored = Product::try_from(ProductRow::from(&product)).unwrap();
        assert_eq!(restored.id, product.id);
        assert_eq!(restored.name(), "Flour");
        assert_eq!(restored.category_id, product.category_id);
        assert_eq!(restored.quantity, product.quantity);
    }

    #[test]
    fn test_invalid_store_type_is_reported() {
        let store = Store::new("Shop", StoreType::Grocery, Location::default());
        let mut row = StoreRow::from_store(&store).unwrap();
        row.store_type = "bazaar".to_string();

        assert!(matches!(
            Store::try_from(row),
            Err(ShopStoreError::InvalidData(_))
        ));
    }
}
