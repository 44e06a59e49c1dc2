//! Product entity definitions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntityError, EntityResult, error::normalize_name};

/// Unit used when none is given.
pub const DEFAULT_UNIT: &str = "pcs";

/// An amount of a product together with its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuantityData")]
pub struct Quantity {
    amount: Decimal,
    unit: String,
}

#[derive(Deserialize)]
struct QuantityData {
    amount: Decimal,
    unit: String,
}

impl TryFrom<QuantityData> for Quantity {
    type Error = EntityError;

    fn try_from(data: QuantityData) -> EntityResult<Self> {
        Quantity::new(data.amount, data.unit)
    }
}

impl Quantity {
    /// Creates a quantity, rejecting amounts that are not positive.
    pub fn new(amount: Decimal, unit: impl Into<String>) -> EntityResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(EntityError::NonPositiveAmount(amount));
        }
        let unit = unit.into();
        let unit = unit.trim();
        Ok(Self {
            amount,
            unit: if unit.is_empty() {
                DEFAULT_UNIT.to_string()
            } else {
                unit.to_string()
            },
        })
    }

    /// Parses an amount typed into a form, e.g. `"1.5"` or `"2,5"`.
    pub fn parse(amount: &str, unit: impl Into<String>) -> EntityResult<Self> {
        let normalized = amount.trim().replace(',', ".");
        let value = Decimal::from_str(&normalized)
            .map_err(|_| EntityError::InvalidAmount(amount.to_string()))?;
        Self::new(value, unit)
    }

    /// A single piece.
    pub fn one() -> Self {
        Self {
            amount: Decimal::ONE,
            unit: DEFAULT_UNIT.to_string(),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::one()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount.normalize(), self.unit)
    }
}

/// A product that can be placed on shopping lists.
///
/// Whether a product has been bought is tracked per list on
/// [`ShoppingListItem`](crate::ShoppingListItem), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductData")]
pub struct Product {
    /// Unique identifier.
    pub id: Uuid,
    /// Product name, never empty.
    name: String,
    /// Associated category ID (None when uncategorized).
    pub category_id: Option<Uuid>,
    /// Amount to buy.
    pub quantity: Quantity,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ProductData {
    id: Uuid,
    name: String,
    category_id: Option<Uuid>,
    quantity: Quantity,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductData> for Product {
    type Error = EntityError;

    fn try_from(data: ProductData) -> EntityResult<Self> {
        Product::from_parts(
            data.id,
            data.name,
            data.category_id,
            data.quantity,
            data.created_at,
            data.updated_at,
        )
    }
}

impl Product {
    /// Creates a new uncategorized product.
    pub fn new(name: impl Into<String>, quantity: Quantity) -> EntityResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(name)?,
            category_id: None,
            quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a product from stored parts.
    pub fn from_parts(
        id: Uuid,
        name: String,
        category_id: Option<Uuid>,
        quantity: Quantity,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> EntityResult<Self> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            category_id,
            quantity,
            created_at,
            updated_at,
        })
    }

    /// Sets the category for this product.
    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the product.
    pub fn rename(&mut self, name: impl Into<String>) -> EntityResult<()> {
        self.name = normalize_name(name)?;
        self.touch();
        Ok(())
    }

    /// Replaces the quantity.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
        self.touch();
    }

    /// Moves the product to another category, or clears it.
    pub fn set_category(&mut self, category_id: Option<Uuid>) {
        self.category_id = category_id;
        self.touch();
    }

    /// Whether this product is uncategorized.
    pub fn is_uncategorized(&self) -> bool {
        self.category_id.is_none()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
