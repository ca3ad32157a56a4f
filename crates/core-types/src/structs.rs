use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A person selling products. Identified by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Seller {
    /// The display name used in reports: first and last name separated by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A catalog entry. The `purchase_price` is the cost basis for profit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub purchase_price: Decimal,
}

/// One product line within a purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,
    pub quantity: u32,
    /// Discount percentage, e.g. `10` for 10%.
    #[serde(default)]
    pub discount: Decimal,
    pub sale_price: Decimal,
}

/// A single transaction attributed to one seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub seller_id: String,
    /// Pre-computed total of the receipt. Trusted as-is for revenue.
    pub total_amount: Decimal,
    pub items: Vec<LineItem>,
}

/// The full batch of input data handed to the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub sellers: Vec<Seller>,
    pub products: Vec<Product>,
    pub purchase_records: Vec<PurchaseRecord>,
}

impl Dataset {
    /// The top-level fields every dataset document must carry as arrays.
    pub const COLLECTIONS: [&'static str; 3] = ["sellers", "purchase_records", "products"];

    /// Checks that `value` is an object whose three collections are JSON arrays,
    /// returning those arrays in `COLLECTIONS` order.
    pub fn collections(
        value: &serde_json::Value,
    ) -> Result<[&Vec<serde_json::Value>; 3], CoreError> {
        let object = value.as_object().ok_or_else(|| {
            CoreError::InvalidInput("dataset".to_string(), "expected a JSON object".to_string())
        })?;

        let field = |name: &str| {
            object
                .get(name)
                .and_then(serde_json::Value::as_array)
                .ok_or_else(|| CoreError::InvalidInput(name.to_string(), "expected an array".to_string()))
        };

        Ok([
            field(Self::COLLECTIONS[0])?,
            field(Self::COLLECTIONS[1])?,
            field(Self::COLLECTIONS[2])?,
        ])
    }

    /// Builds a dataset from an already-parsed JSON document.
    ///
    /// Each of the three collections must be present and must be a JSON array;
    /// extra fields on the records (receipt ids, dates, product names, ...) are ignored.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        Self::collections(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Parses a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Reads and parses a dataset from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading dataset.");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
