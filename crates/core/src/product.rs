//! Read-only view over backend product records.
//!
//! Product payloads differ between endpoints: listing views return
//! `product_price` and `productId`, the regular API returns `price` and `id`,
//! older documents use `_id` or `listPrice`. Instead of repeating fallback
//! chains at each call site, every field is resolved through one ordered
//! alias list defined here. The first alias holding a usable value wins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{BrandId, CategoryId, ProductId, coerce_price};

/// Identifier aliases, highest priority first.
pub const ID_ALIASES: &[&str] = &["id", "productId", "product_id", "_id", "sku"];

/// Display name aliases, highest priority first.
pub const NAME_ALIASES: &[&str] = &["name", "productName", "product_name", "title"];

/// Unit price aliases, highest priority first.
pub const PRICE_ALIASES: &[&str] = &[
    "price",
    "productPrice",
    "product_price",
    "listPrice",
    "list_price",
];

const DESCRIPTION_ALIASES: &[&str] = &["description", "productDescription", "product_description"];
const SKU_ALIASES: &[&str] = &["sku"];
const CATEGORY_ALIASES: &[&str] = &["categoryId", "category_id"];
const BRAND_ALIASES: &[&str] = &["brandId", "brand_id"];

/// Name used when a product carries none of the [`NAME_ALIASES`].
pub const PLACEHOLDER_NAME: &str = "Unnamed Product";

/// Identifier used when a product carries none of the [`ID_ALIASES`].
pub const PLACEHOLDER_ID: &str = "unknown";

/// A product as returned by the backend, in whatever shape it arrived.
///
/// Non-object JSON deserializes into an empty record, so a malformed product
/// resolves to placeholder values instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct ProductRecord {
    fields: Map<String, Value>,
}

impl ProductRecord {
    /// Wrap an already parsed JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw field access.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// First alias whose value is present, not `null`, and not an empty string.
    #[must_use]
    pub fn resolve(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find(|value| is_present(value))
    }

    /// First alias whose value `convert` accepts. Objects and arrays under
    /// an earlier alias do not hide a usable scalar under a later one.
    fn resolve_with<T>(
        &self,
        aliases: &[&str],
        convert: impl Fn(&Value) -> Option<T>,
    ) -> Option<T> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .filter(|value| is_present(value))
            .find_map(convert)
    }

    /// Canonical product identifier, if any alias resolves to a scalar.
    #[must_use]
    pub fn id(&self) -> Option<ProductId> {
        self.resolve_with(ID_ALIASES, ProductId::from_json)
    }

    /// Display name, falling back to [`PLACEHOLDER_NAME`].
    #[must_use]
    pub fn name(&self) -> String {
        self.resolve_with(NAME_ALIASES, scalar_text)
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_owned())
    }

    /// Unit price; missing or unparseable prices are zero.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.resolve(PRICE_ALIASES)
            .map_or(Decimal::ZERO, coerce_price)
    }

    /// Free-text description used by catalog search.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.resolve_with(DESCRIPTION_ALIASES, scalar_text)
    }

    /// Stock keeping unit.
    #[must_use]
    pub fn sku(&self) -> Option<String> {
        self.resolve_with(SKU_ALIASES, scalar_text)
    }

    /// Category, from a nested `category.id` or a flat alias.
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.nested_id("category")
            .and_then(CategoryId::from_json)
            .or_else(|| self.resolve_with(CATEGORY_ALIASES, CategoryId::from_json))
    }

    /// Brand, from a nested `brand.id` or a flat alias.
    #[must_use]
    pub fn brand_id(&self) -> Option<BrandId> {
        self.nested_id("brand")
            .and_then(BrandId::from_json)
            .or_else(|| self.resolve_with(BRAND_ALIASES, BrandId::from_json))
    }

    fn nested_id(&self, key: &str) -> Option<&Value> {
        self.fields
            .get(key)
            .and_then(Value::as_object)
            .and_then(|object| object.get("id"))
            .filter(|value| is_present(value))
    }
}

impl From<Value> for ProductRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

impl From<ProductRecord> for Value {
    fn from(record: ProductRecord) -> Self {
        Self::Object(record.fields)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
