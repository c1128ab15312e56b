//! Category and brand entries for the catalog navigation.
//!
//! The backend returns categories as `{categoryId|id, name}` and brands as
//! `{brandId|id, name}`. Entries are flattened to `{id, name}`, with a
//! placeholder name when none is given.

use serde::Serialize;
use serde_json::Value;

use crate::types::{BrandId, CategoryId};

/// Name shown for a category without one.
pub const UNNAMED_CATEGORY: &str = "Unnamed Category";

/// Name shown for a brand without one.
pub const UNNAMED_BRAND: &str = "Unnamed Brand";

/// A category as listed in the navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
}

/// A brand as listed in the navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brand {
    pub id: Option<BrandId>,
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            id: first_scalar(value, &["categoryId", "id"]).and_then(CategoryId::from_json),
            name: entry_name(value).unwrap_or_else(|| UNNAMED_CATEGORY.to_owned()),
        }
    }
}

impl Brand {
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            id: first_scalar(value, &["brandId", "id"]).and_then(BrandId::from_json),
            name: entry_name(value).unwrap_or_else(|| UNNAMED_BRAND.to_owned()),
        }
    }
}

fn first_scalar<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| matches!(v, Value::String(s) if !s.is_empty()) || v.is_number())
}

fn entry_name(value: &Value) -> Option<String> {
    value
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_category_id_prefers_category_id() {
        let category = Category::from_json(&json!({"categoryId": "c1", "id": 9, "name": "Audio"}));
        assert_eq!(category.id, Some(CategoryId::new("c1")));
        assert_eq!(category.name, "Audio");

        let category = Category::from_json(&json!({"id": 9}));
        assert_eq!(category.id, Some(CategoryId::new("9")));
        assert_eq!(category.name, UNNAMED_CATEGORY);
    }

    #[test]
    fn test_brand_without_usable_id() {
        let brand = Brand::from_json(&json!({"brandId": {"x": 1}, "name": ""}));
        assert_eq!(brand.id, None);
        assert_eq!(brand.name, UNNAMED_BRAND);
    }

    #[test]
    fn test_serialized_shape() {
        let brand = Brand::from_json(&json!({"brandId": "b1", "name": "Bang", "logo": "x"}));
        assert_eq!(
            serde_json::to_value(&brand).ok(),
            Some(json!({"id": "b1", "name": "Bang"}))
        );
    }
}
