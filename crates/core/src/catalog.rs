//! Client-side product listing: search, filters, sorting, and pagination.
//!
//! The full product list is fetched once and narrowed in memory. Filtering is
//! a linear scan; sorting is stable so equal keys keep backend order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::product::ProductRecord;
use crate::types::{BrandId, CategoryId};

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Field used to order a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Price,
    Sku,
}

impl SortField {
    /// Parse a sort key, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "sku" => Some(Self::Sku),
            _ => None,
        }
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Raw listing parameters as they appear in a query string.
///
/// Every field is optional text; [`CatalogQuery::from`] applies defaults and
/// ignores values that do not parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub brand: Option<String>,
    pub brand_id: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    /// Combined form, e.g. `price-desc`.
    pub sort: Option<String>,
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
    /// Zero-based page number.
    pub page: usize,
    pub size: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            brand: None,
            sort_by: SortField::default(),
            sort_direction: SortDirection::default(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<CatalogParams> for CatalogQuery {
    fn from(params: CatalogParams) -> Self {
        let non_empty = |value: Option<String>| {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let (combined_field, combined_direction) = params
            .sort
            .as_deref()
            .and_then(|sort| sort.split_once('-'))
            .map_or((None, None), |(field, direction)| {
                (SortField::parse(field), SortDirection::parse(direction))
            });

        Self {
            search: non_empty(params.search),
            category: non_empty(params.category_id.or(params.category)).map(CategoryId::new),
            brand: non_empty(params.brand_id.or(params.brand)).map(BrandId::new),
            sort_by: params
                .sort_by
                .as_deref()
                .and_then(SortField::parse)
                .or(combined_field)
                .unwrap_or_default(),
            sort_direction: params
                .sort_direction
                .as_deref()
                .and_then(SortDirection::parse)
                .or(combined_direction)
                .unwrap_or_default(),
            page: params
                .page
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(0),
            size: params
                .size
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .max(1),
        }
    }
}

/// One page of results plus totals, in the backend's pagination shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    pub first: bool,
    pub last: bool,
}

impl CatalogQuery {
    /// Whether `product` passes the search, category, and brand filters.
    #[must_use]
    pub fn matches(&self, product: &ProductRecord) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            product.name().to_lowercase().contains(&term)
                || product
                    .description()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
        });

        let matches_category = self
            .category
            .as_ref()
            .is_none_or(|wanted| product.category_id().as_ref() == Some(wanted));

        let matches_brand = self
            .brand
            .as_ref()
            .is_none_or(|wanted| product.brand_id().as_ref() == Some(wanted));

        matches_search && matches_category && matches_brand
    }

    /// Filter, sort, and slice `products` into the requested page.
    #[must_use]
    pub fn execute(&self, products: &[ProductRecord]) -> Page<ProductRecord> {
        let mut matching: Vec<&ProductRecord> =
            products.iter().filter(|p| self.matches(p)).collect();

        matching.sort_by(|a, b| {
            let ordering = compare(self.sort_by, a, b);
            match self.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let size = self.size.max(1);
        let total_elements = matching.len();
        let total_pages = total_elements.div_ceil(size);
        let content = matching
            .into_iter()
            .skip(self.page.saturating_mul(size))
            .take(size)
            .cloned()
            .collect();

        Page {
            content,
            number: self.page,
            size,
            total_elements,
            total_pages,
            first: self.page == 0,
            last: self.page.saturating_add(1) >= total_pages,
        }
    }
}

fn compare(field: SortField, a: &ProductRecord, b: &ProductRecord) -> Ordering {
    match field {
        SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortField::Price => a.price().cmp(&b.price()),
        SortField::Sku => a.sku().unwrap_or_default().cmp(&b.sku().unwrap_or_default()),
    }
}
