//! Order history summaries.
//!
//! Orders come back from the backend in several shapes: line items under
//! `orderProducts`, `order_items` or `cart`, line prices as `totalPrice`,
//! `unitPrice` or `price`, and the order total sometimes missing. An
//! [`OrderSummary`] reads any of them and fills the gaps from the lines.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::cart::persist::coerce_quantity;
use crate::types::{OrderId, coerce_price};

/// Status reported when the backend gives none.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Name shown for a line whose product has none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

const LINE_KEYS: &[&str] = &["orderProducts", "order_items", "cart"];
const DATE_KEYS: &[&str] = &["orderDate", "createdAt", "created_at"];
const STATUS_KEYS: &[&str] = &["status", "orderStatus"];

/// One product line of a past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    /// Price for the whole line.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderLine {
    /// Read a line item. The line total is `totalPrice` when positive,
    /// otherwise `unitPrice` or `price` times the quantity.
    #[must_use]
    pub fn from_json(item: &Value) -> Self {
        let name = item
            .get("product")
            .and_then(|product| text(product, &["name"]))
            .or_else(|| text(item, &["name"]))
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_owned());
        let quantity = item.get("quantity").map_or(0, coerce_quantity);

        let positive = |key: &str| {
            item.get(key)
                .map(coerce_price)
                .filter(|price| !price.is_zero())
        };
        let total = positive("totalPrice")
            .or_else(|| {
                positive("unitPrice")
                    .or_else(|| positive("price"))
                    .map(|unit| unit.saturating_mul(Decimal::from(quantity)))
            })
            .unwrap_or(Decimal::ZERO);

        Self {
            name,
            quantity,
            total,
        }
    }
}

/// A past order as listed in the visitor's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: Option<OrderId>,
    /// Placement date exactly as the backend sent it.
    pub placed_at: Option<String>,
    pub status: String,
    pub lines: Vec<OrderLine>,
    pub total_items: u32,
    /// `totalAmount` when positive, else the sum of the line totals.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl OrderSummary {
    #[must_use]
    pub fn from_json(order: &Value) -> Self {
        let id = ["orderId", "id"]
            .iter()
            .filter_map(|key| order.get(*key))
            .find_map(OrderId::from_json);

        let lines: Vec<OrderLine> = LINE_KEYS
            .iter()
            .find_map(|key| order.get(*key).and_then(Value::as_array))
            .map(|items| items.iter().map(OrderLine::from_json).collect())
            .unwrap_or_default();

        let total_items = lines
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity));
        let total_amount = order
            .get("totalAmount")
            .map(coerce_price)
            .filter(|amount| !amount.is_zero())
            .unwrap_or_else(|| {
                lines
                    .iter()
                    .map(|line| line.total)
                    .fold(Decimal::ZERO, Decimal::saturating_add)
            });

        Self {
            id,
            placed_at: text(order, DATE_KEYS),
            status: text(order, STATUS_KEYS).unwrap_or_else(|| UNKNOWN_STATUS.to_owned()),
            lines,
            total_items,
            total_amount,
        }
    }

    /// Whether the order can still be placed again (pending orders only).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.eq_ignore_ascii_case("pending")
    }
}

fn text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}
