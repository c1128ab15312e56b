//! Checkout request construction.
//!
//! The payment session itself is created by the backend. This module only
//! validates what the shopper typed (shipping address, coupon code) and
//! assembles the payload handed to the payment endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartLineItem};

/// Shortest accepted ZIP code.
pub const ZIP_MIN_DIGITS: usize = 4;
/// Longest accepted ZIP code.
pub const ZIP_MAX_DIGITS: usize = 10;

/// Per-field address validation failures. Empty fields mean "valid".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("invalid shipping address")]
pub struct AddressErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl AddressErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.street_number.is_none()
            && self.zip.is_none()
            && self.city.is_none()
    }
}

/// A shipping address as entered in the cart form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub street_number: String,
    pub zip: String,
    pub city: String,
}

impl ShippingAddress {
    /// Trim every field and check that the address is deliverable.
    ///
    /// All fields are required; the ZIP code must be 4-10 ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once so a form can show them together.
    pub fn validate(self) -> Result<Self, AddressErrors> {
        let address = Self {
            street: self.street.trim().to_owned(),
            street_number: self.street_number.trim().to_owned(),
            zip: self.zip.trim().to_owned(),
            city: self.city.trim().to_owned(),
        };

        let required = |value: &str, message: &str| value.is_empty().then(|| message.to_owned());

        let errors = AddressErrors {
            street: required(&address.street, "Street is required"),
            street_number: required(&address.street_number, "Street number is required"),
            zip: validate_zip(&address.zip),
            city: required(&address.city, "City is required"),
        };

        if errors.is_empty() {
            Ok(address)
        } else {
            Err(errors)
        }
    }
}

fn validate_zip(zip: &str) -> Option<String> {
    if zip.is_empty() {
        return Some("ZIP code is required".to_owned());
    }
    let valid = (ZIP_MIN_DIGITS..=ZIP_MAX_DIGITS).contains(&zip.len())
        && zip.bytes().all(|b| b.is_ascii_digit());
    (!valid).then(|| format!("ZIP code must be {ZIP_MIN_DIGITS}-{ZIP_MAX_DIGITS} digits"))
}

/// Coupon code errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("Please enter a coupon code")]
    Empty,
    #[error("Cart must have items to apply a coupon")]
    EmptySubtotal,
}

/// A normalized (trimmed, upper-cased) coupon code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalize user input.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::Empty`] for blank input.
    pub fn parse(input: &str) -> Result<Self, CouponError> {
        let code = input.trim().to_uppercase();
        if code.is_empty() {
            return Err(CouponError::Empty);
        }
        Ok(Self(code))
    }

    /// Coupons only apply to a positive subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptySubtotal`] when `subtotal` is zero.
    pub fn check_subtotal(&self, subtotal: Decimal) -> Result<(), CouponError> {
        if subtotal <= Decimal::ZERO {
            return Err(CouponError::EmptySubtotal);
        }
        Ok(())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Coupon validation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidation {
    pub coupon_code: CouponCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_subtotal: Decimal,
}

/// Errors building a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Address(#[from] AddressErrors),
    #[error(transparent)]
    Coupon(#[from] CouponError),
}

/// Payload for the payment-session endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart: Vec<CartLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Always validated and trimmed.
    pub address: ShippingAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<CouponCode>,
}

impl CheckoutRequest {
    /// Validate inputs and snapshot the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart, address errors
    /// for an undeliverable address, and [`CouponError::EmptySubtotal`] when a
    /// coupon is supplied for a zero-value cart.
    pub fn new(
        cart: &Cart,
        address: ShippingAddress,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
        coupon_code: Option<CouponCode>,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let address = address.validate()?;
        if let Some(code) = &coupon_code {
            code.check_subtotal(cart.total_price())?;
        }

        Ok(Self {
            cart: cart.snapshot(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            address,
            coupon_code,
        })
    }
}

/// Response from the payment-session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    /// Where to send the shopper to pay. Absent when the backend failed to
    /// create a session.
    pub url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::product::ProductRecord;

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: " Nørregade ".to_string(),
            street_number: "12B".to_string(),
            zip: " 2100 ".to_string(),
            city: "København".to_string(),
        }
    }

    fn cart_with(price: serde_json::Value) -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&ProductRecord::from(json!({"id": "p1", "name": "Widget", "price": price})));
        cart
    }

    #[test]
    fn test_valid_address_is_trimmed() {
        let address = address().validate().unwrap();
        assert_eq!(address.street, "Nørregade");
        assert_eq!(address.zip, "2100");
    }

    #[test]
    fn test_all_address_errors_reported() {
        let errors = ShippingAddress::default().validate().unwrap_err();
        assert_eq!(errors.street.as_deref(), Some("Street is required"));
        assert_eq!(errors.street_number.as_deref(), Some("Street number is required"));
        assert_eq!(errors.zip.as_deref(), Some("ZIP code is required"));
        assert_eq!(errors.city.as_deref(), Some("City is required"));
    }

    #[test]
    fn test_zip_rules() {
        for (zip, ok) in [
            ("2100", true),
            ("1234567890", true),
            ("123", false),
            ("12345678901", false),
            ("21OO", false),
            ("21 00", false),
        ] {
            let result = ShippingAddress {
                zip: zip.to_string(),
                ..address()
            }
            .validate();
            assert_eq!(result.is_ok(), ok, "zip {zip:?}");
        }
    }

    #[test]
    fn test_coupon_normalization() {
        assert_eq!(CouponCode::parse("  summer10 ").unwrap().as_str(), "SUMMER10");
        assert_eq!(CouponCode::parse("   "), Err(CouponError::Empty));
    }

    #[test]
    fn test_checkout_rejects_empty_cart() {
        let result = CheckoutRequest::new(&Cart::new(), address(), "s", "c", None);
        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_checkout_rejects_coupon_on_free_cart() {
        let code = CouponCode::parse("x").unwrap();
        let result = CheckoutRequest::new(&cart_with(json!(null)), address(), "s", "c", Some(code));
        assert_eq!(result, Err(CheckoutError::Coupon(CouponError::EmptySubtotal)));
    }

    #[test]
    fn test_checkout_payload_shape() {
        let request = CheckoutRequest::new(
            &cart_with(json!("19.99")),
            address(),
            "https://shop.test/?checkout=success",
            "https://shop.test/?checkout=cancel",
            None,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "cart": [{"id": "p1", "name": "Widget", "price": 19.99, "quantity": 1}],
                "successUrl": "https://shop.test/?checkout=success",
                "cancelUrl": "https://shop.test/?checkout=cancel",
                "address": {
                    "street": "Nørregade",
                    "streetNumber": "12B",
                    "zip": "2100",
                    "city": "København",
                },
            })
        );
    }

    #[test]
    fn test_checkout_payload_includes_coupon() {
        let request = CheckoutRequest::new(
            &cart_with(json!(5)),
            address(),
            "s",
            "c",
            Some(CouponCode::parse("save5").unwrap()),
        )
        .unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["couponCode"], json!("SAVE5"));
    }

    #[test]
    fn test_checkout_request_holds_trimmed_address() {
        let mut raw = address();
        raw.city = "  Aarhus ".to_owned();
        let request = CheckoutRequest::new(&cart_with(json!(5)), raw, "s", "c", None).unwrap();
        assert_eq!(request.address.city, "Aarhus");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["address"]["city"], json!("Aarhus"));
        assert!(value.get("couponCode").is_none());
    }

    #[test]
    fn test_coupon_validation_body() {
        let body = CouponValidation {
            coupon_code: CouponCode::parse("save5").unwrap(),
            order_subtotal: Decimal::new(3998, 2),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"couponCode": "SAVE5", "orderSubtotal": 39.98})
        );
    }
}
