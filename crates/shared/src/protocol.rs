use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{CartItemId, ProductId},
    pricing::PackSize,
};

/// One cart row as handed to the checkout form, keyed by its line identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLineRecord {
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_size: Option<PackSize>,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Hidden-field payload submitted alongside the messaging handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub lines: Vec<CheckoutLineRecord>,
    pub total: Decimal,
    pub order_details: String,
}

/// Form body of the storefront's cart update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdateForm {
    pub item_id: i64,
    pub quantity: u32,
    pub selected_discounted_price: String,
}

pub fn delete_cart_path(item_id: CartItemId) -> String {
    format!("/delete_cart/{}/", item_id.0)
}

pub const UPDATE_CART_PATH: &str = "/cart/";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const CSRF_COOKIE: &str = "csrftoken";
