use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{CartItemId, ProductId, StockState},
    pricing::{self, PackSize},
    protocol::CheckoutLineRecord,
};

use crate::error::CartResult;

fn default_increase_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_size: Option<PackSize>,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub stock_limit: u32,
    #[serde(default = "default_increase_enabled")]
    pub increase_enabled: bool,
}

impl CartLine {
    pub fn new(
        item_id: CartItemId,
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
        stock_limit: u32,
    ) -> Self {
        Self {
            item_id,
            product_id,
            product_name: product_name.into(),
            pack_size: None,
            unit_price,
            quantity,
            stock_limit,
            increase_enabled: quantity < stock_limit,
        }
    }

    #[must_use]
    pub fn with_pack_size(mut self, pack_size: PackSize) -> Self {
        self.pack_size = Some(pack_size);
        self
    }

    pub fn line_total(&self) -> Decimal {
        pricing::line_total(self.unit_price, self.quantity)
    }

    /// Text shown in the row's total cell, e.g. `₹200.00`.
    pub fn line_total_display(&self) -> String {
        pricing::format_rupees(self.line_total())
    }

    pub fn stock_state(&self) -> StockState {
        StockState::for_quantity(self.quantity, self.stock_limit)
    }

    pub fn checkout_record(&self) -> CheckoutLineRecord {
        CheckoutLineRecord {
            item_id: self.item_id,
            product_id: self.product_id,
            product_name: self.product_name.clone(),
            pack_size: self.pack_size,
            quantity: self.quantity,
            line_total: self.line_total(),
        }
    }
}

/// A cart row as the storefront renders it: the listed price text plus the
/// product's discount, before the unit price is worked out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRow {
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_size: Option<PackSize>,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u32>,
    pub quantity: u32,
    pub stock_limit: u32,
}

impl PageRow {
    /// Unreadable price text counts as zero.
    pub fn into_line(self) -> CartResult<CartLine> {
        let listed = pricing::parse_amount_or_zero(&self.price);
        let unit_price = unit_price(listed, self.pack_size, self.discount_percentage)?;
        let line = CartLine::new(
            self.item_id,
            self.product_id,
            self.product_name,
            unit_price,
            self.quantity,
            self.stock_limit,
        );
        Ok(match self.pack_size {
            Some(pack_size) => line.with_pack_size(pack_size),
            None => line,
        })
    }
}

/// Pack-size prices follow the pack rounding rules, plain products the
/// product rules.
pub fn unit_price(
    listed: Decimal,
    pack_size: Option<PackSize>,
    discount_percentage: Option<u32>,
) -> CartResult<Decimal> {
    let price = match pack_size {
        Some(_) => pricing::pack_price(listed, discount_percentage)?,
        None => pricing::discounted_price(listed, discount_percentage)?,
    };
    Ok(price)
}

/// Sum of every line total. Always recomputed, never cached.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub total: Decimal,
}

impl Totals {
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let sum = cart_total(lines);
        Self {
            subtotal: sum,
            total: sum,
        }
    }

    pub fn subtotal_display(&self) -> String {
        pricing::format_amount(self.subtotal)
    }

    pub fn total_display(&self) -> String {
        pricing::format_amount(self.total)
    }
}
