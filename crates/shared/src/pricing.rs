use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const CURRENCY_SIGN: &str = "₹";

const GRAMS_PER_KILOGRAM: u32 = 1000;

/// Two-decimal rendering used for line totals and the subtotal display.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

pub fn format_rupees(amount: Decimal) -> String {
    format!("{CURRENCY_SIGN}{}", format_amount(amount))
}

/// Payable-total rendering: `100`, `100.5`, `99.99`.
pub fn format_total(amount: Decimal) -> String {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Parses a displayed price such as `₹ 200.00` or `49.5`.
pub fn parse_amount(text: &str) -> Result<Decimal, DomainError> {
    let trimmed = text.trim().trim_start_matches(CURRENCY_SIGN).trim();
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| DomainError::InvalidAmount(text.to_string()))?;
    if amount.is_sign_negative() {
        return Err(DomainError::InvalidAmount(text.to_string()));
    }
    Ok(amount)
}

/// Malformed price text counts as zero, matching how the page sums rows.
pub fn parse_amount_or_zero(text: &str) -> Decimal {
    parse_amount(text).unwrap_or(Decimal::ZERO)
}

pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

fn apply_discount(price: Decimal, discount_pct: u32) -> Result<Decimal, DomainError> {
    if discount_pct > 100 {
        return Err(DomainError::DiscountOutOfRange(discount_pct));
    }
    let discount = price * (Decimal::from(discount_pct) / Decimal::ONE_HUNDRED);
    Ok(price - discount)
}

/// Product unit price after an optional percentage discount, truncated to one
/// decimal place. A zero percentage is treated as no discount.
pub fn discounted_price(original: Decimal, discount_pct: Option<u32>) -> Result<Decimal, DomainError> {
    let price = match discount_pct {
        Some(pct) if pct > 0 => apply_discount(original, pct)?,
        _ => original,
    };
    Ok(price.round_dp_with_strategy(1, RoundingStrategy::ToZero))
}

/// Price of a specific pack size. Discounted pack prices round to whole
/// rupees (half to even); undiscounted ones round half-up to one decimal.
pub fn pack_price(price: Decimal, discount_pct: Option<u32>) -> Result<Decimal, DomainError> {
    match discount_pct {
        Some(pct) if pct > 0 => Ok(apply_discount(price, pct)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)),
        _ => Ok(price.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)),
    }
}

/// A pack weight such as `250g` or `2kg`, ordered by weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackSize {
    grams: u32,
}

impl PackSize {
    pub fn from_grams(grams: u32) -> Self {
        Self { grams }
    }

    pub fn grams(&self) -> u32 {
        self.grams
    }
}

impl FromStr for PackSize {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        let invalid = || DomainError::InvalidPackSize(raw.to_string());

        let (digits, multiplier) = if let Some(kg) = normalized.strip_suffix("kg") {
            (kg, GRAMS_PER_KILOGRAM)
        } else if let Some(g) = normalized.strip_suffix('g') {
            (g, 1)
        } else {
            return Err(invalid());
        };

        let value: u32 = digits.trim().parse().map_err(|_| invalid())?;
        let grams = value.checked_mul(multiplier).ok_or_else(invalid)?;
        if grams == 0 {
            return Err(invalid());
        }
        Ok(Self { grams })
    }
}

impl fmt::Display for PackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.grams % GRAMS_PER_KILOGRAM == 0 {
            write!(f, "{}kg", self.grams / GRAMS_PER_KILOGRAM)
        } else {
            write!(f, "{}g", self.grams)
        }
    }
}

impl TryFrom<String> for PackSize {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PackSize> for String {
    fn from(value: PackSize) -> Self {
        value.to_string()
    }
}
