/// Reads a quantity field the way the page does: leading digits after an
/// optional sign, anything else counts as zero.
pub fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().map(|value| sign * value).unwrap_or(0)
}

/// Applies `delta` to the field value; the stored result never drops below 1.
pub fn adjust_quantity(raw: &str, delta: i64) -> u32 {
    floor_quantity(parse_quantity(raw).saturating_add(delta))
}

pub fn floor_quantity(candidate: i64) -> u32 {
    u32::try_from(candidate.max(1)).unwrap_or(u32::MAX)
}

/// Caps a floored quantity at the stock limit. A stock limit of zero still
/// allows one.
pub fn cap_to_stock(quantity: u32, stock_limit: u32) -> u32 {
    quantity.min(stock_limit.max(1))
}

/// Clamps into `[1, stock_limit]`.
pub fn clamp_quantity(candidate: i64, stock_limit: u32) -> u32 {
    cap_to_stock(floor_quantity(candidate), stock_limit)
}

/// Field text plus `delta`, clamped into `[1, stock_limit]`.
pub fn adjust_within_stock(raw: &str, delta: i64, stock_limit: u32) -> u32 {
    cap_to_stock(adjust_quantity(raw, delta), stock_limit)
}
