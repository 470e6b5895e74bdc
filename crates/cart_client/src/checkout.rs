use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use shared::{
    pricing::{format_amount, format_total, CURRENCY_SIGN},
    protocol::CheckoutForm,
};
use url::Url;

use crate::{
    cart::{cart_total, CartLine},
    error::{CartError, CartResult},
};

pub const WHATSAPP_BASE_URL: &str = "https://wa.me/";
pub const DEFAULT_GREETING: &str = "Hello, I would like to proceed with my order:\n";
pub const BARE_GREETING: &str = "Hello, I would like to proceed with my order.";

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    phone_number: String,
    greeting: String,
}

impl CheckoutConfig {
    /// Accepts digits with an optional leading `+` and embedded spaces.
    pub fn new(phone_number: &str) -> CartResult<Self> {
        Ok(Self {
            phone_number: normalize_phone_number(phone_number)?,
            greeting: DEFAULT_GREETING.to_string(),
        })
    }

    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }
}

fn normalize_phone_number(raw: &str) -> CartResult<String> {
    let digits: String = raw
        .trim()
        .trim_start_matches('+')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CartError::InvalidPhoneNumber(raw.to_string()));
    }
    Ok(digits)
}

/// Everything the page needs to finish checkout: the hidden-field payload,
/// the plain message and the URL to navigate to.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutHandoff {
    pub form: CheckoutForm,
    pub message: String,
    pub url: Url,
}

pub fn summary_line(line: &CartLine) -> String {
    format!(
        "{}: Quantity : {}, Price : {CURRENCY_SIGN}{}",
        line.product_name,
        line.quantity,
        format_amount(line.line_total())
    )
}

/// One line per product followed by the payable total, newline-joined.
pub fn order_summary(lines: &[CartLine]) -> String {
    let mut out: Vec<String> = lines.iter().map(summary_line).collect();
    out.push(format!(
        "Total Payable amount : {CURRENCY_SIGN}{}",
        format_total(cart_total(lines))
    ));
    out.join("\n")
}

pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// The text is encoded like `encodeURIComponent`; parsing into a [`Url`]
/// additionally escapes `'` as `%27`, which decodes to the same message.
pub fn handoff_url(config: &CheckoutConfig, message: &str) -> CartResult<Url> {
    let raw = format!(
        "{WHATSAPP_BASE_URL}{}?text={}",
        config.phone_number(),
        encode_component(message)
    );
    Ok(Url::parse(&raw)?)
}

/// Handoff without an order attached.
pub fn greeting_url(config: &CheckoutConfig) -> CartResult<Url> {
    handoff_url(config, BARE_GREETING)
}

pub fn prepare_checkout(lines: &[CartLine], config: &CheckoutConfig) -> CartResult<CheckoutHandoff> {
    if lines.is_empty() {
        return Err(CartError::EmptyCart);
    }
    let order_details = order_summary(lines);
    let message = format!("{}{order_details}", config.greeting());
    let url = handoff_url(config, &message)?;
    let form = CheckoutForm {
        lines: lines.iter().map(CartLine::checkout_record).collect(),
        total: cart_total(lines),
        order_details,
    };
    Ok(CheckoutHandoff { form, message, url })
}
