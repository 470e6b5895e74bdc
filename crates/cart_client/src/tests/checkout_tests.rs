use std::str::FromStr;

use rust_decimal::Decimal;
use shared::domain::{CartItemId, ProductId};

use crate::{
    cart::CartLine,
    checkout::{
        encode_component, greeting_url, order_summary, prepare_checkout, CheckoutConfig,
        DEFAULT_GREETING,
    },
    error::CartError,
};

fn line(id: i64, name: &str, price: &str, quantity: u32) -> CartLine {
    CartLine::new(
        CartItemId(id),
        ProductId(id),
        name,
        Decimal::from_str(price).expect("price"),
        quantity,
        10,
    )
}

fn config() -> CheckoutConfig {
    CheckoutConfig::new("9016247243").expect("phone")
}

#[test]
fn summary_lists_lines_then_payable_total() {
    let lines = vec![line(1, "A", "50", 1), line(2, "B", "25", 2)];
    let summary = order_summary(&lines);
    assert_eq!(
        summary,
        "A: Quantity : 1, Price : ₹50.00\n\
         B: Quantity : 2, Price : ₹50.00\n\
         Total Payable amount : ₹100"
    );
    assert!(summary.ends_with("Total Payable amount : ₹100"));
}

#[test]
fn payable_total_keeps_significant_decimals() {
    let lines = vec![line(1, "Syrup", "20.25", 2)];
    assert!(order_summary(&lines).ends_with("Total Payable amount : ₹40.5"));
}

#[test]
fn encodes_like_uri_component() {
    assert_eq!(
        encode_component("Hello, world!\n₹ (x)"),
        "Hello%2C%20world!%0A%E2%82%B9%20(x)"
    );
    assert_eq!(encode_component("a-b_c.d~e*f"), "a-b_c.d~e*f");
    assert_eq!(encode_component("a&b=c?d/e"), "a%26b%3Dc%3Fd%2Fe");
}

#[test]
fn checkout_builds_records_keyed_by_item_and_deep_link() {
    let lines = vec![line(1, "A", "50", 1), line(2, "B", "25", 2)];
    let handoff = prepare_checkout(&lines, &config()).expect("checkout");

    assert_eq!(handoff.form.lines.len(), 2);
    let second = &handoff.form.lines[1];
    assert_eq!(second.item_id, CartItemId(2));
    assert_eq!(second.product_name, "B");
    assert_eq!(second.quantity, 2);
    assert_eq!(second.line_total, Decimal::from(50));
    assert_eq!(handoff.form.total, Decimal::from(100));
    assert_eq!(handoff.form.order_details, order_summary(&lines));

    assert!(handoff.message.starts_with(DEFAULT_GREETING));
    assert!(handoff.message.ends_with("Total Payable amount : ₹100"));

    assert_eq!(handoff.url.scheme(), "https");
    assert_eq!(handoff.url.host_str(), Some("wa.me"));
    assert_eq!(handoff.url.path(), "/9016247243");
    assert!(handoff
        .url
        .as_str()
        .starts_with("https://wa.me/9016247243?text=Hello%2C%20I%20would%20like"));
    let text = handoff
        .url
        .query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.into_owned())
        .expect("text param");
    assert_eq!(text, handoff.message);
}

#[test]
fn checkout_record_serializes_as_structured_json() {
    let lines = vec![line(5, "A", "12.5", 2)];
    let handoff = prepare_checkout(&lines, &config()).expect("checkout");
    let json = serde_json::to_value(&handoff.form).expect("json");
    assert_eq!(json["lines"][0]["item_id"], 5);
    assert_eq!(json["lines"][0]["quantity"], 2);
    assert_eq!(json["lines"][0]["line_total"], "25.0");
}

#[test]
fn empty_cart_cannot_check_out() {
    let err = prepare_checkout(&[], &config()).expect_err("empty");
    assert!(matches!(err, CartError::EmptyCart));
}

#[test]
fn custom_greeting_prefixes_message() {
    let lines = vec![line(1, "A", "50", 1)];
    let config = config().with_greeting("Order from the web shop:\n");
    let handoff = prepare_checkout(&lines, &config).expect("checkout");
    assert!(handoff.message.starts_with("Order from the web shop:\nA: Quantity : 1"));
}

#[test]
fn greeting_url_carries_bare_greeting() {
    let url = greeting_url(&config()).expect("url");
    assert_eq!(
        url.as_str(),
        "https://wa.me/9016247243?text=Hello%2C%20I%20would%20like%20to%20proceed%20with%20my%20order."
    );
}

#[test]
fn phone_numbers_are_normalized_or_rejected() {
    let config = CheckoutConfig::new(" +91 90162 47243 ").expect("phone");
    assert_eq!(config.phone_number(), "919016247243");
    assert!(matches!(
        CheckoutConfig::new("call-me"),
        Err(CartError::InvalidPhoneNumber(_))
    ));
    assert!(matches!(
        CheckoutConfig::new(""),
        Err(CartError::InvalidPhoneNumber(_))
    ));
}

#[test]
fn apostrophes_survive_the_handoff_url() {
    let lines = vec![line(1, "Nana's Jaggery", "40", 1)];
    assert_eq!(encode_component("Nana's Jaggery"), "Nana's%20Jaggery");

    let handoff = prepare_checkout(&lines, &config()).expect("checkout");
    assert!(handoff.url.as_str().contains("Nana%27s%20Jaggery"));
    let text = handoff
        .url
        .query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.into_owned())
        .expect("text param");
    assert_eq!(text, handoff.message);
    assert!(text.contains("Nana's Jaggery: Quantity : 1, Price : ₹40.00"));
}
