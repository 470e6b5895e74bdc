pub mod backend;
pub mod cart;
pub mod checkout;
pub mod controller;
pub mod cookies;
pub mod error;
pub mod notifications;
pub mod quantity;

pub use backend::{CartBackend, HttpCartBackend, OfflineCartBackend};
pub use cart::{cart_total, CartLine, PageRow, Totals};
pub use checkout::{CheckoutConfig, CheckoutHandoff};
pub use controller::{CartController, ControllerOptions, DecreaseOutcome, STOCK_LIMIT_MESSAGE};
pub use error::{CartError, CartResult};
pub use notifications::{Notification, NotificationCenter, Position, Severity};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/checkout_tests.rs"]
mod checkout_tests;

#[cfg(test)]
#[path = "tests/notifications_tests.rs"]
mod notifications_tests;

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod backend_tests;
