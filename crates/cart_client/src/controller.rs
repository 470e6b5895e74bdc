use std::{collections::HashSet, sync::Arc, time::Duration};

use rust_decimal::Decimal;
use shared::{
    domain::{CartItemId, StockState},
    protocol::CSRF_COOKIE,
};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
    backend::CartBackend,
    cart::{cart_total, CartLine, Totals},
    checkout::{self, CheckoutConfig, CheckoutHandoff},
    cookies::get_cookie,
    error::{CartError, CartResult},
    notifications::{
        Notification, NotificationCenter, NotificationId, Position, Severity, DEFAULT_DISPLAY,
    },
    quantity::{adjust_within_stock, clamp_quantity},
};

pub const STOCK_LIMIT_MESSAGE: &str = "Cannot increase quantity. Maximum stock reached.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Push every stored quantity change to the storefront.
    pub sync_quantities: bool,
    pub notification_display: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            sync_quantities: false,
            notification_display: DEFAULT_DISPLAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecreaseOutcome {
    /// The line stays with this quantity.
    Updated(u32),
    /// The storefront deleted the item and the line is gone.
    Removed,
    /// The delete call failed; the line is left untouched.
    RemovalFailed,
}

pub struct CartController {
    lines: Vec<CartLine>,
    backend: Arc<dyn CartBackend>,
    checkout: CheckoutConfig,
    cookies: String,
    notifications: NotificationCenter,
    options: ControllerOptions,
}

impl CartController {
    /// Takes ownership of the rendered lines. Quantities outside
    /// `[1, stock_limit]` are clamped on the way in.
    pub fn new(
        lines: Vec<CartLine>,
        backend: Arc<dyn CartBackend>,
        checkout: CheckoutConfig,
    ) -> CartResult<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(lines.len());
        for mut line in lines {
            if !seen.insert(line.item_id) {
                return Err(CartError::DuplicateItem(line.item_id));
            }
            let clamped = clamp_quantity(i64::from(line.quantity), line.stock_limit);
            if clamped != line.quantity {
                warn!(
                    item_id = line.item_id.0,
                    quantity = line.quantity,
                    clamped,
                    "cart: quantity outside stock range"
                );
                line.quantity = clamped;
            }
            line.increase_enabled = line.stock_state() == StockState::Available;
            normalized.push(line);
        }

        Ok(Self {
            lines: normalized,
            backend,
            checkout,
            cookies: String::new(),
            notifications: NotificationCenter::new(),
            options: ControllerOptions::default(),
        })
    }

    /// Cookie header the CSRF token is read from.
    #[must_use]
    pub fn with_cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = cookies.into();
        self
    }

    #[must_use]
    pub fn with_notifications(mut self, notifications: NotificationCenter) -> Self {
        self.notifications = notifications;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn line(&self, item_id: CartItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn total(&self) -> Decimal {
        cart_total(&self.lines)
    }

    fn index_of(&self, item_id: CartItemId) -> CartResult<usize> {
        self.lines
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or(CartError::UnknownItem(item_id))
    }

    fn csrf_token(&self) -> Option<String> {
        get_cookie(&self.cookies, CSRF_COOKIE)
    }

    /// Reads the line's quantity field, applies `delta` and writes the result,
    /// clamped into `[1, stock_limit]`, back to the line.
    pub fn adjust_quantity(&mut self, item_id: CartItemId, delta: i64) -> CartResult<u32> {
        let index = self.index_of(item_id)?;
        let line = &mut self.lines[index];
        let field = line.quantity.to_string();
        line.quantity = adjust_within_stock(&field, delta, line.stock_limit);
        Ok(line.quantity)
    }

    /// Handler for the increase control.
    ///
    /// Reaching the stock limit disables the control and shows a
    /// notification. A disabled control does nothing.
    pub async fn increase(&mut self, item_id: CartItemId) -> CartResult<u32> {
        let index = self.index_of(item_id)?;
        if !self.lines[index].increase_enabled {
            debug!(item_id = item_id.0, "cart: increase ignored, control disabled");
            return Ok(self.lines[index].quantity);
        }

        let quantity = self.adjust_quantity(item_id, 1)?;
        let line = &mut self.lines[index];
        if line.stock_state() == StockState::AtLimit {
            line.increase_enabled = false;
            info!(
                item_id = item_id.0,
                stock_limit = line.stock_limit,
                "cart: stock limit reached"
            );
            self.show_stock_limit_notification();
        }

        self.sync_quantity(index).await;
        self.recompute_aggregate();
        Ok(quantity)
    }

    /// Handler for the decrease control.
    ///
    /// Going below one deletes the item on the storefront; the line is only
    /// removed once that call succeeds.
    pub async fn decrease(&mut self, item_id: CartItemId) -> CartResult<DecreaseOutcome> {
        let index = self.index_of(item_id)?;
        let candidate = i64::from(self.lines[index].quantity) - 1;

        if candidate < 1 {
            let csrf_token = self.csrf_token();
            if csrf_token.is_none() {
                warn!(item_id = item_id.0, "cart: no csrf token cookie for delete");
            }
            return match self.backend.delete_item(item_id, csrf_token.as_deref()).await {
                Ok(()) => {
                    self.lines.remove(index);
                    self.recompute_aggregate();
                    Ok(DecreaseOutcome::Removed)
                }
                Err(err) => {
                    error!(
                        item_id = item_id.0,
                        error = %err,
                        "cart: error removing item from cart"
                    );
                    Ok(DecreaseOutcome::RemovalFailed)
                }
            };
        }

        let quantity = self.adjust_quantity(item_id, -1)?;
        let line = &mut self.lines[index];
        line.increase_enabled = line.stock_state() == StockState::Available;
        self.sync_quantity(index).await;
        self.recompute_aggregate();
        Ok(DecreaseOutcome::Updated(quantity))
    }

    /// Handler for a direct edit of the quantity field. Unreadable input
    /// falls back to the minimum of one.
    ///
    /// Typed values below one are clamped to one, never deleted; only the
    /// decrease control removes a line.
    pub async fn edit_quantity(&mut self, item_id: CartItemId, raw: &str) -> CartResult<u32> {
        let index = self.index_of(item_id)?;
        let line = &mut self.lines[index];
        let quantity = adjust_within_stock(raw, 0, line.stock_limit);
        line.quantity = quantity;
        line.increase_enabled = line.stock_state() == StockState::Available;
        self.sync_quantity(index).await;
        self.recompute_aggregate();
        Ok(quantity)
    }

    /// Recomputes the subtotal and total displays from every current line.
    pub fn recompute_aggregate(&self) -> Totals {
        let totals = Totals::from_lines(&self.lines);
        debug!(
            lines = self.lines.len(),
            subtotal = %totals.subtotal_display(),
            total = %totals.total_display(),
            "cart: totals recomputed"
        );
        totals
    }

    pub fn prepare_checkout(&self) -> CartResult<CheckoutHandoff> {
        let handoff = checkout::prepare_checkout(&self.lines, &self.checkout)?;
        info!(
            lines = handoff.form.lines.len(),
            total = %handoff.form.total,
            "cart: checkout handoff prepared"
        );
        Ok(handoff)
    }

    pub fn greeting_url(&self) -> CartResult<Url> {
        checkout::greeting_url(&self.checkout)
    }

    fn show_stock_limit_notification(&self) -> NotificationId {
        self.notifications.show(
            Notification::new(STOCK_LIMIT_MESSAGE)
                .position(Position::TopRight)
                .severity(Severity::Info)
                .display(self.options.notification_display),
        )
    }

    async fn sync_quantity(&self, index: usize) {
        if !self.options.sync_quantities {
            return;
        }
        let line = &self.lines[index];
        let csrf_token = self.csrf_token();
        if let Err(err) = self
            .backend
            .update_quantity(line.item_id, line.quantity, line.unit_price, csrf_token.as_deref())
            .await
        {
            error!(item_id = line.item_id.0, error = %err, "cart: failed to sync quantity");
        }
    }
}
