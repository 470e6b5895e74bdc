use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use shared::{
    domain::CartItemId,
    pricing::format_amount,
    protocol::{delete_cart_path, QuantityUpdateForm, CSRF_HEADER, UPDATE_CART_PATH},
};
use tracing::{debug, info};

#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Removes the item from the server-side cart.
    async fn delete_item(&self, item_id: CartItemId, csrf_token: Option<&str>) -> Result<()>;

    /// Stores a new quantity for the item.
    async fn update_quantity(
        &self,
        item_id: CartItemId,
        quantity: u32,
        unit_price: Decimal,
        csrf_token: Option<&str>,
    ) -> Result<()>;
}

/// Backend used when no storefront is configured; every call fails.
pub struct OfflineCartBackend;

#[async_trait]
impl CartBackend for OfflineCartBackend {
    async fn delete_item(&self, item_id: CartItemId, _csrf_token: Option<&str>) -> Result<()> {
        Err(anyhow!(
            "storefront unavailable; cannot delete cart item {}",
            item_id.0
        ))
    }

    async fn update_quantity(
        &self,
        item_id: CartItemId,
        _quantity: u32,
        _unit_price: Decimal,
        _csrf_token: Option<&str>,
    ) -> Result<()> {
        Err(anyhow!(
            "storefront unavailable; cannot update cart item {}",
            item_id.0
        ))
    }
}

pub struct HttpCartBackend {
    http: Client,
    base_url: String,
}

impl HttpCartBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CartBackend for HttpCartBackend {
    async fn delete_item(&self, item_id: CartItemId, csrf_token: Option<&str>) -> Result<()> {
        let url = format!("{}{}", self.base_url, delete_cart_path(item_id));
        let mut request = self.http.delete(&url);
        if let Some(token) = csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        debug!(item_id = item_id.0, url = %url, "cart: sending delete");
        request
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?
            .error_for_status()?;
        info!(item_id = item_id.0, "cart: item removed from cart");
        Ok(())
    }

    async fn update_quantity(
        &self,
        item_id: CartItemId,
        quantity: u32,
        unit_price: Decimal,
        csrf_token: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}{UPDATE_CART_PATH}", self.base_url);
        let form = QuantityUpdateForm {
            item_id: item_id.0,
            quantity,
            selected_discounted_price: format_amount(unit_price),
        };
        let mut request = self.http.post(&url).form(&form);
        if let Some(token) = csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        request
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?
            .error_for_status()?;
        debug!(item_id = item_id.0, quantity, "cart: quantity synced");
        Ok(())
    }
}
