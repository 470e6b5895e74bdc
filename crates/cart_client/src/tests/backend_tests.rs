use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, post},
    Form, Router,
};
use rust_decimal::Decimal;
use shared::{domain::CartItemId, protocol::QuantityUpdateForm};
use tokio::{net::TcpListener, sync::Mutex};

use crate::backend::{CartBackend, HttpCartBackend, OfflineCartBackend};

const FAILING_ITEM: i64 = 99;

#[derive(Clone, Default)]
struct StorefrontState {
    deletes: Arc<Mutex<Vec<(i64, Option<String>)>>>,
    updates: Arc<Mutex<Vec<(QuantityUpdateForm, Option<String>)>>>,
}

fn csrf_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-csrftoken")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn handle_delete(
    State(state): State<StorefrontState>,
    Path(item_id): Path<i64>,
    headers: HeaderMap,
) -> StatusCode {
    state
        .deletes
        .lock()
        .await
        .push((item_id, csrf_header(&headers)));
    if item_id == FAILING_ITEM {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

async fn handle_update(
    State(state): State<StorefrontState>,
    headers: HeaderMap,
    Form(form): Form<QuantityUpdateForm>,
) -> StatusCode {
    state
        .updates
        .lock()
        .await
        .push((form, csrf_header(&headers)));
    StatusCode::OK
}

async fn spawn_storefront() -> Result<(String, StorefrontState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = StorefrontState::default();
    let app = Router::new()
        .route("/delete_cart/:item_id/", delete(handle_delete))
        .route("/cart/", post(handle_update))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[tokio::test]
async fn delete_hits_item_path_with_csrf_header() {
    let (server_url, state) = spawn_storefront().await.expect("spawn server");
    let backend = HttpCartBackend::new(format!("{server_url}/"));
    assert_eq!(backend.base_url(), server_url);

    backend
        .delete_item(CartItemId(12), Some("token-abc"))
        .await
        .expect("delete");

    assert_eq!(
        state.deletes.lock().await.clone(),
        vec![(12, Some("token-abc".to_string()))]
    );
}

#[tokio::test]
async fn delete_reports_server_errors() {
    let (server_url, state) = spawn_storefront().await.expect("spawn server");
    let backend = HttpCartBackend::new(server_url);

    let err = backend
        .delete_item(CartItemId(FAILING_ITEM), None)
        .await
        .expect_err("server error");
    assert!(err.to_string().contains("500"), "unexpected error: {err}");
    assert_eq!(state.deletes.lock().await.clone(), vec![(FAILING_ITEM, None)]);
}

#[tokio::test]
async fn update_posts_quantity_form() {
    let (server_url, state) = spawn_storefront().await.expect("spawn server");
    let backend = HttpCartBackend::new(server_url);

    backend
        .update_quantity(CartItemId(4), 3, Decimal::new(4950, 2), Some("tok"))
        .await
        .expect("update");

    let updates = state.updates.lock().await.clone();
    assert_eq!(updates.len(), 1);
    let (form, token) = &updates[0];
    assert_eq!(form.item_id, 4);
    assert_eq!(form.quantity, 3);
    assert_eq!(form.selected_discounted_price, "49.50");
    assert_eq!(token.as_deref(), Some("tok"));
}

#[tokio::test]
async fn unreachable_storefront_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let backend = HttpCartBackend::new(format!("http://{addr}"));
    let err = backend
        .delete_item(CartItemId(1), None)
        .await
        .expect_err("connection refused");
    assert!(err.to_string().contains("failed to reach"));
}

#[tokio::test]
async fn offline_backend_always_fails() {
    let backend = OfflineCartBackend;
    assert!(backend.delete_item(CartItemId(1), None).await.is_err());
    assert!(backend
        .update_quantity(CartItemId(1), 2, Decimal::ONE, None)
        .await
        .is_err());
}
