//! Order API Handlers
//!
//! Checkout never trusts client arithmetic: prices come from the
//! catalog, totals are recomputed server-side, and the submitted totals
//! must agree within the money tolerance before anything is written.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AdminResponse, Order, OrderCreate, StatusUpdate};
use crate::db::repository::{OrderRepository, ProductRepository, RepoError, UserRepository};
use crate::pricing;
use crate::utils::time::now_millis;
use crate::utils::validation::{
    MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_all, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::cart::{CartTotals, LineItem};
use shared::order::OrderStatus;

/// Checkout: verify totals, reserve stock, persist the order
pub async fn checkout(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<ApiResponse<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    validate_all(vec![
        (
            "address",
            validate_required_text(&payload.shipping_address.address, "address", MAX_TEXT_LEN),
        ),
        (
            "city",
            validate_required_text(&payload.shipping_address.city, "city", MAX_SHORT_TEXT_LEN),
        ),
        (
            "postalCode",
            validate_required_text(
                &payload.shipping_address.postal_code,
                "postalCode",
                MAX_SHORT_TEXT_LEN,
            ),
        ),
        (
            "country",
            validate_required_text(
                &payload.shipping_address.country,
                "country",
                MAX_SHORT_TEXT_LEN,
            ),
        ),
        (
            "paymentMethod",
            validate_required_text(&payload.payment_method, "paymentMethod", MAX_SHORT_TEXT_LEN),
        ),
    ])?;

    let products = ProductRepository::new(state.get_db());

    // Rebuild every line from the catalog; client names, images and
    // prices are ignored. Duplicate product lines merge.
    let mut cart = pricing::Cart::new();
    for item in &payload.items {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Invalid quantity for {}",
                item.product
            )));
        }

        let product = products
            .find_by_id(&item.product)
            .await
            .map_err(|e| match e {
                RepoError::Validation(msg) => AppError::validation(msg),
                other => other.into(),
            })?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product", item.product.clone())
            })?;

        cart.add(LineItem {
            product: product
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| item.product.clone()),
            name: product.name.clone(),
            image: product
                .images
                .first()
                .map(|i| i.url.clone())
                .unwrap_or_default(),
            price: product.price,
            quantity: item.quantity,
        });
    }

    let computed = cart.totals();
    let submitted = CartTotals {
        items_price: payload.items_price,
        shipping_price: payload.shipping_price,
        tax_price: payload.tax_price,
        total_price: payload.total_price,
    };
    if !pricing::totals_match(&submitted, &computed) {
        return Err(AppError::new(ErrorCode::OrderTotalsMismatch)
            .with_detail("expectedItemsPrice", computed.items_price)
            .with_detail("expectedShippingPrice", computed.shipping_price)
            .with_detail("expectedTaxPrice", computed.tax_price)
            .with_detail("expectedTotalPrice", computed.total_price));
    }

    // Reserve stock line by line; roll back on the first failure
    let items: Vec<LineItem> = cart.items().to_vec();
    let mut reserved: Vec<(String, i64)> = Vec::new();
    for item in &items {
        match products
            .decrement_stock(&item.product, item.quantity as i64)
            .await
        {
            Ok(_) => reserved.push((item.product.clone(), item.quantity as i64)),
            Err(e) => {
                release_stock(&products, &reserved).await;
                return Err(match e {
                    RepoError::Validation(_) => AppError::new(ErrorCode::ProductOutOfStock)
                        .with_detail("product", item.product.clone()),
                    other => other.into(),
                });
            }
        }
    }

    let user = current
        .id
        .parse()
        .map_err(|_| AppError::validation("Invalid user id"))?;
    let now = now_millis();
    let order = Order {
        id: None,
        user,
        items,
        shipping_address: payload.shipping_address,
        payment_method: payload.payment_method,
        items_price: computed.items_price,
        shipping_price: computed.shipping_price,
        tax_price: computed.tax_price,
        total_price: computed.total_price,
        is_paid: false,
        paid_at: None,
        payment_result: None,
        status: OrderStatus::Pending,
        tracking_number: None,
        admin_response: None,
        created_at: now,
        updated_at: now,
    };

    let orders = OrderRepository::new(state.get_db());
    let order = match orders.create(order).await {
        Ok(order) => order,
        Err(e) => {
            release_stock(&products, &reserved).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        order_id = ?order.id,
        user_id = %current.id,
        total = order.total_price,
        "Order placed"
    );

    Ok(ok(order))
}

/// List the authenticated user's orders
pub async fn my_orders(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_by_user(&current.id).await?;
    Ok(ok(orders))
}

/// Get an order; owner or admin only
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    current: CurrentUser,
) -> AppResult<ApiResponse<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = fetch_order(&repo, &id).await?;
    authorize_order_access(&order, &current)?;
    Ok(ok(order))
}

/// Mark an order as paid; owner only
///
/// The optional body is the gateway confirmation, stored verbatim on
/// the order.
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    current: CurrentUser,
    payment_result: Option<Json<serde_json::Value>>,
) -> AppResult<ApiResponse<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = fetch_order(&repo, &id).await?;
    if order.user.to_string() != current.id {
        return Err(AppError::permission_denied("Not your order"));
    }

    let payment_result = payment_result.map(|Json(value)| value);
    let order = repo.mark_paid(&id, payment_result).await.map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::OrderAlreadyPaid),
        RepoError::NotFound(_) => AppError::new(ErrorCode::OrderNotFound),
        other => other.into(),
    })?;

    tracing::info!(order_id = %id, user_id = %current.id, "Order paid");

    Ok(ok(order))
}

/// An order with its owner's identity resolved for display
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// List all orders with owner identities (admin)
pub async fn list_all(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<AdminOrderView>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_all().await?;

    // Resolve each distinct owner once
    let users = UserRepository::new(state.get_db());
    let mut owners: HashMap<String, Option<(String, String)>> = HashMap::new();
    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        let key = order.user.to_string();
        if !owners.contains_key(&key) {
            let identity = users
                .find_by_id(&key)
                .await?
                .map(|u| (u.name, u.email));
            owners.insert(key.clone(), identity);
        }
        let (user_name, user_email) = match owners.get(&key).and_then(|o| o.clone()) {
            Some((name, email)) => (Some(name), Some(email)),
            None => (None, None),
        };
        views.push(AdminOrderView {
            order,
            user_name,
            user_email,
        });
    }

    Ok(ok(views))
}

/// Move an order along its lifecycle (admin)
///
/// Transitions follow the state machine in `shared::order`. Moving into
/// Cancelled or Denied releases the reserved stock.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    current: CurrentUser,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<ApiResponse<Order>> {
    let to = OrderStatus::parse(&payload.status).ok_or_else(|| {
        AppError::new(ErrorCode::InvalidOrderStatus).with_detail("status", payload.status.clone())
    })?;

    if to == OrderStatus::Denied && payload.message.as_deref().unwrap_or("").trim().is_empty() {
        return Err(AppError::validation("Denying an order requires a message"));
    }

    let repo = OrderRepository::new(state.get_db());
    let order = fetch_order(&repo, &id).await?;
    let from = order.status;

    if !from.can_transition_to(to) {
        return Err(AppError::new(ErrorCode::InvalidStatusTransition)
            .with_detail("from", from.as_str())
            .with_detail("to", to.as_str()));
    }

    let admin_response = payload.message.map(|message| AdminResponse {
        message,
        responded_at: now_millis(),
    });

    let updated = repo
        .set_status(&id, from, to, payload.tracking_number, admin_response)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, msg)
            }
            RepoError::NotFound(_) => AppError::new(ErrorCode::OrderNotFound),
            other => other.into(),
        })?;

    // Leaving the inventory-holding states returns the items to stock
    if from.holds_inventory() && !to.holds_inventory() {
        let products = ProductRepository::new(state.get_db());
        for item in &updated.items {
            if let Err(e) = products.restock(&item.product, item.quantity as i64).await {
                tracing::error!(
                    order_id = %id,
                    product = %item.product,
                    error = %e,
                    "Failed to restock after order release"
                );
            }
        }
    }

    tracing::info!(
        order_id = %id,
        admin_id = %current.id,
        from = %from,
        to = %to,
        "Order status updated"
    );

    Ok(ok(updated))
}

async fn fetch_order(repo: &OrderRepository, id: &str) -> AppResult<Order> {
    repo.find_by_id(id)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::validation(msg),
            other => other.into(),
        })?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

fn authorize_order_access(order: &Order, current: &CurrentUser) -> AppResult<()> {
    if current.is_admin() || order.user.to_string() == current.id {
        return Ok(());
    }
    Err(AppError::permission_denied("Not your order"))
}

async fn release_stock(products: &ProductRepository, reserved: &[(String, i64)]) {
    for (product, quantity) in reserved {
        if let Err(e) = products.restock(product, *quantity).await {
            tracing::error!(
                product = %product,
                error = %e,
                "Failed to roll back stock reservation"
            );
        }
    }
}
