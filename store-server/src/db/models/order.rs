//! Order model
//!
//! An order snapshots its line items at checkout time, so later catalog
//! edits never rewrite historical orders.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::cart::LineItem;
use shared::order::OrderStatus;
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// Shipping address snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Admin message attached to an order (deny reason, support reply)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub message: String,
    /// Unix millis
    pub responded_at: i64,
}

/// Order matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Owning user
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub shipping_price: f64,
    pub tax_price: f64,
    pub total_price: f64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<i64>,
    /// Raw gateway confirmation, stored as submitted
    #[serde(default)]
    pub payment_result: Option<serde_json::Value>,
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub admin_response: Option<AdminResponse>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Checkout request: line items plus the client-computed totals.
/// The totals are verified against a server-side recomputation before
/// anything is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub shipping_price: f64,
    pub tax_price: f64,
    pub total_price: f64,
}

/// Admin status transition request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Target status name, e.g. "Shipped"
    pub status: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Message recorded as the admin response (required in spirit for
    /// Denied, optional otherwise)
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_create_wire_names() {
        let json = r#"{
            "items": [{"product":"product:p1","name":"Phone","image":"/p.jpg","price":300.0,"quantity":1}],
            "shippingAddress": {"address":"1 Main St","city":"Lisbon","postalCode":"1000-001","country":"PT"},
            "paymentMethod": "card",
            "itemsPrice": 300.0,
            "shippingPrice": 100.0,
            "taxPrice": 54.0,
            "totalPrice": 454.0
        }"#;
        let payload: OrderCreate = serde_json::from_str(json).unwrap();
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.shipping_address.postal_code, "1000-001");
        assert_eq!(payload.total_price, 454.0);
    }
}
