//! Cart line items and derived totals
//!
//! These are wire types shared between the server and its clients. The
//! totals arithmetic itself lives in the server's pricing module and is
//! always recomputed from the line items, never patched incrementally.

use serde::{Deserialize, Serialize};

/// A single cart or order line: a product snapshot with a quantity
///
/// The name, image and unit price are captured at the time the item is
/// added so that later catalog edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product record id, e.g. `product:abc123`
    pub product: String,
    pub name: String,
    pub image: String,
    /// Unit price snapshot
    pub price: f64,
    pub quantity: i32,
}

impl LineItem {
    /// Line subtotal before shipping and tax
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// The four derived price fields of a cart or order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub items_price: f64,
    pub shipping_price: f64,
    pub tax_price: f64,
    pub total_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = LineItem {
            product: "product:abc".to_string(),
            name: "Widget".to_string(),
            image: "/images/widget.jpg".to_string(),
            price: 600.0,
            quantity: 2,
        };
        assert_eq!(item.line_total(), 1200.0);
    }

    #[test]
    fn test_wire_field_names() {
        let totals = CartTotals {
            items_price: 300.0,
            shipping_price: 100.0,
            tax_price: 54.0,
            total_price: 454.0,
        };
        let json = serde_json::to_string(&totals).unwrap();
        assert!(json.contains("\"itemsPrice\":300.0"));
        assert!(json.contains("\"shippingPrice\":100.0"));
        assert!(json.contains("\"taxPrice\":54.0"));
        assert!(json.contains("\"totalPrice\":454.0"));
    }

    #[test]
    fn test_line_item_round_trip() {
        let json = r#"{"product":"product:x1","name":"Phone","image":"/p.jpg","price":299.99,"quantity":1}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.product, "product:x1");
        assert_eq!(item.quantity, 1);
        let back = serde_json::to_string(&item).unwrap();
        assert!(back.contains("\"price\":299.99"));
    }
}
