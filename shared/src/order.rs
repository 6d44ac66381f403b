//! Order status state machine
//!
//! Fulfilment moves forward one step at a time. Cancellation and denial
//! are allowed from any non-terminal state. Delivered, Cancelled and
//! Denied are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Denied,
}

impl OrderStatus {
    /// All status values, in fulfilment order
    pub const ALL: [OrderStatus; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Denied,
    ];

    /// Whether this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Denied)
    }

    /// Whether the items of an order in this status are still reserved
    /// against product inventory
    pub fn holds_inventory(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Denied)
    }

    /// The next state in the forward fulfilment chain, if any
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled | Self::Denied => None,
        }
    }

    /// Whether the transition `self -> to` is a legal edge
    ///
    /// Legal edges are the single forward step in the fulfilment chain,
    /// plus Cancelled or Denied from any non-terminal state. Skipping
    /// states and moving backwards are both rejected.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match to {
            Self::Cancelled | Self::Denied => true,
            _ => self.next() == Some(to),
        }
    }

    /// Status name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Denied => "Denied",
        }
    }

    /// Parse a status from its wire name
    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "Pending" => Some(Self::Pending),
            "Confirmed" => Some(Self::Confirmed),
            "Processing" => Some(Self::Processing),
            "Shipped" => Some(Self::Shipped),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            "Denied" => Some(Self::Denied),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_chain() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_skipping() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_backwards() {
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Processing));
    }

    #[test]
    fn test_cancel_and_deny_from_any_non_terminal() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
        ] {
            assert!(status.can_transition_to(OrderStatus::Cancelled));
            assert!(status.can_transition_to(OrderStatus::Denied));
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        for terminal in [
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Denied,
        ] {
            assert!(terminal.is_terminal());
            for target in OrderStatus::ALL {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        for status in OrderStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_holds_inventory() {
        assert!(OrderStatus::Pending.holds_inventory());
        assert!(OrderStatus::Delivered.holds_inventory());
        assert!(!OrderStatus::Cancelled.holds_inventory());
        assert!(!OrderStatus::Denied.holds_inventory());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");

        let status: OrderStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_parse() {
        assert_eq!(OrderStatus::parse("Shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("shipped"), None);
        assert_eq!(OrderStatus::parse("Refunded"), None);
    }
}
