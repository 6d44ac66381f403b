//! Cart pricing using rust_decimal for precision
//!
//! All derivations run on `Decimal` internally and convert to `f64`
//! only for storage/serialization. Totals are always recomputed from
//! the full line-item list, never patched incrementally, so repeated or
//! out-of-order mutations cannot cause drift.
//!
//! Formulas:
//! - `items_price = sum(price * quantity)`
//! - `shipping_price = 0 if items_price > 1000 else 100`
//! - `tax_price = round(items_price * 0.18, 2)`
//! - `total_price = items_price + shipping_price + tax_price`

use rust_decimal::prelude::*;
use shared::cart::{CartTotals, LineItem};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Free-shipping threshold: orders strictly above this ship free
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Flat shipping fee below the threshold
const SHIPPING_FLAT_FEE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Tax rate: 18%
const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
///
/// Non-finite inputs are rejected upstream by validation; if one slips
/// through, log and treat as zero rather than corrupting totals.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Derive the four price fields from a list of line items
///
/// Pure and side-effect free. The empty list yields items 0, shipping
/// 100, tax 0.
pub fn compute_totals(items: &[LineItem]) -> CartTotals {
    let items_price: Decimal = items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum();
    let items_price = round2(items_price);

    let shipping_price = if items_price > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        SHIPPING_FLAT_FEE
    };

    let tax_price = round2(items_price * TAX_RATE);
    let total_price = items_price + shipping_price + tax_price;

    CartTotals {
        items_price: to_f64(items_price),
        shipping_price: to_f64(shipping_price),
        tax_price: to_f64(tax_price),
        total_price: to_f64(total_price),
    }
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff <= MONEY_TOLERANCE
}

/// Whether submitted totals agree with a server-side recomputation
pub fn totals_match(submitted: &CartTotals, computed: &CartTotals) -> bool {
    money_eq(submitted.items_price, computed.items_price)
        && money_eq(submitted.shipping_price, computed.shipping_price)
        && money_eq(submitted.tax_price, computed.tax_price)
        && money_eq(submitted.total_price, computed.total_price)
}

/// A cart aggregate: an ordered line-item list with derived totals
///
/// Every mutation triggers a full recomputation via [`compute_totals`].
/// Quantity updates of zero or less remove the line.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item. If the product is already in the cart, its quantity
    /// is increased and the snapshot fields are refreshed.
    pub fn add(&mut self, item: LineItem) {
        match self.items.iter_mut().find(|i| i.product == item.product) {
            Some(existing) => {
                existing.quantity += item.quantity;
                existing.name = item.name;
                existing.image = item.image;
                existing.price = item.price;
            }
            None => self.items.push(item),
        }
    }

    /// Set the quantity of a line; zero or negative removes it
    pub fn set_quantity(&mut self, product: &str, quantity: i32) {
        if quantity <= 0 {
            self.remove(product);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product == product) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product: &str) {
        self.items.retain(|i| i.product != product);
    }

    /// Current totals, derived from scratch
    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.items)
    }
}

#[cfg(test)]
mod tests;
