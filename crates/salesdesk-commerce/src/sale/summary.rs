//! Sale summary types.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Computed figures for a sale. Derived on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleSummary {
    /// Per-line breakdown, in input order.
    pub lines: Vec<LinePricing>,
    /// Sum of resolved line subtotals.
    pub total: Money,
    /// Amount paid.
    pub paid: Money,
    /// `total - paid`; negative when overpaid.
    pub outstanding: Money,
}

impl SaleSummary {
    /// Check if nothing remains to be paid.
    pub fn is_settled(&self) -> bool {
        !self.outstanding.is_positive()
    }

    /// Amount to hand back to the customer (zero unless overpaid).
    pub fn change_due(&self) -> Money {
        if self.outstanding.is_negative() {
            self.outstanding.negate()
        } else {
            Money::zero(self.outstanding.currency)
        }
    }

    /// Lines whose product was not in the catalog.
    pub fn unresolved(&self) -> impl Iterator<Item = &LinePricing> {
        self.lines.iter().filter(|l| !l.resolved)
    }
}

/// Pricing of a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name, when resolved.
    pub name: Option<String>,
    /// Quantity.
    pub quantity: i64,
    /// Unit price, when resolved.
    pub unit_price: Option<Money>,
    /// Subtotal (unit_price * quantity, zero when unresolved).
    pub subtotal: Money,
    /// Whether the product was found in the catalog.
    pub resolved: bool,
}

impl LinePricing {
    /// Quantity and unit price, e.g. `2 x Bs 10.00`.
    pub fn label(&self) -> String {
        match &self.unit_price {
            Some(price) => format!("{} x {}", self.quantity, price),
            None => format!("{} x ?", self.quantity),
        }
    }
}
