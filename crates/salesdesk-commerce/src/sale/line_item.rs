//! Sale line items.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;

/// One product line of a sale.
///
/// Serialized with the backend's field names (`product`, `quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product being sold.
    #[serde(rename = "product")]
    pub product_id: ProductId,
    /// Units sold.
    pub quantity: i64,
}

impl LineItem {
    /// Create a line item. Quantities below 1 are rejected.
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Result<Self, CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        Ok(Self {
            product_id: product_id.into(),
            quantity,
        })
    }
}

/// Parses `PRODUCT_ID:QUANTITY`, e.g. `65f1c0a2:3`.
impl FromStr for LineItem {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, qty) = s
            .rsplit_once(':')
            .ok_or_else(|| CommerceError::InvalidLineItem(s.to_string()))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(CommerceError::InvalidLineItem(s.to_string()));
        }
        let quantity: i64 = qty
            .trim()
            .parse()
            .map_err(|_| CommerceError::InvalidLineItem(s.to_string()))?;
        LineItem::new(id, quantity)
    }
}
