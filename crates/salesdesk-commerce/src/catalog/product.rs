//! Product type as served by the backend.

use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Deserializer, Serialize};

/// A product in the catalog.
///
/// Field names follow the backend's JSON (`_id`, `name`, `price`,
/// `quantity`); unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unit price as a decimal amount in the catalog currency.
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    /// Units in stock.
    #[serde(default)]
    pub quantity: i64,
}

impl Product {
    /// Create a product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity: 0,
        }
    }

    /// Set the stock count.
    pub fn with_stock(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Unit price in `currency`.
    pub fn unit_price(&self, currency: Currency) -> Money {
        Money::from_decimal(self.price, currency)
    }

    /// Check if any units are in stock.
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// Prices entered through forms come back as strings from some endpoints.
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(n) => Ok(n),
        Price::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid price {:?}", s))),
    }
}
