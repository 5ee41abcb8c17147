//! Product catalog module.
//!
//! A catalog maps product IDs to products priced in one currency.

mod product;

pub use product::Product;

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Products available to a sale, keyed by ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    currency: Currency,
    products: HashMap<ProductId, Product>,
}

/// Product listing as returned by `/products`: either a bare array or the
/// paginated `{ "productos": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Page { productos: Vec<Product> },
    List(Vec<Product>),
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            products: HashMap::new(),
        }
    }

    /// Build a catalog from products. Later duplicates replace earlier ones.
    pub fn from_products(currency: Currency, products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::new(currency);
        catalog.extend(products);
        catalog
    }

    /// Parse a backend product listing.
    pub fn from_json(bytes: &[u8], currency: Currency) -> Result<Self, CommerceError> {
        let products = match serde_json::from_slice(bytes)? {
            Listing::Page { productos } => productos,
            Listing::List(list) => list,
        };
        Ok(Self::from_products(currency, products))
    }

    /// Currency prices are expressed in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Add or replace a product.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// Add or replace several products.
    pub fn extend(&mut self, products: impl IntoIterator<Item = Product>) {
        for product in products {
            self.insert(product);
        }
    }

    /// Look up a product.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Look up a product that must exist.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Unit price of a product, if it is in the catalog.
    pub fn unit_price(&self, id: &ProductId) -> Option<Money> {
        self.get(id).map(|p| p.unit_price(self.currency))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over products in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::from_products(
            Currency::BOB,
            [Product::new("A", "Arroz", 10.0), Product::new("B", "Sal", 5.5)],
        );

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.unit_price(&"B".into()),
            Some(Money::new(550, Currency::BOB))
        );
        assert_eq!(catalog.unit_price(&"Z".into()), None);
        assert!(matches!(
            catalog.require(&"Z".into()),
            Err(CommerceError::ProductNotFound(id)) if id == "Z"
        ));
    }

    #[test]
    fn test_catalog_from_paginated_listing() {
        let json = br#"{"productos": [{"_id": "A", "name": "Arroz", "price": 10}], "totalPages": 3}"#;
        let catalog = Catalog::from_json(json, Currency::BOB).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.require(&"A".into()).unwrap().name, "Arroz");
    }

    #[test]
    fn test_catalog_from_bare_array() {
        let json = br#"[{"_id": "A", "price": 1.25}, {"_id": "A", "price": 2.5}]"#;
        let catalog = Catalog::from_json(json, Currency::USD).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.unit_price(&"A".into()).unwrap().display(), "$2.50");
    }

    #[test]
    fn test_catalog_rejects_other_shapes() {
        assert!(matches!(
            Catalog::from_json(br#"{"message": "unauthorized"}"#, Currency::BOB),
            Err(CommerceError::Serialization(_))
        ));
    }
}
