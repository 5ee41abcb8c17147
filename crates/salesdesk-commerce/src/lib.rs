//! Sale pricing domain types for SalesDesk.
//!
//! - **Catalog**: Products as served by the backend, keyed by ID
//! - **Sale**: Line items, totals, outstanding balance and summaries
//! - **Money**: Exact minor-unit amounts with currency
//!
//! # Example
//!
//! ```rust
//! use salesdesk_commerce::prelude::*;
//!
//! let catalog = Catalog::from_products(
//!     Currency::BOB,
//!     [Product::new("A", "Arroz", 10.00), Product::new("B", "Sal", 5.50)],
//! );
//! let items = vec![LineItem::new("A", 2)?, LineItem::new("B", 1)?];
//!
//! let total = compute_total(&items, &catalog);
//! assert_eq!(total.display(), "Bs 25.50");
//!
//! let outstanding = compute_outstanding(total, Money::parse("20.00", Currency::BOB)?)?;
//! assert_eq!(outstanding.display(), "Bs 5.50");
//! # Ok::<(), CommerceError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;
pub mod sale;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{Catalog, Product};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::sale::{
        compute_outstanding, compute_total, summarize, LineItem, LinePricing, SaleSummary,
    };
}
