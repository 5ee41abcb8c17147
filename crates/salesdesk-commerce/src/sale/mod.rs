//! Sale module.
//!
//! Contains line items and the total/balance calculation.

mod calculator;
mod line_item;
mod summary;

pub use calculator::{compute_outstanding, compute_total, summarize};
pub use line_item::LineItem;
pub use summary::{LinePricing, SaleSummary};
