//! Sale total and balance calculation.

use crate::catalog::Catalog;
use crate::error::CommerceError;
use crate::money::Money;
use crate::sale::{LineItem, LinePricing, SaleSummary};

/// Sum of `unit_price × quantity` over the line items.
///
/// Items whose product is not in the catalog contribute nothing. The result
/// is in the catalog's currency and saturates rather than overflowing.
pub fn compute_total(line_items: &[LineItem], catalog: &Catalog) -> Money {
    let cents = line_items
        .iter()
        .filter_map(|item| {
            catalog
                .unit_price(&item.product_id)
                .map(|price| price.multiply(item.quantity).amount_cents)
        })
        .fold(0_i64, i64::saturating_add);
    Money::new(cents, catalog.currency())
}

/// Balance still owed: `total - amount_paid`.
///
/// Not clamped; a negative result means the customer overpaid.
pub fn compute_outstanding(total: Money, amount_paid: Money) -> Result<Money, CommerceError> {
    total.try_subtract(&amount_paid)
}

/// Per-line breakdown, total, payment and balance of a sale.
pub fn summarize(
    line_items: &[LineItem],
    catalog: &Catalog,
    amount_paid: Money,
) -> Result<SaleSummary, CommerceError> {
    let currency = catalog.currency();
    let lines = line_items
        .iter()
        .map(|item| match catalog.get(&item.product_id) {
            Some(product) => {
                let unit_price = product.unit_price(currency);
                LinePricing {
                    product_id: item.product_id.clone(),
                    name: Some(product.name.clone()),
                    quantity: item.quantity,
                    unit_price: Some(unit_price),
                    subtotal: unit_price.multiply(item.quantity),
                    resolved: true,
                }
            }
            None => LinePricing {
                product_id: item.product_id.clone(),
                name: None,
                quantity: item.quantity,
                unit_price: None,
                subtotal: Money::zero(currency),
                resolved: false,
            },
        })
        .collect();

    let total = compute_total(line_items, catalog);
    let outstanding = compute_outstanding(total, amount_paid)?;

    Ok(SaleSummary {
        lines,
        total,
        paid: amount_paid,
        outstanding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::money::Currency;

    fn bob(cents: i64) -> Money {
        Money::new(cents, Currency::BOB)
    }

    fn catalog() -> Catalog {
        Catalog::from_products(
            Currency::BOB,
            [Product::new("A", "Arroz", 10.00), Product::new("B", "Sal", 5.50)],
        )
    }

    fn items(pairs: &[(&str, i64)]) -> Vec<LineItem> {
        pairs.iter()
            .map(|(id, qty)| LineItem::new(*id, *qty).unwrap())
            .collect()
    }

    // === compute_total ===

    #[test]
    fn test_total_sums_lines() {
        let total = compute_total(&items(&[("A", 2), ("B", 1)]), &catalog());
        assert_eq!(total, bob(2550));
        assert_eq!(total.display(), "Bs 25.50");
    }

    #[test]
    fn test_total_of_nothing_is_zero() {
        assert_eq!(compute_total(&[], &catalog()), bob(0));
        assert_eq!(compute_total(&items(&[("A", 3)]), &Catalog::new(Currency::BOB)), bob(0));
    }

    #[test]
    fn test_unresolved_product_contributes_zero() {
        let catalog = Catalog::from_products(Currency::BOB, [Product::new("A", "Arroz", 10.00)]);
        let total = compute_total(&items(&[("A", 1), ("Z", 3)]), &catalog);
        assert_eq!(total, bob(1000));
    }

    #[test]
    fn test_total_is_exact_for_decimal_prices() {
        let catalog = Catalog::from_products(Currency::BOB, [Product::new("C", "Cafe", 0.1)]);
        assert_eq!(compute_total(&items(&[("C", 3)]), &catalog), bob(30));
    }

    #[test]
    fn test_total_treats_quantities_arithmetically() {
        let lines = vec![LineItem {
            product_id: "A".into(),
            quantity: 0,
        }];
        assert_eq!(compute_total(&lines, &catalog()), bob(0));
    }

    // === compute_outstanding ===

    #[test]
    fn test_outstanding() {
        let total = bob(2550);
        assert_eq!(compute_outstanding(total, bob(2000)).unwrap(), bob(550));
        assert_eq!(compute_outstanding(total, bob(2550)).unwrap(), bob(0));
        assert_eq!(compute_outstanding(total, bob(3000)).unwrap(), bob(-450));
        assert_eq!(compute_outstanding(bob(0), bob(0)).unwrap(), bob(0));
    }

    #[test]
    fn test_outstanding_currency_mismatch() {
        let result = compute_outstanding(bob(100), Money::new(100, Currency::USD));
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    // === summarize ===

    #[test]
    fn test_summary() {
        let summary = summarize(&items(&[("A", 2), ("B", 1), ("Z", 4)]), &catalog(), bob(2000)).unwrap();

        assert_eq!(summary.total, bob(2550));
        assert_eq!(summary.paid, bob(2000));
        assert_eq!(summary.outstanding, bob(550));
        assert!(!summary.is_settled());

        assert_eq!(summary.lines.len(), 3);
        assert_eq!(summary.lines[0].label(), "2 x Bs 10.00");
        assert_eq!(summary.lines[0].subtotal, bob(2000));
        assert_eq!(summary.lines[0].name.as_deref(), Some("Arroz"));

        let unresolved: Vec<_> = summary.unresolved().map(|l| l.product_id.as_str()).collect();
        assert_eq!(unresolved, vec!["Z"]);
        assert_eq!(summary.lines[2].subtotal, bob(0));
        assert_eq!(summary.lines[2].label(), "4 x ?");
    }

    #[test]
    fn test_summary_overpaid() {
        let summary = summarize(&items(&[("A", 2), ("B", 1)]), &catalog(), bob(3000)).unwrap();
        assert_eq!(summary.outstanding, bob(-450));
        assert!(summary.is_settled());
        assert_eq!(summary.change_due(), bob(450));
    }
}
