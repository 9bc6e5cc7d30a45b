//! Pricing.
//!
//! Pure total calculations over cart lines. Every function here is
//! deterministic and side-effect free; amounts are exact decimals and no
//! rounding happens at this layer.

use rust_decimal::Decimal;

use crate::cart::{Cart, CartItem};

/// Price of one line before any discount:
/// (base price + selected addon prices) × quantity.
///
/// Selected addon ids with no match on the car price as zero.
#[must_use]
pub fn line_subtotal(item: &CartItem) -> Decimal {
    let addons: Decimal = item
        .selected_addons
        .iter()
        .filter_map(|addon_id| item.car.addon(addon_id))
        .map(|addon| addon.price)
        .sum();

    (item.car.price + addons) * Decimal::from(item.quantity)
}

/// Price of one line after its discount, if any.
///
/// The percentage applies to the full subtotal, addons included, never to
/// the base price alone.
#[must_use]
pub fn line_total(item: &CartItem) -> Decimal {
    let subtotal = line_subtotal(item);

    match &item.discount {
        Some(grant) => subtotal * remainder_multiplier(grant.percentage),
        None => subtotal,
    }
}

/// Sum of [`line_total`] over the whole cart. An empty cart totals zero.
#[must_use]
pub fn cart_total(cart: &Cart) -> Decimal {
    cart.items().iter().map(line_total).sum()
}

/// Exact multiplier for "pay (100 − pct)%", e.g. 10 → 0.90.
fn remainder_multiplier(percentage: u8) -> Decimal {
    Decimal::new(i64::from(100_u8.saturating_sub(percentage)), 2)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use jiff::Timestamp;

    use crate::{
        catalog::{Addon, AddonCategory, Car, StockStatus},
        discounts::DiscountGrant,
    };

    use super::*;

    fn item(price: i64, addon_price: i64, quantity: u32) -> CartItem {
        let car = Car {
            id: "car-1".to_owned(),
            name: "Test Car".to_owned(),
            brand: "Test".to_owned(),
            model: "T".to_owned(),
            year: 2024,
            price: Decimal::from(price),
            status: StockStatus::InStock,
            addons: vec![Addon {
                id: "addon-1".to_owned(),
                name: "Addon".to_owned(),
                description: None,
                price: Decimal::from(addon_price),
                category: AddonCategory::Luxury,
                requires_note: false,
            }],
            discount: None,
        };

        CartItem {
            car,
            quantity,
            selected_addons: BTreeSet::from(["addon-1".to_owned()]),
            notes: BTreeMap::new(),
            discount: None,
        }
    }

    fn grant(percentage: u8) -> DiscountGrant {
        DiscountGrant {
            percentage,
            granted_by: "Tester".to_owned(),
            granted_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn subtotal_multiplies_base_plus_addons_by_quantity() {
        let item = item(100_000, 10_000, 2);

        assert_eq!(line_subtotal(&item), Decimal::from(220_000));
    }

    #[test]
    fn ten_percent_off_the_worked_example() {
        let mut item = item(100_000, 10_000, 2);
        item.discount = Some(grant(10));

        assert_eq!(line_total(&item), Decimal::from(198_000));
    }

    #[test]
    fn unknown_addon_ids_price_as_zero() {
        let mut item = item(100_000, 10_000, 1);
        item.selected_addons.insert("addon-ghost".to_owned());

        assert_eq!(line_subtotal(&item), Decimal::from(110_000));
    }

    #[test]
    fn discount_applies_to_the_full_subtotal_not_base_price() {
        let mut item = item(100_000, 10_000, 1);
        item.discount = Some(grant(50));

        assert_eq!(line_total(&item), Decimal::from(55_000));
    }

    #[test]
    fn line_total_never_exceeds_subtotal_and_matches_without_discount() {
        let plain = item(100_000, 10_000, 3);
        assert_eq!(line_total(&plain), line_subtotal(&plain));

        let mut discounted = item(100_000, 10_000, 3);
        discounted.discount = Some(grant(1));
        assert!(
            line_total(&discounted) < line_subtotal(&discounted),
            "any discount must lower the total"
        );
    }

    #[test]
    fn fractional_results_stay_exact() {
        let mut item = item(99_999, 0, 1);
        item.selected_addons.clear();
        item.discount = Some(grant(7));

        assert_eq!(line_total(&item), Decimal::new(9_299_907, 2));
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(cart_total(&Cart::new()), Decimal::ZERO);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let mut item = item(100_000, 10_000, 2);
        item.discount = Some(grant(10));

        assert_eq!(line_total(&item), line_total(&item));
    }
}
