//! Dashboard statistics.

use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::{cart::Cart, discounts::DiscountLog, pricing};

/// A car ranked by how many units of it sit in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopCar {
    /// Car id.
    pub car_id: String,

    /// Car display name.
    pub car_name: String,

    /// Units in the cart.
    pub count: u32,
}

/// Numbers shown on the admin dashboard, derived from cart and log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesStats {
    /// Units across all cart lines.
    pub cars_in_cart: u32,

    /// Cart total with discounts applied.
    pub potential_revenue: Decimal,

    /// Potential revenue divided by unit count; zero for an empty cart.
    pub average_price_per_car: Decimal,

    /// Grants stamped on the given day.
    pub discounts_today: usize,

    /// Up to five cars by descending cart quantity.
    pub top_cars: Vec<TopCar>,
}

/// Derive the dashboard numbers for the given day.
#[must_use]
pub fn sales_stats(cart: &Cart, log: &DiscountLog, today: Date) -> SalesStats {
    let cars_in_cart = cart.unit_count();
    let potential_revenue = pricing::cart_total(cart);

    let average_price_per_car = if cars_in_cart == 0 {
        Decimal::ZERO
    } else {
        potential_revenue / Decimal::from(cars_in_cart)
    };

    let mut top_cars: Vec<TopCar> = cart
        .items()
        .iter()
        .map(|item| TopCar {
            car_id: item.car.id.clone(),
            car_name: item.car.name.clone(),
            count: item.quantity,
        })
        .collect();
    top_cars.sort_by(|a, b| b.count.cmp(&a.count));
    top_cars.truncate(5);

    SalesStats {
        cars_in_cart,
        potential_revenue,
        average_price_per_car,
        discounts_today: log.granted_on(today),
        top_cars,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use jiff::{Timestamp, tz::TimeZone};
    use testresult::TestResult;

    use crate::{
        catalog::{Car, StockStatus},
        discounts::LogEntry,
    };

    use super::*;

    fn car(id: &str, price: i64) -> Car {
        Car {
            id: id.to_owned(),
            name: format!("Car {id}"),
            brand: "Test".to_owned(),
            model: "T".to_owned(),
            year: 2024,
            price: Decimal::from(price),
            status: StockStatus::InStock,
            addons: Vec::new(),
            discount: None,
        }
    }

    #[test]
    fn empty_cart_produces_zeroed_stats() {
        let stats = sales_stats(&Cart::new(), &DiscountLog::new(), Date::constant(2026, 8, 6));

        assert_eq!(stats.cars_in_cart, 0);
        assert_eq!(stats.potential_revenue, Decimal::ZERO);
        assert_eq!(stats.average_price_per_car, Decimal::ZERO);
        assert!(stats.top_cars.is_empty());
    }

    #[test]
    fn revenue_and_average_follow_the_cart_total() {
        let mut cart = Cart::new();
        let first = car("car-1", 100_000);
        cart.add_item(&first, Vec::new(), BTreeMap::new());
        cart.add_item(&first, Vec::new(), BTreeMap::new());
        cart.add_item(&car("car-2", 40_000), Vec::new(), BTreeMap::new());

        let stats = sales_stats(&cart, &DiscountLog::new(), Date::constant(2026, 8, 6));

        assert_eq!(stats.cars_in_cart, 3);
        assert_eq!(stats.potential_revenue, Decimal::from(240_000));
        assert_eq!(stats.average_price_per_car, Decimal::from(80_000));
        assert_eq!(stats.top_cars.first().map(|top| top.count), Some(2));
    }

    #[test]
    fn discounts_today_only_counts_the_given_day() -> TestResult {
        let mut log = DiscountLog::new();
        let stamp: Timestamp = "2026-08-06T09:00:00Z".parse()?;
        log.record(LogEntry::for_grant(
            &car("car-1", 100_000),
            &crate::discounts::DiscountGrant {
                percentage: 10,
                granted_by: "Tester".to_owned(),
                granted_at: stamp,
            },
        ));

        let today = stamp.to_zoned(TimeZone::UTC).date();
        let stats = sales_stats(&Cart::new(), &log, today);
        assert_eq!(stats.discounts_today, 1);

        let other_day = sales_stats(&Cart::new(), &log, Date::constant(2026, 8, 7));
        assert_eq!(other_day.discounts_today, 0);

        Ok(())
    }
}
