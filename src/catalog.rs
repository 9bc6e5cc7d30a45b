//! Car catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discounts::DiscountGrant;

/// Storefront grouping for addons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonCategory {
    /// Performance and styling extras.
    Sport,
    /// Driver-assistance and protection extras.
    Safety,
    /// Comfort and finish extras.
    Luxury,
    /// Extras that need buyer input, such as a tint level.
    Special,
}

/// Optional extra sold alongside a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    /// Stable addon id, unique within the car.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Longer storefront description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Addon price in whole currency units.
    pub price: Decimal,

    /// Storefront grouping.
    pub category: AddonCategory,

    /// The buyer must leave a note when selecting this addon.
    #[serde(default)]
    pub requires_note: bool,
}

/// Stock status of a catalog car.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Available for purchase.
    #[default]
    InStock,
    /// Listed but currently unavailable.
    OutOfStock,
}

/// A car offered in the showroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    /// Stable car id.
    pub id: String,

    /// Full display name.
    pub name: String,

    /// Manufacturer.
    pub brand: String,

    /// Model line.
    pub model: String,

    /// Model year.
    pub year: i16,

    /// Base price before addons and discounts, in whole currency units.
    pub price: Decimal,

    /// Stock status.
    #[serde(default)]
    pub status: StockStatus,

    /// Extras that can be selected with this car.
    #[serde(default)]
    pub addons: Vec<Addon>,

    /// Catalog-level discount, snapshotted onto every future cart addition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountGrant>,
}

impl Car {
    /// Look up one of the car's addons by id.
    #[must_use]
    pub fn addon(&self, addon_id: &str) -> Option<&Addon> {
        self.addons.iter().find(|addon| addon.id == addon_id)
    }
}

/// The set of cars on offer, looked up by id.
///
/// The cart core only reads the catalog; the mutating operations below exist
/// for the admin pricing surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    cars: Vec<Car>,
}

impl Catalog {
    /// Build a catalog from the given cars.
    #[must_use]
    pub fn new(cars: Vec<Car>) -> Self {
        Self { cars }
    }

    /// Look up a car by id.
    #[must_use]
    pub fn get(&self, car_id: &str) -> Option<&Car> {
        self.cars.iter().find(|car| car.id == car_id)
    }

    /// All cars, in listing order.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Number of listed cars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// Whether the catalog lists no cars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Overwrite a car's base price. Returns `false` when the id is unknown.
    pub fn set_price(&mut self, car_id: &str, price: Decimal) -> bool {
        match self.car_mut(car_id) {
            Some(car) => {
                car.price = price;
                true
            }
            None => false,
        }
    }

    /// Attach a catalog discount, replacing any existing one.
    /// Returns `false` when the id is unknown.
    pub fn set_discount(&mut self, car_id: &str, grant: DiscountGrant) -> bool {
        match self.car_mut(car_id) {
            Some(car) => {
                car.discount = Some(grant);
                true
            }
            None => false,
        }
    }

    /// Remove a car's catalog discount. Returns `false` when the id is
    /// unknown or the car carries no discount.
    pub fn clear_discount(&mut self, car_id: &str) -> bool {
        match self.car_mut(car_id) {
            Some(car) => car.discount.take().is_some(),
            None => false,
        }
    }

    fn car_mut(&mut self, car_id: &str) -> Option<&mut Car> {
        self.cars.iter_mut().find(|car| car.id == car_id)
    }
}
