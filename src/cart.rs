//! Cart aggregate.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{catalog::Car, discounts::DiscountGrant, pricing};

/// One cart line: a car snapshot plus the buyer's selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Snapshot of the car at the time it was added.
    pub car: Car,

    /// Units of this car, always at least 1.
    pub quantity: u32,

    /// Ids of selected addons. A set, so re-adding never duplicates.
    #[serde(default)]
    pub selected_addons: BTreeSet<String>,

    /// Free-text notes keyed by addon id.
    #[serde(default)]
    pub notes: BTreeMap<String, String>,

    /// Line discount, either granted directly or snapshotted from the
    /// catalog when the car was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountGrant>,
}

/// Fields of a line that may be overwritten in place.
#[derive(Debug, Clone, Default)]
pub struct CartItemUpdate {
    /// New quantity; kept at 1 or more.
    pub quantity: Option<u32>,

    /// Replacement addon selection.
    pub selected_addons: Option<BTreeSet<String>>,

    /// Replacement notes.
    pub notes: Option<BTreeMap<String, String>>,
}

/// The shopping cart: at most one line per distinct car id, in insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line for `car_id`, if the car is in the cart.
    #[must_use]
    pub fn line(&self, car_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.car.id == car_id)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add a car to the cart.
    ///
    /// A new car gets a fresh line with quantity 1. A car already in the
    /// cart has its line merged instead: quantity goes up by one, the addon
    /// selection becomes the union of old and new, new notes overwrite old
    /// ones on conflict, and the line discount is refreshed from the car's
    /// current catalog discount (cleared when the car no longer carries
    /// one).
    pub fn add_item(&mut self, car: &Car, addons: Vec<String>, notes: BTreeMap<String, String>) {
        let snapshot = car.discount.clone();

        if let Some(item) = self.line_mut(&car.id) {
            item.quantity += 1;
            item.selected_addons.extend(addons);
            item.notes.extend(notes);
            item.discount = snapshot;
        } else {
            self.items.push(CartItem {
                car: car.clone(),
                quantity: 1,
                selected_addons: addons.into_iter().collect(),
                notes,
                discount: snapshot,
            });
        }
    }

    /// Remove the line for `car_id`. Returns `false` when the car is not in
    /// the cart; absent ids are a no-op, not an error.
    pub fn remove_item(&mut self, car_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.car.id != car_id);
        self.items.len() != before
    }

    /// Overwrite the given fields on the line for `car_id`.
    ///
    /// Returns `false` (and changes nothing) when the car is not in the
    /// cart. Quantity updates are clamped to keep every line at 1 or more;
    /// removal stays an explicit [`Cart::remove_item`].
    pub fn update_item(&mut self, car_id: &str, update: CartItemUpdate) -> bool {
        let Some(item) = self.line_mut(car_id) else {
            return false;
        };

        if let Some(quantity) = update.quantity {
            item.quantity = quantity.max(1);
        }
        if let Some(selected) = update.selected_addons {
            item.selected_addons = selected;
        }
        if let Some(notes) = update.notes {
            item.notes = notes;
        }

        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Attach a granted discount to the line for `car_id`.
    /// Returns `false` when the car is not in the cart.
    pub fn set_line_discount(&mut self, car_id: &str, grant: DiscountGrant) -> bool {
        match self.line_mut(car_id) {
            Some(item) => {
                item.discount = Some(grant);
                true
            }
            None => false,
        }
    }

    /// Total for one line, discount applied.
    #[must_use]
    pub fn line_total(&self, item: &CartItem) -> Decimal {
        pricing::line_total(item)
    }

    /// Total for the whole cart, discounts applied.
    #[must_use]
    pub fn total(&self) -> Decimal {
        pricing::cart_total(self)
    }

    fn line_mut(&mut self, car_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.car.id == car_id)
    }
}
