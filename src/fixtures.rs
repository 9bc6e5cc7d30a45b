//! Seed data for the demo storefront.

use rust_decimal::Decimal;

use crate::{
    auth::User,
    catalog::{Addon, AddonCategory, Car, Catalog, StockStatus},
    policy::Role,
    settings::SiteSettings,
    store::{self, Store, StoreError, keys},
};

fn addon(
    id: &str,
    name: &str,
    description: &str,
    price: i64,
    category: AddonCategory,
    requires_note: bool,
) -> Addon {
    Addon {
        id: id.to_owned(),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        price: Decimal::from(price),
        category,
        requires_note,
    }
}

/// The addon sheet every demo car shares.
#[must_use]
pub fn default_addons() -> Vec<Addon> {
    vec![
        addon(
            "addon-sport-1",
            "Sport package",
            "Full sport package with aggressive styling",
            25_000,
            AddonCategory::Sport,
            false,
        ),
        addon(
            "addon-sport-2",
            "Alloy wheels",
            "20 inch aluminium alloy wheels",
            15_000,
            AddonCategory::Sport,
            false,
        ),
        addon(
            "addon-safety-1",
            "Advanced safety system",
            "Complete safety suite with 360 cameras",
            18_000,
            AddonCategory::Safety,
            false,
        ),
        addon(
            "addon-luxury-1",
            "Premium sound system",
            "16-speaker premium audio",
            30_000,
            AddonCategory::Luxury,
            false,
        ),
        addon(
            "addon-luxury-2",
            "Custom paint",
            "Polished custom paintwork",
            12_000,
            AddonCategory::Luxury,
            false,
        ),
        addon(
            "addon-special-1",
            "Window tinting",
            "Window tint, level noted per order",
            3_500,
            AddonCategory::Special,
            true,
        ),
    ]
}

fn car(id: &str, name: &str, brand: &str, model: &str, price: i64) -> Car {
    Car {
        id: id.to_owned(),
        name: name.to_owned(),
        brand: brand.to_owned(),
        model: model.to_owned(),
        year: 2024,
        price: Decimal::from(price),
        status: StockStatus::InStock,
        addons: default_addons(),
        discount: None,
    }
}

/// The demo showroom.
#[must_use]
pub fn default_cars() -> Vec<Car> {
    vec![
        car(
            "car-1",
            "Mercedes-Benz S-Class 2024",
            "Mercedes",
            "S-Class",
            680_000,
        ),
        car("car-2", "BMW 7 Series 2024", "BMW", "7 Series", 620_000),
        car(
            "car-3",
            "Mercedes-Benz E-Class 2024",
            "Mercedes",
            "E-Class",
            380_000,
        ),
        car("car-4", "BMW 5 Series 2024", "BMW", "5 Series", 340_000),
    ]
}

/// The demo user set.
#[must_use]
pub fn default_users() -> Vec<User> {
    vec![
        User {
            id: "user-1".to_owned(),
            username: "nathaniel".to_owned(),
            password: "123456".to_owned(),
            name: "Nathaniel Hanoch".to_owned(),
            role: Role::Ceo,
        },
        User {
            id: "user-2".to_owned(),
            username: "mp".to_owned(),
            password: "2001".to_owned(),
            name: "System Administrator".to_owned(),
            role: Role::Admin,
        },
        User {
            id: "user-3".to_owned(),
            username: "dana".to_owned(),
            password: "4567".to_owned(),
            name: "Dana Peled".to_owned(),
            role: Role::Business,
        },
    ]
}

/// Seed the store with cars, users and settings when absent.
///
/// Existing values are left untouched, so a restarted session keeps its
/// state.
///
/// # Errors
///
/// Returns an error when a seed snapshot cannot be written or the backend
/// cannot be read.
pub fn initialize(store: &dyn Store) -> Result<(), StoreError> {
    let catalog: Catalog = store::load(store, keys::CARS, Catalog::default());
    if catalog.is_empty() {
        store::save(store, keys::CARS, &Catalog::new(default_cars()))?;
    }

    let users: Vec<User> = store::load(store, keys::USERS, Vec::new());
    if users.is_empty() {
        store::save(store, keys::USERS, &default_users())?;
    }

    if store.get(keys::SETTINGS)?.is_none() {
        store::save(store, keys::SETTINGS, &SiteSettings::default())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::store::MemoryStore;

    use super::*;

    #[test]
    fn initialize_seeds_an_empty_store() -> TestResult {
        let store = MemoryStore::new();

        initialize(&store)?;

        let catalog: Catalog = store::load(&store, keys::CARS, Catalog::default());
        let users: Vec<User> = store::load(&store, keys::USERS, Vec::new());

        assert_eq!(catalog.len(), 4);
        assert_eq!(users.len(), 3);

        Ok(())
    }

    #[test]
    fn initialize_leaves_existing_state_alone() -> TestResult {
        let store = MemoryStore::new();

        let custom = Catalog::new(default_cars().into_iter().take(1).collect());
        store::save(&store, keys::CARS, &custom)?;

        initialize(&store)?;

        let catalog: Catalog = store::load(&store, keys::CARS, Catalog::default());
        assert_eq!(catalog.len(), 1, "seeding must not clobber existing cars");

        Ok(())
    }

    #[test]
    fn every_demo_car_offers_the_noted_addon() {
        for car in default_cars() {
            let special = car.addon("addon-special-1");
            assert_eq!(special.map(|a| a.requires_note), Some(true), "car {}", car.id);
        }
    }
}
