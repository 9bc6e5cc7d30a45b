//! Session context.
//!
//! One [`Session`] owns the state of a single storefront visit: the cart,
//! the catalog, the settings, the audit log and the signed-in actor, wired
//! to a [`Store`]. Every mutating operation writes the affected snapshots
//! through to the store before returning, so in-memory state and the
//! durable snapshot never diverge between operations. Execution is strictly
//! single-threaded and synchronous; the store needs no locking beyond that.

use std::{collections::BTreeMap, sync::Arc};

use jiff::{Timestamp, tz::TimeZone};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    auth::{self, User},
    cart::{Cart, CartItem, CartItemUpdate},
    catalog::Catalog,
    discounts::{DiscountGrant, DiscountLog, LogEntry},
    policy::{Actor, DiscountPolicy, PolicyError, Role},
    pricing,
    settings::{SiteSettings, ToggleOutcome},
    stats::{self, SalesStats},
    store::{self, Store, StoreError, keys},
};

/// Outcome of a discount request.
///
/// Rejections are expected, user-correctable results surfaced inline, not
/// errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountOutcome {
    /// The discount was applied and logged.
    Granted(DiscountGrant),

    /// The policy turned the request down; nothing changed.
    Rejected(PolicyError),

    /// The target car was not found; nothing changed.
    NotFound,
}

impl DiscountOutcome {
    /// Whether the request ended with an applied grant.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Errors from the checkout trigger.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A checkout is already being processed; the trigger stays disabled
    /// until it completes or aborts.
    #[error("a checkout is already in progress")]
    AlreadyInProgress,

    /// There is nothing to buy.
    #[error("the cart is empty")]
    EmptyCart,

    /// No checkout was started.
    #[error("no checkout is in progress")]
    NotStarted,

    /// The cleared cart could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the confirmation screen shows after a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    /// Final amount, discounts applied.
    pub total: Decimal,

    /// Units purchased.
    pub items_count: u32,
}

/// A single storefront visit with write-through persistence.
#[derive(Debug)]
pub struct Session {
    store: Arc<dyn Store>,
    policy: DiscountPolicy,
    catalog: Catalog,
    cart: Cart,
    log: DiscountLog,
    settings: SiteSettings,
    current_user: Option<User>,
    checkout_in_progress: bool,
}

impl Session {
    /// Start a session against `store`, restoring any persisted state.
    ///
    /// Corrupt or missing snapshots fall back to their defaults; starting a
    /// session never fails.
    #[must_use]
    pub fn start(store: Arc<dyn Store>) -> Self {
        Self::with_policy(store, DiscountPolicy::default())
    }

    /// Start a session with a custom discount policy.
    #[must_use]
    pub fn with_policy(store: Arc<dyn Store>, policy: DiscountPolicy) -> Self {
        let catalog = store::load(store.as_ref(), keys::CARS, Catalog::default());
        let cart = store::load(store.as_ref(), keys::CART, Cart::new());
        let log = store::load(store.as_ref(), keys::DISCOUNTS_LOG, DiscountLog::new());
        let settings = store::load(store.as_ref(), keys::SETTINGS, SiteSettings::default());
        let current_user: Option<User> = store::load(store.as_ref(), keys::CURRENT_USER, None);

        Self {
            store,
            policy,
            catalog,
            cart,
            log,
            settings,
            current_user,
            checkout_in_progress: false,
        }
    }

    /// The catalog as this session sees it.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The discount audit log.
    #[must_use]
    pub fn log(&self) -> &DiscountLog {
        &self.log
    }

    /// The current site settings.
    #[must_use]
    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// The signed-in actor, if any.
    #[must_use]
    pub fn actor(&self) -> Option<Actor> {
        self.current_user.as_ref().map(User::actor)
    }

    /// Effective role; signed-out visitors are customers.
    #[must_use]
    pub fn role(&self) -> Role {
        self.current_user
            .as_ref()
            .map_or(Role::Customer, |user| user.role)
    }

    /// Sign in with demo credentials. Returns `false` on no match.
    ///
    /// # Errors
    ///
    /// Returns an error when the current-user snapshot cannot be persisted.
    pub fn login(&mut self, username: &str, password: &str) -> Result<bool, StoreError> {
        let users: Vec<User> = store::load(self.store.as_ref(), keys::USERS, Vec::new());

        match auth::verify_credentials(&users, username, password) {
            Some(user) => {
                self.current_user = Some(user.clone());
                store::save(self.store.as_ref(), keys::CURRENT_USER, &self.current_user)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns an error when the current-user snapshot cannot be persisted.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.current_user = None;
        store::save(self.store.as_ref(), keys::CURRENT_USER, &self.current_user)
    }

    /// Add the catalog car `car_id` to the cart, with the given addon
    /// selection and notes. Returns `false` (and changes nothing) when the
    /// id is not in the catalog; stale references are a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart snapshot cannot be persisted.
    pub fn add_to_cart(
        &mut self,
        car_id: &str,
        addons: Vec<String>,
        notes: BTreeMap<String, String>,
    ) -> Result<bool, StoreError> {
        let Some(car) = self.catalog.get(car_id) else {
            return Ok(false);
        };

        let car = car.clone();
        self.cart.add_item(&car, addons, notes);
        self.persist_cart()?;

        Ok(true)
    }

    /// Remove the cart line for `car_id`. Absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart snapshot cannot be persisted.
    pub fn remove_from_cart(&mut self, car_id: &str) -> Result<bool, StoreError> {
        if self.cart.remove_item(car_id) {
            self.persist_cart()?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Overwrite fields on the cart line for `car_id`. Absent ids are a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart snapshot cannot be persisted.
    pub fn update_cart_item(
        &mut self,
        car_id: &str,
        update: CartItemUpdate,
    ) -> Result<bool, StoreError> {
        if self.cart.update_item(car_id, update) {
            self.persist_cart()?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart snapshot cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.cart.clear();
        self.persist_cart()
    }

    /// Cart total, discounts applied.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// Total for one line, discount applied.
    #[must_use]
    pub fn line_total(&self, item: &CartItem) -> Decimal {
        pricing::line_total(item)
    }

    /// Request a line discount on `car_id` for the signed-in actor.
    ///
    /// The policy check runs first; an authorised grant is then attached to
    /// the matching line, recorded in the audit log, and both snapshots are
    /// persisted before returning. A rejected request changes nothing.
    ///
    /// # Errors
    ///
    /// Only persistence failures are errors; policy rejections come back as
    /// [`DiscountOutcome::Rejected`].
    pub fn apply_discount(
        &mut self,
        car_id: &str,
        percentage: u8,
        credential: &str,
    ) -> Result<DiscountOutcome, StoreError> {
        let actor = self.actor().unwrap_or_else(|| Actor {
            name: "Unknown".to_owned(),
            role: Role::Customer,
        });

        let grant = match self.policy.authorize(&actor, credential, percentage) {
            Ok(grant) => grant,
            Err(rejection) => return Ok(DiscountOutcome::Rejected(rejection)),
        };

        let Some(line) = self.cart.line(car_id) else {
            return Ok(DiscountOutcome::NotFound);
        };

        let entry = LogEntry::for_grant(&line.car, &grant);
        self.cart.set_line_discount(car_id, grant.clone());
        self.log.record(entry);
        self.persist_cart()?;
        self.persist_log()?;

        tracing::info!(car_id, percentage, granted_by = %grant.granted_by, "line discount applied");

        Ok(DiscountOutcome::Granted(grant))
    }

    /// Overwrite the presentation settings. The role-gated
    /// discounts-management flag is preserved; it only moves through
    /// [`Session::set_discounts_management`].
    ///
    /// # Errors
    ///
    /// Returns an error when the settings snapshot cannot be persisted.
    pub fn update_settings(&mut self, mut settings: SiteSettings) -> Result<(), StoreError> {
        settings.show_discounts_management = self.settings.show_discounts_management;
        self.settings = settings;
        self.persist_settings()
    }

    /// Toggle the discounts-management card for the current role. A
    /// rejection leaves the flag and the store untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings snapshot cannot be persisted.
    pub fn set_discounts_management(&mut self, visible: bool) -> Result<ToggleOutcome, StoreError> {
        let outcome = self.settings.set_discounts_management(self.role(), visible);

        if outcome == ToggleOutcome::Applied {
            self.persist_settings()?;
        }

        Ok(outcome)
    }

    /// Overwrite a car's base price. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog snapshot cannot be persisted.
    pub fn set_car_price(&mut self, car_id: &str, price: Decimal) -> Result<bool, StoreError> {
        if self.catalog.set_price(car_id, price) {
            self.persist_catalog()?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Attach a catalog discount to a car on behalf of the signed-in staff
    /// actor, replacing any existing one and recording an audit entry. The
    /// grant applies to every future cart addition of the car; lines already
    /// in the cart keep their snapshot until re-added.
    ///
    /// # Errors
    ///
    /// Only persistence failures are errors; rejections come back as
    /// [`DiscountOutcome::Rejected`].
    pub fn set_car_discount(
        &mut self,
        car_id: &str,
        percentage: u8,
    ) -> Result<DiscountOutcome, StoreError> {
        let Some(actor) = self.actor().filter(|actor| actor.role.is_staff()) else {
            return Ok(DiscountOutcome::Rejected(PolicyError::Unauthorized));
        };

        if !(1..=100).contains(&percentage) {
            return Ok(DiscountOutcome::Rejected(PolicyError::InvalidPercentage {
                requested: percentage,
            }));
        }

        let Some(car) = self.catalog.get(car_id) else {
            return Ok(DiscountOutcome::NotFound);
        };

        let grant = DiscountGrant {
            percentage,
            granted_by: actor.name,
            granted_at: Timestamp::now(),
        };
        let entry = LogEntry::for_grant(car, &grant);

        self.catalog.set_discount(car_id, grant.clone());
        self.log.record(entry);
        self.persist_catalog()?;
        self.persist_log()?;

        tracing::info!(car_id, percentage, "catalog discount set");

        Ok(DiscountOutcome::Granted(grant))
    }

    /// Remove a car's catalog discount. Removals are not grants, so no
    /// audit entry is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog snapshot cannot be persisted.
    pub fn clear_car_discount(&mut self, car_id: &str) -> Result<bool, StoreError> {
        if self.catalog.clear_discount(car_id) {
            self.persist_catalog()?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Arm the checkout trigger.
    ///
    /// # Errors
    ///
    /// Rejected while another checkout is pending (duplicate-submit guard)
    /// or when the cart is empty.
    pub fn begin_checkout(&mut self) -> Result<(), CheckoutError> {
        if self.checkout_in_progress {
            return Err(CheckoutError::AlreadyInProgress);
        }

        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.checkout_in_progress = true;

        Ok(())
    }

    /// Complete the pending checkout: report the confirmation numbers and
    /// empty the cart. Checkout never consults the discount policy.
    ///
    /// # Errors
    ///
    /// Rejected when no checkout was started, or when the cleared cart
    /// cannot be persisted.
    pub fn complete_checkout(&mut self) -> Result<CheckoutSummary, CheckoutError> {
        if !self.checkout_in_progress {
            return Err(CheckoutError::NotStarted);
        }

        let summary = CheckoutSummary {
            total: self.cart.total(),
            items_count: self.cart.unit_count(),
        };

        self.cart.clear();
        self.persist_cart()?;
        self.checkout_in_progress = false;

        Ok(summary)
    }

    /// Abandon the pending checkout and re-enable the trigger.
    pub fn abort_checkout(&mut self) {
        self.checkout_in_progress = false;
    }

    /// Whether the checkout trigger is currently disabled.
    #[must_use]
    pub fn checkout_in_progress(&self) -> bool {
        self.checkout_in_progress
    }

    /// Dashboard numbers as of now.
    #[must_use]
    pub fn stats(&self) -> SalesStats {
        let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
        stats::sales_stats(&self.cart, &self.log, today)
    }

    fn persist_cart(&self) -> Result<(), StoreError> {
        store::save(self.store.as_ref(), keys::CART, &self.cart)
    }

    fn persist_log(&self) -> Result<(), StoreError> {
        store::save(self.store.as_ref(), keys::DISCOUNTS_LOG, &self.log)
    }

    fn persist_settings(&self) -> Result<(), StoreError> {
        store::save(self.store.as_ref(), keys::SETTINGS, &self.settings)
    }

    fn persist_catalog(&self) -> Result<(), StoreError> {
        store::save(self.store.as_ref(), keys::CARS, &self.catalog)
    }
}
