//! Forecourt prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::User,
    cart::{Cart, CartItem, CartItemUpdate},
    catalog::{Addon, AddonCategory, Car, Catalog, StockStatus},
    discounts::{DiscountGrant, DiscountLog, LogEntry},
    policy::{Actor, DiscountPolicy, PolicyError, Role, TogglePermission},
    session::{CheckoutError, CheckoutSummary, DiscountOutcome, Session},
    settings::{SiteSettings, ToggleOutcome},
    stats::{SalesStats, TopCar},
    store::{JsonFileStore, MemoryStore, Store, StoreError},
};
