//! Discount authorisation.
//!
//! Role-gated ceilings on who may grant what discount, checked against a
//! shared secret. The whole check runs inside the same process that renders
//! the storefront and nothing re-validates it server-side: it is a guard
//! against accidental over-discounting in a demo, not a security boundary.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discounts::DiscountGrant;

/// The closed set of actor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Storefront visitor; no grant rights, no admin surface.
    Customer,

    /// Business sales user.
    Business,

    /// Chief executive; business grant rights plus the ability to switch the
    /// discounts-management card on.
    Ceo,

    /// System administrator.
    Admin,
}

/// What a role may do to the discounts-management visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TogglePermission {
    /// May flip the flag on.
    pub enable: bool,

    /// May flip the flag off.
    pub disable: bool,
}

impl Role {
    /// Maximum discount percentage the role may authorise, if any.
    #[must_use]
    pub fn discount_ceiling(self) -> Option<u8> {
        match self {
            Role::Customer => None,
            Role::Business | Role::Ceo => Some(10),
            Role::Admin => Some(25),
        }
    }

    /// Discounts-management toggle rights. Only the admin may switch the
    /// card off again once it is shown.
    #[must_use]
    pub fn toggle_permission(self) -> TogglePermission {
        match self {
            Role::Customer | Role::Business => TogglePermission {
                enable: false,
                disable: false,
            },
            Role::Ceo => TogglePermission {
                enable: true,
                disable: false,
            },
            Role::Admin => TogglePermission {
                enable: true,
                disable: true,
            },
        }
    }

    /// Whether the role may reach the admin surface at all.
    #[must_use]
    pub fn is_staff(self) -> bool {
        !matches!(self, Role::Customer)
    }
}

/// A signed-in identity: display name plus role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name stamped onto grants.
    pub name: String,

    /// Authorisation role.
    pub role: Role,
}

/// Why a discount request was turned down.
///
/// Every variant is a user-correctable outcome surfaced inline, never a
/// fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The actor's role may not grant discounts at all.
    #[error("this role may not grant discounts")]
    Unauthorized,

    /// The supplied credential does not match the configured secret.
    #[error("invalid discount credential")]
    InvalidCredential,

    /// The request exceeds the role's ceiling.
    #[error("requested {requested}% exceeds the {ceiling}% ceiling for this role")]
    DiscountExceedsLimit {
        /// Percentage the actor asked for.
        requested: u8,
        /// Maximum the role may authorise.
        ceiling: u8,
    },

    /// The percentage is outside 1..=100.
    #[error("discount percentage must be between 1 and 100, got {requested}")]
    InvalidPercentage {
        /// Percentage the actor asked for.
        requested: u8,
    },
}

/// Table-driven discount authorisation.
///
/// The ceilings live on [`Role`]; the policy adds the shared-secret check
/// and stamps successful requests into a [`DiscountGrant`].
#[derive(Clone)]
pub struct DiscountPolicy {
    shared_secret: String,
}

impl std::fmt::Debug for DiscountPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscountPolicy").finish_non_exhaustive()
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self::with_secret("123456")
    }
}

impl DiscountPolicy {
    /// Policy with a custom shared secret.
    #[must_use]
    pub fn with_secret(shared_secret: impl Into<String>) -> Self {
        Self {
            shared_secret: shared_secret.into(),
        }
    }

    /// Authorise `percentage` for `actor`, producing a stamped grant.
    ///
    /// Checks run in a fixed order: grant right, credential, role ceiling,
    /// percentage range.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`PolicyError`].
    pub fn authorize(
        &self,
        actor: &Actor,
        credential: &str,
        percentage: u8,
    ) -> Result<DiscountGrant, PolicyError> {
        let ceiling = actor.role.discount_ceiling().ok_or(PolicyError::Unauthorized)?;

        if credential != self.shared_secret {
            return Err(PolicyError::InvalidCredential);
        }

        if percentage > ceiling {
            return Err(PolicyError::DiscountExceedsLimit {
                requested: percentage,
                ceiling,
            });
        }

        if !(1..=100).contains(&percentage) {
            return Err(PolicyError::InvalidPercentage {
                requested: percentage,
            });
        }

        Ok(DiscountGrant {
            percentage,
            granted_by: actor.name.clone(),
            granted_at: Timestamp::now(),
        })
    }
}
