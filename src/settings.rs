//! Site settings.

use serde::{Deserialize, Serialize};

use crate::policy::Role;

/// Storefront presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Title shown in the storefront header.
    pub site_title: String,

    /// Marketing strapline.
    pub marketing_text: String,

    /// Whether prices are shown to visitors.
    pub show_prices: bool,

    /// Whether stock status is shown to visitors.
    pub show_stock_status: bool,

    /// Whether the discounts-management card is shown on the dashboard.
    /// Changed only through [`SiteSettings::set_discounts_management`].
    pub show_discounts_management: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_title: "Premium Motors".to_owned(),
            marketing_text: "Luxury, performance, experience".to_owned(),
            show_prices: true,
            show_stock_status: true,
            show_discounts_management: true,
        }
    }
}

/// Result of a role-gated settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The flag now holds the requested value.
    Applied,

    /// The actor may not make this change; the flag is unchanged.
    Rejected,
}

impl SiteSettings {
    /// Set the discounts-management visibility flag on behalf of `role`.
    ///
    /// Turning the card on needs enable rights; turning it off needs
    /// disable rights. A rejection leaves the flag untouched and is
    /// reported back with a warning rather than raised: this is a UI
    /// preference, not a security-critical switch.
    pub fn set_discounts_management(&mut self, role: Role, visible: bool) -> ToggleOutcome {
        let permission = role.toggle_permission();
        let allowed = if visible {
            permission.enable
        } else {
            permission.disable
        };

        if !allowed {
            tracing::warn!(?role, visible, "discounts-management toggle rejected");
            return ToggleOutcome::Rejected;
        }

        self.show_discounts_management = visible;
        ToggleOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceo_cannot_switch_the_card_off() {
        let mut settings = SiteSettings::default();

        let outcome = settings.set_discounts_management(Role::Ceo, false);

        assert_eq!(outcome, ToggleOutcome::Rejected);
        assert!(settings.show_discounts_management, "flag must stay true");
    }

    #[test]
    fn ceo_can_switch_the_card_on() {
        let mut settings = SiteSettings {
            show_discounts_management: false,
            ..SiteSettings::default()
        };

        let outcome = settings.set_discounts_management(Role::Ceo, true);

        assert_eq!(outcome, ToggleOutcome::Applied);
        assert!(settings.show_discounts_management);
    }

    #[test]
    fn admin_can_switch_the_card_both_ways() {
        let mut settings = SiteSettings::default();

        assert_eq!(settings.set_discounts_management(Role::Admin, false), ToggleOutcome::Applied);
        assert!(!settings.show_discounts_management);

        assert_eq!(settings.set_discounts_management(Role::Admin, true), ToggleOutcome::Applied);
        assert!(settings.show_discounts_management);
    }

    #[test]
    fn business_and_customer_cannot_touch_the_card() {
        let mut settings = SiteSettings::default();

        assert_eq!(settings.set_discounts_management(Role::Business, false), ToggleOutcome::Rejected);
        assert_eq!(settings.set_discounts_management(Role::Customer, true), ToggleOutcome::Rejected);
        assert!(settings.show_discounts_management);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() -> testresult::TestResult {
        let settings: SiteSettings = serde_json::from_str("{\"site_title\":\"Showroom\"}")?;

        assert_eq!(settings.site_title, "Showroom");
        assert!(settings.show_discounts_management, "absent flag defaults to shown");

        Ok(())
    }
}
