//! Discount grants and the audit log.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Car;

/// An authorised discount, stamped with who granted it and when.
///
/// The same type serves catalog discounts (attached to a car) and line
/// discounts (attached to a cart line). Adding a car to the cart copies the
/// catalog grant onto the line as a snapshot, so later catalog edits leave
/// existing lines alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountGrant {
    /// Whole percentage points, 1 to 100.
    pub percentage: u8,

    /// Display name of the granting actor.
    pub granted_by: String,

    /// When the grant was authorised.
    pub granted_at: Timestamp,
}

/// One line of the discount audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Stable entry id.
    pub id: String,

    /// Car the discount was granted on.
    pub car_id: String,

    /// Car display name at grant time.
    pub car_name: String,

    /// Granted percentage.
    pub percentage: u8,

    /// Display name of the granting actor.
    pub granted_by: String,

    /// When the grant was authorised.
    pub granted_at: Timestamp,
}

impl LogEntry {
    /// Build the audit line for a grant on the given car.
    #[must_use]
    pub fn for_grant(car: &Car, grant: &DiscountGrant) -> Self {
        Self {
            id: format!("discount-{}", Uuid::now_v7()),
            car_id: car.id.clone(),
            car_name: car.name.clone(),
            percentage: grant.percentage,
            granted_by: grant.granted_by.clone(),
            granted_at: grant.granted_at,
        }
    }
}

/// Append-only record of every authorised discount.
///
/// Entries are never updated, deduplicated or removed; cart mutations have no
/// effect on lines already recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountLog {
    entries: Vec<LogEntry>,
}

impl DiscountLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. The only mutation the log supports.
    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of grants stamped on the given UTC calendar day.
    #[must_use]
    pub fn granted_on(&self, day: Date) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.granted_at.to_zoned(TimeZone::UTC).date() == day)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn entry(id: &str, granted_at: Timestamp) -> LogEntry {
        LogEntry {
            id: id.to_owned(),
            car_id: "car-1".to_owned(),
            car_name: "Test Car".to_owned(),
            percentage: 10,
            granted_by: "Tester".to_owned(),
            granted_at,
        }
    }

    #[test]
    fn record_appends_without_deduplication() {
        let mut log = DiscountLog::new();
        let stamp = Timestamp::UNIX_EPOCH;

        log.record(entry("a", stamp));
        log.record(entry("a", stamp));

        assert_eq!(log.len(), 2, "identical grants must both be kept");
    }

    #[test]
    fn granted_on_buckets_by_utc_day() -> TestResult {
        let mut log = DiscountLog::new();
        let midday: Timestamp = "2026-08-06T12:00:00Z".parse()?;
        let day_before: Timestamp = "2026-08-05T23:59:00Z".parse()?;

        log.record(entry("a", midday));
        log.record(entry("b", day_before));

        assert_eq!(log.granted_on(midday.to_zoned(TimeZone::UTC).date()), 1);

        Ok(())
    }
}
