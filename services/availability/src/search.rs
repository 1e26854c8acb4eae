//! Availability filtering.
//!
//! A slot is available for a query when it is `OPEN` and none of its
//! restrictions forbids the requested car category during the requested
//! window. A restriction only applies to one category, so a query without
//! a category is never restricted; a query with a category but no window
//! treats any restriction on that category as blocking (there is no window
//! to dodge it with).

use chrono::{DateTime, Utc};
use slotwise_core::{ParkingSlot, SlotStatus, TimeWindow};

/// Filters for an availability search.
#[derive(Clone, Debug, Default)]
pub struct AvailabilityQuery {
    /// Car category the customer wants to park
    pub car_category: Option<String>,
    /// Desired parking window
    pub window: Option<TimeWindow>,
}

impl AvailabilityQuery {
    /// Build a query from raw request parameters.
    ///
    /// # Errors
    ///
    /// Returns [`slotwise_core::DomainError::InvalidRequest`] when only one
    /// end of the window is given or the window is inverted.
    pub fn new(
        car_category: Option<String>,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Self, slotwise_core::DomainError> {
        let window = match (from, until) {
            (Some(from), Some(until)) => Some(TimeWindow::new(from, until)?),
            (None, None) => None,
            _ => {
                return Err(slotwise_core::DomainError::InvalidRequest(
                    "both from and until are required for a window filter".to_string(),
                ))
            }
        };
        Ok(Self {
            car_category,
            window,
        })
    }
}

/// True when the slot's restrictions permit the query.
fn permits(slot: &ParkingSlot, query: &AvailabilityQuery) -> bool {
    let Some(category) = &query.car_category else {
        // Restrictions are per-category; nothing to match against.
        return true;
    };

    slot.restrictions
        .iter()
        .filter(|r| r.car_category.as_str() == category.as_str())
        .all(|r| match query.window {
            Some(window) => !r.window.overlaps(&window),
            // No window given: a standing restriction on the category blocks.
            None => false,
        })
}

/// Open slots that permit the query.
#[must_use]
pub fn available_slots(slots: Vec<ParkingSlot>, query: &AvailabilityQuery) -> Vec<ParkingSlot> {
    slots
        .into_iter()
        .filter(|slot| slot.status == SlotStatus::Open)
        .filter(|slot| permits(slot, query))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use slotwise_core::{
        CarCategory, Money, ParkingRestriction, RestrictionId, SlotId, UserId,
    };

    fn window(from_h: u32, until_h: u32) -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 1, from_h, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, until_h, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn slot(status: SlotStatus, restrictions: Vec<ParkingRestriction>) -> ParkingSlot {
        ParkingSlot {
            id: SlotId::new(),
            landlord_id: UserId::new(),
            status,
            price_per_hour: Money::parse("2").unwrap(),
            restrictions,
        }
    }

    fn restriction(category: &str, from_h: u32, until_h: u32) -> ParkingRestriction {
        ParkingRestriction {
            id: RestrictionId::new(),
            window: window(from_h, until_h),
            car_category: CarCategory::new(category).unwrap(),
            code: "R-1".to_string(),
        }
    }

    #[test]
    fn closed_slots_are_never_available() {
        let slots = vec![slot(SlotStatus::Closed, vec![])];
        assert!(available_slots(slots, &AvailabilityQuery::default()).is_empty());
    }

    #[test]
    fn restricted_category_in_overlapping_window_is_excluded() {
        let slots = vec![slot(SlotStatus::Open, vec![restriction("TRUCK", 8, 18)])];
        let query = AvailabilityQuery {
            car_category: Some("TRUCK".to_string()),
            window: Some(window(10, 12)),
        };
        assert!(available_slots(slots, &query).is_empty());
    }

    #[test]
    fn non_overlapping_restriction_does_not_block() {
        let slots = vec![slot(SlotStatus::Open, vec![restriction("TRUCK", 8, 10)])];
        let query = AvailabilityQuery {
            car_category: Some("TRUCK".to_string()),
            window: Some(window(10, 12)),
        };
        assert_eq!(available_slots(slots, &query).len(), 1);
    }

    #[test]
    fn restriction_on_another_category_does_not_block() {
        let slots = vec![slot(SlotStatus::Open, vec![restriction("TRUCK", 8, 18)])];
        let query = AvailabilityQuery {
            car_category: Some("SEDAN".to_string()),
            window: Some(window(10, 12)),
        };
        assert_eq!(available_slots(slots, &query).len(), 1);
    }

    #[test]
    fn category_without_window_blocks_on_any_standing_restriction() {
        let slots = vec![slot(SlotStatus::Open, vec![restriction("TRUCK", 8, 18)])];
        let query = AvailabilityQuery {
            car_category: Some("TRUCK".to_string()),
            window: None,
        };
        assert!(available_slots(slots, &query).is_empty());
    }

    #[test]
    fn half_open_window_requires_both_ends() {
        let result = AvailabilityQuery::new(
            None,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()),
            None,
        );
        assert!(result.is_err());
    }
}
