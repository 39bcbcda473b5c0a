pub mod policy_tests;

use chrono::{Duration, TimeZone, Utc};

use crate::event::ProposedEvent;
use crate::record::SupplyChainEvent;
use crate::types::{EventType, ProductId, StakeholderId, Timestamp};

/// Fixed base time so orderings are predictable.
pub(crate) fn t(minutes: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Event recorded at occurrence minute `at`, written at minute `written`.
pub(crate) fn recorded(
    product: ProductId,
    event_type: EventType,
    at: i64,
    written: i64,
) -> SupplyChainEvent {
    ProposedEvent::new(event_type, t(at))
        .for_product(product)
        .into_record(t(written))
}

pub(crate) fn recorded_by(
    product: ProductId,
    stakeholder: StakeholderId,
    event_type: EventType,
    at: i64,
    written: i64,
) -> SupplyChainEvent {
    ProposedEvent::new(event_type, t(at))
        .for_product(product)
        .by_stakeholder(stakeholder)
        .into_record(t(written))
}
