// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::{recorded, t};
use crate::error::KernelError;
use crate::event::ProposedEvent;
use crate::policy::{HistoryMembership, SequencePolicy, SequencePolicyKind, StrictLifecycle};
use crate::types::{EventType, ProductId};

fn propose(product: ProductId, event_type: EventType, at: i64) -> ProposedEvent {
    ProposedEvent::new(event_type, t(at)).for_product(product)
}

#[test]
fn test_membership_first_manufacture() {
    let p = ProductId::new();
    let policy = HistoryMembership;

    assert!(policy.admit(&propose(p, EventType::Manufactured, 0), &[]).is_ok());

    let history = vec![recorded(p, EventType::Manufactured, 0, 0)];
    assert_eq!(
        policy.admit(&propose(p, EventType::Manufactured, 5), &history),
        Err(KernelError::InvalidEventSequence),
        "a second manufactured event must be rejected"
    );
}

#[test]
fn test_membership_prerequisites() {
    let p = ProductId::new();
    let policy = HistoryMembership;

    // Nothing but manufactured is admissible on an empty history
    for event_type in [EventType::Shipped, EventType::Received, EventType::Sold] {
        assert_eq!(
            policy.admit(&propose(p, event_type, 0), &[]),
            Err(KernelError::InvalidEventSequence),
            "{} on empty history",
            event_type
        );
    }

    let manufactured = vec![recorded(p, EventType::Manufactured, 0, 0)];
    assert!(policy.admit(&propose(p, EventType::Shipped, 1), &manufactured).is_ok());
    assert!(policy.admit(&propose(p, EventType::Received, 1), &manufactured).is_err());
    assert!(policy.admit(&propose(p, EventType::Sold, 1), &manufactured).is_err());

    // Shipped may also follow a receipt alone
    let received_only = vec![recorded(p, EventType::Received, 0, 0)];
    assert!(policy.admit(&propose(p, EventType::Shipped, 1), &received_only).is_ok());
}

#[test]
fn test_membership_allows_repeated_sales() {
    let p = ProductId::new();
    let policy = HistoryMembership;

    let mut history = vec![
        recorded(p, EventType::Manufactured, 0, 0),
        recorded(p, EventType::Shipped, 1, 1),
        recorded(p, EventType::Received, 2, 2),
    ];

    for minute in 3..6 {
        let sale = propose(p, EventType::Sold, minute);
        assert!(policy.admit(&sale, &history).is_ok(), "sale #{}", minute - 2);
        history.push(sale.into_record(t(minute)));
    }
}

#[test]
fn test_membership_ignores_timestamps() {
    let p = ProductId::new();
    let history = vec![recorded(p, EventType::Shipped, 100, 0)];

    // Received "before" the shipment is still admissible under membership rules
    assert!(HistoryMembership.admit(&propose(p, EventType::Received, 1), &history).is_ok());
    assert!(StrictLifecycle.admit(&propose(p, EventType::Received, 1), &history).is_err());
}

#[test]
fn test_strict_lifecycle_transitions() {
    let p = ProductId::new();
    let policy = StrictLifecycle;
    let mut history = Vec::new();

    let path = [
        EventType::Manufactured,
        EventType::Shipped,
        EventType::Received,
        EventType::Shipped,
        EventType::Received,
        EventType::Sold,
    ];
    for (minute, event_type) in path.into_iter().enumerate() {
        let minute = minute as i64;
        let proposed = propose(p, event_type, minute);
        assert!(policy.admit(&proposed, &history).is_ok(), "{} at step {}", event_type, minute);
        history.push(proposed.into_record(t(minute)));
    }

    // Sold is terminal
    for event_type in crate::types::EventType::ALL {
        assert!(policy.admit(&propose(p, event_type, 99), &history).is_err());
    }
}

#[test]
fn test_strict_lifecycle_rejects_repeats_and_skips() {
    let p = ProductId::new();
    let policy = StrictLifecycle;
    let history = vec![
        recorded(p, EventType::Manufactured, 0, 0),
        recorded(p, EventType::Shipped, 10, 1),
    ];

    assert!(policy.admit(&propose(p, EventType::Shipped, 20), &history).is_err(), "repeat");
    assert!(policy.admit(&propose(p, EventType::Sold, 20), &history).is_err(), "skip");
    assert!(policy.admit(&propose(p, EventType::Received, 5), &history).is_err(), "stale");
    assert!(policy.admit(&propose(p, EventType::Received, 10), &history).is_ok(), "same instant");
}

#[test]
fn test_strict_lifecycle_current_state_uses_occurrence_time() {
    let p = ProductId::new();
    // Written out of order: the shipment happened last even though it was recorded first
    let history = vec![
        recorded(p, EventType::Shipped, 10, 0),
        recorded(p, EventType::Manufactured, 0, 1),
    ];

    assert!(StrictLifecycle.admit(&propose(p, EventType::Received, 11), &history).is_ok());
}

#[test]
fn test_policy_kind_selection() {
    assert_eq!(SequencePolicyKind::default(), SequencePolicyKind::HistoryMembership);
    assert_eq!(
        "strict_lifecycle".parse::<SequencePolicyKind>(),
        Ok(SequencePolicyKind::StrictLifecycle)
    );
    assert!("fsm".parse::<SequencePolicyKind>().is_err());

    assert_eq!(SequencePolicyKind::HistoryMembership.build().name(), "history_membership");
    assert_eq!(SequencePolicyKind::StrictLifecycle.build().name(), "strict_lifecycle");
}
