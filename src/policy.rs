// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Sequence Policies
//!
//! A policy decides whether a proposed event is admissible given every event
//! already recorded for the same product. The engine holds exactly one policy
//! and never branches on which one it is.
//!
//! # Policies
//! - `HistoryMembership`: looks only at which event types have ever occurred.
//!   Order and timestamps are ignored, so repeated terminal events pass.
//! - `StrictLifecycle`: a single current state per product (the latest event
//!   by occurrence time) and a fixed transition table. Stale and repeated
//!   states are rejected.

use core::fmt;
use core::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};
use crate::event::ProposedEvent;
use crate::record::SupplyChainEvent;
use crate::types::EventType;

pub trait SequencePolicy: Send + Sync + fmt::Debug {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    /// `Ok(())` when admissible, `InvalidEventSequence` otherwise.
    /// `history` is every existing event for the product, in any order.
    fn admit(&self, proposed: &ProposedEvent, history: &[SupplyChainEvent]) -> KernelResult<()>;
}

/// Admissibility rule for one proposed event type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenceRule {
    /// The given type must never have occurred.
    Forbids(EventType),
    /// At least one of the given types must have occurred.
    RequiresAny(&'static [EventType]),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HistoryMembership;

impl HistoryMembership {
    pub fn rule_for(event_type: EventType) -> PresenceRule {
        match event_type {
            EventType::Manufactured => PresenceRule::Forbids(EventType::Manufactured),
            EventType::Shipped => {
                PresenceRule::RequiresAny(&[EventType::Manufactured, EventType::Received])
            }
            EventType::Received => PresenceRule::RequiresAny(&[EventType::Shipped]),
            EventType::Sold => PresenceRule::RequiresAny(&[EventType::Received]),
        }
    }
}

impl SequencePolicy for HistoryMembership {
    fn name(&self) -> &'static str {
        "history_membership"
    }

    fn admit(&self, proposed: &ProposedEvent, history: &[SupplyChainEvent]) -> KernelResult<()> {
        let seen: FxHashSet<EventType> = history.iter().map(|e| e.event_type).collect();

        let admissible = match Self::rule_for(proposed.event_type) {
            PresenceRule::Forbids(t) => !seen.contains(&t),
            PresenceRule::RequiresAny(required) => required.iter().any(|t| seen.contains(t)),
        };

        if admissible {
            Ok(())
        } else {
            Err(KernelError::InvalidEventSequence)
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StrictLifecycle;

impl StrictLifecycle {
    /// States reachable from `current`. `None` is a product with no events.
    pub fn next_states(current: Option<EventType>) -> &'static [EventType] {
        match current {
            None => &[EventType::Manufactured],
            Some(EventType::Manufactured) => &[EventType::Shipped],
            Some(EventType::Shipped) => &[EventType::Received],
            Some(EventType::Received) => &[EventType::Shipped, EventType::Sold],
            Some(EventType::Sold) => &[],
        }
    }
}

impl SequencePolicy for StrictLifecycle {
    fn name(&self) -> &'static str {
        "strict_lifecycle"
    }

    fn admit(&self, proposed: &ProposedEvent, history: &[SupplyChainEvent]) -> KernelResult<()> {
        let current = history.iter().max_by_key(|e| e.occurrence_key());

        if let Some(cur) = current {
            if proposed.timestamp < cur.timestamp {
                return Err(KernelError::InvalidEventSequence);
            }
        }

        let state = current.map(|e| e.event_type);
        if Self::next_states(state).contains(&proposed.event_type) {
            Ok(())
        } else {
            Err(KernelError::InvalidEventSequence)
        }
    }
}

/// Configuration-level selector for the policy implementations above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicyKind {
    #[default]
    HistoryMembership,
    StrictLifecycle,
}

impl SequencePolicyKind {
    pub fn build(self) -> Box<dyn SequencePolicy> {
        match self {
            SequencePolicyKind::HistoryMembership => Box::new(HistoryMembership),
            SequencePolicyKind::StrictLifecycle => Box::new(StrictLifecycle),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SequencePolicyKind::HistoryMembership => "history_membership",
            SequencePolicyKind::StrictLifecycle => "strict_lifecycle",
        }
    }
}

impl FromStr for SequencePolicyKind {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "history_membership" => Ok(SequencePolicyKind::HistoryMembership),
            "strict_lifecycle" => Ok(SequencePolicyKind::StrictLifecycle),
            other => Err(KernelError::invalid_field(
                "sequence policy",
                format!("unknown policy `{}`", other),
            )),
        }
    }
}
