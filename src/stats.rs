// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Summary statistics for stakeholders and products.
//!
//! The node computes each figure with its own store query. The `from_events`
//! constructors compute the same figures from an in-memory slice and are the
//! reference the node's results are tested against.

use serde::{Deserialize, Serialize};

use crate::record::SupplyChainEvent;
use crate::types::{ProductId, StakeholderId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderStats {
    pub stakeholder_id: StakeholderId,
    pub total_products: u64,
    pub total_events: u64,
    pub verified_events: u64,
    pub pending_events: u64,
    /// Creation time of the most recently *written* event.
    pub last_activity: Option<Timestamp>,
}

impl StakeholderStats {
    pub fn from_events(
        stakeholder_id: StakeholderId,
        total_products: u64,
        events: &[SupplyChainEvent],
    ) -> Self {
        let mine = move || {
            events
                .iter()
                .filter(move |e| e.stakeholder_id == Some(stakeholder_id))
        };
        let total_events = mine().count() as u64;
        let verified_events = mine().filter(|e| e.is_verified).count() as u64;

        Self {
            stakeholder_id,
            total_products,
            total_events,
            verified_events,
            pending_events: total_events - verified_events,
            last_activity: mine().map(|e| e.created_at).max(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    pub product_id: ProductId,
    pub total_events: u64,
    pub verified_events: u64,
    pub current_location: Option<String>,
    pub last_stakeholder: Option<StakeholderId>,
    /// Occurrence time of the latest event.
    pub last_activity: Option<Timestamp>,
}

impl ProductStats {
    /// Stats with no latest event yet; fill in with `with_latest`.
    pub fn counts(product_id: ProductId, total_events: u64, verified_events: u64) -> Self {
        Self {
            product_id,
            total_events,
            verified_events,
            current_location: None,
            last_stakeholder: None,
            last_activity: None,
        }
    }

    pub fn with_latest(mut self, latest: Option<&SupplyChainEvent>) -> Self {
        if let Some(event) = latest {
            self.current_location = event.location.clone();
            self.last_stakeholder = event.stakeholder_id;
            self.last_activity = Some(event.timestamp);
        }
        self
    }

    pub fn from_events(product_id: ProductId, events: &[SupplyChainEvent]) -> Self {
        let mine: Vec<&SupplyChainEvent> = events
            .iter()
            .filter(|e| e.product_id == Some(product_id))
            .collect();
        let verified = mine.iter().filter(|e| e.is_verified).count() as u64;

        Self::counts(product_id, mine.len() as u64, verified)
            .with_latest(latest_by_occurrence(mine.iter().copied()))
    }
}

/// Latest by occurrence time; ties go to the later write.
pub fn latest_by_occurrence<'a>(
    events: impl IntoIterator<Item = &'a SupplyChainEvent>,
) -> Option<&'a SupplyChainEvent> {
    events.into_iter().max_by_key(|e| e.occurrence_key())
}
