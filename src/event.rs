// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Proposed custody events.
//!
//! A `ProposedEvent` is an event request that has passed its input contract
//! but has not yet been judged against the product's history or written.
//! Only `into_record` turns it into a `SupplyChainEvent`.

use crate::record::SupplyChainEvent;
use crate::types::{EventId, EventType, Metadata, ProductId, StakeholderId, Timestamp};

#[derive(Clone, Debug, PartialEq)]
pub struct ProposedEvent {
    pub product_id: Option<ProductId>,
    pub stakeholder_id: Option<StakeholderId>,
    pub event_type: EventType,
    pub location: Option<String>,
    pub timestamp: Timestamp,
    pub metadata: Option<Metadata>,
    pub blockchain_hash: Option<String>,
}

impl ProposedEvent {
    pub fn new(event_type: EventType, timestamp: Timestamp) -> Self {
        Self {
            product_id: None,
            stakeholder_id: None,
            event_type,
            location: None,
            timestamp,
            metadata: None,
            blockchain_hash: None,
        }
    }

    pub fn for_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn by_stakeholder(mut self, stakeholder_id: StakeholderId) -> Self {
        self.stakeholder_id = Some(stakeholder_id);
        self
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// New records always start unverified, whatever hash the caller supplied.
    pub fn into_record(self, created_at: Timestamp) -> SupplyChainEvent {
        SupplyChainEvent {
            id: EventId::new(),
            product_id: self.product_id,
            stakeholder_id: self.stakeholder_id,
            event_type: self.event_type,
            location: self.location,
            timestamp: self.timestamp,
            metadata: self.metadata,
            blockchain_hash: self.blockchain_hash,
            is_verified: false,
            created_at,
        }
    }
}
