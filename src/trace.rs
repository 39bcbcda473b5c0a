// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Product traces: a product joined with its custody history.

use serde::{Deserialize, Serialize};

use crate::record::{Product, SupplyChainEvent};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub product: Product,
    pub events: Vec<SupplyChainEvent>,
}

impl Trace {
    /// Builds a trace from events in any order.
    ///
    /// Events end up in non-decreasing occurrence time; equal timestamps keep
    /// write order. Events for other products are not filtered here.
    pub fn assemble(product: Product, mut events: Vec<SupplyChainEvent>) -> Self {
        sort_by_occurrence(&mut events);
        Self { product, events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> Option<&SupplyChainEvent> {
        self.events.first()
    }

    pub fn latest(&self) -> Option<&SupplyChainEvent> {
        self.events.last()
    }
}

pub fn sort_by_occurrence(events: &mut [SupplyChainEvent]) {
    events.sort_by_key(|e| e.occurrence_key());
}

/// Newest first by record-creation time.
pub fn sort_by_creation_desc(events: &mut [SupplyChainEvent]) {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
