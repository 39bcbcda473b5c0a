// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Record filters for listing and counting.
//!
//! Every field is optional and an absent field matches everything. Free-text
//! fields (SKU, name, email, location) match case-insensitive substrings;
//! everything else is exact equality. Filters combine with AND.

use custody_kernel::types::{
    EventId, EventType, ProductId, StakeholderId, StakeholderType, Timestamp, TransactionStatus,
};
use custody_kernel::{BlockchainTransaction, Product, Stakeholder, SupplyChainEvent};
use serde::{Deserialize, Serialize};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn eq_opt<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
    want.as_ref().map_or(true, |w| w == have)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderFilter {
    #[serde(rename = "type")]
    pub kind: Option<StakeholderType>,
    pub is_verified: Option<bool>,
    pub email: Option<String>,
}

impl StakeholderFilter {
    pub fn matches(&self, s: &Stakeholder) -> bool {
        eq_opt(&self.kind, &s.kind)
            && eq_opt(&self.is_verified, &s.is_verified)
            && self.email.as_deref().map_or(true, |e| contains_ci(&s.email, e))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub manufacturer_id: Option<StakeholderId>,
    pub sku: Option<String>,
    pub name: Option<String>,
}

impl ProductFilter {
    pub fn by_manufacturer(manufacturer_id: StakeholderId) -> Self {
        Self {
            manufacturer_id: Some(manufacturer_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, p: &Product) -> bool {
        self.category
            .as_ref()
            .map_or(true, |c| p.category.as_ref() == Some(c))
            && self
                .manufacturer_id
                .map_or(true, |m| p.manufacturer_id == Some(m))
            && self.sku.as_deref().map_or(true, |s| contains_ci(&p.sku, s))
            && self.name.as_deref().map_or(true, |n| contains_ci(&p.name, n))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub product_id: Option<ProductId>,
    pub stakeholder_id: Option<StakeholderId>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub is_verified: Option<bool>,
    /// Inclusive lower bound on occurrence time.
    pub from_date: Option<Timestamp>,
    /// Inclusive upper bound on occurrence time.
    pub to_date: Option<Timestamp>,
}

impl EventFilter {
    pub fn by_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }

    pub fn by_stakeholder(stakeholder_id: StakeholderId) -> Self {
        Self {
            stakeholder_id: Some(stakeholder_id),
            ..Self::default()
        }
    }

    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = Some(is_verified);
        self
    }

    pub fn matches(&self, e: &SupplyChainEvent) -> bool {
        self.product_id.map_or(true, |p| e.product_id == Some(p))
            && self
                .stakeholder_id
                .map_or(true, |s| e.stakeholder_id == Some(s))
            && eq_opt(&self.event_type, &e.event_type)
            && self.location.as_deref().map_or(true, |l| {
                e.location.as_deref().map_or(false, |have| contains_ci(have, l))
            })
            && eq_opt(&self.is_verified, &e.is_verified)
            && self.from_date.map_or(true, |from| e.timestamp >= from)
            && self.to_date.map_or(true, |to| e.timestamp <= to)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub event_id: Option<EventId>,
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &BlockchainTransaction) -> bool {
        self.event_id.map_or(true, |id| t.event_id == Some(id)) && eq_opt(&self.status, &t.status)
    }
}

/// Offset pagination. A zero limit means "use the configured default".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Replaces a zero limit with `default` and caps it at `max`.
    pub fn normalized(self, default: usize, max: usize) -> Self {
        let limit = if self.limit == 0 { default } else { self.limit };
        Self {
            limit: limit.min(max),
            offset: self.offset,
        }
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }
}
