// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Partial updates. `None` leaves a field untouched.

use custody_kernel::types::{Metadata, StakeholderId, Timestamp, TransactionStatus};
use custody_kernel::{BlockchainTransaction, Product, Stakeholder, SupplyChainEvent};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StakeholderPatch {
    pub name: Option<String>,
    pub wallet_address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_verified: Option<bool>,
    pub updated_at: Option<Timestamp>,
}

impl StakeholderPatch {
    pub fn apply(self, s: &mut Stakeholder) {
        if let Some(v) = self.name {
            s.name = v;
        }
        if let Some(v) = self.wallet_address {
            s.wallet_address = Some(v);
        }
        if let Some(v) = self.email {
            s.email = v;
        }
        if let Some(v) = self.phone {
            s.phone = Some(v);
        }
        if let Some(v) = self.address {
            s.address = Some(v);
        }
        if let Some(v) = self.is_verified {
            s.is_verified = v;
        }
        if let Some(v) = self.updated_at {
            s.updated_at = v;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub manufacturer_id: Option<StakeholderId>,
    pub metadata: Option<Metadata>,
    pub updated_at: Option<Timestamp>,
}

impl ProductPatch {
    pub fn apply(self, p: &mut Product) {
        if let Some(v) = self.name {
            p.name = v;
        }
        if let Some(v) = self.description {
            p.description = Some(v);
        }
        if let Some(v) = self.category {
            p.category = Some(v);
        }
        if let Some(v) = self.manufacturer_id {
            p.manufacturer_id = Some(v);
        }
        if let Some(v) = self.metadata {
            p.metadata = Some(v);
        }
        if let Some(v) = self.updated_at {
            p.updated_at = v;
        }
    }
}

/// Events only ever change through verification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub is_verified: Option<bool>,
    pub blockchain_hash: Option<String>,
}

impl EventPatch {
    /// Flag and hash together, so they are written in one step.
    pub fn verification(hash: impl Into<String>) -> Self {
        Self {
            is_verified: Some(true),
            blockchain_hash: Some(hash.into()),
        }
    }

    pub fn apply(self, e: &mut SupplyChainEvent) {
        if let Some(v) = self.is_verified {
            e.is_verified = v;
        }
        if let Some(v) = self.blockchain_hash {
            e.blockchain_hash = Some(v);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub status: Option<TransactionStatus>,
    pub block_number: Option<i64>,
}

impl TransactionPatch {
    pub fn apply(self, t: &mut BlockchainTransaction) {
        if let Some(v) = self.status {
            t.status = v;
        }
        if let Some(v) = self.block_number {
            t.block_number = Some(v);
        }
    }
}
