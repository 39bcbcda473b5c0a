// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Record definitions.

use serde::{Deserialize, Serialize};

use crate::types::{
    EventId, EventType, Metadata, ProductId, StakeholderId, StakeholderType, Timestamp,
    TransactionId, TransactionStatus,
};

/// An organization taking part in the chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: StakeholderId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StakeholderType,
    pub wallet_address: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Stakeholder {
    pub fn is_manufacturer(&self) -> bool {
        self.kind == StakeholderType::Manufacturer
    }
}

/// A trackable item, identified by SKU.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub manufacturer_id: Option<StakeholderId>,
    pub metadata: Option<Metadata>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One custody action on a product.
///
/// `timestamp` is when the action happened in the real world and is supplied
/// by the caller. `created_at` is when the record was written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainEvent {
    pub id: EventId,
    pub product_id: Option<ProductId>,
    pub stakeholder_id: Option<StakeholderId>,
    pub event_type: EventType,
    pub location: Option<String>,
    pub timestamp: Timestamp,
    pub metadata: Option<Metadata>,
    pub blockchain_hash: Option<String>,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

impl SupplyChainEvent {
    /// Ordering key for "when did this happen": occurrence time, then write time.
    pub fn occurrence_key(&self) -> (Timestamp, Timestamp) {
        (self.timestamp, self.created_at)
    }
}

/// External ledger attestation, optionally pointing at one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainTransaction {
    pub id: TransactionId,
    pub event_id: Option<EventId>,
    pub transaction_hash: String,
    pub block_number: Option<i64>,
    pub gas_used: Option<i64>,
    pub status: TransactionStatus,
    pub created_at: Timestamp,
}
