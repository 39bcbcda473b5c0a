// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Persistence Boundary
//!
//! The engine talks to storage only through the four traits below, one per
//! record kind. Implementations must make every single call atomic: a create,
//! an update with its patch, and a delete with its cascades are each all or
//! nothing.
//!
//! # Ordering contracts
//! - `EventStore::by_product`: ascending occurrence time, ties in write order
//! - `EventStore::by_stakeholder`: newest write first
//! - `TransactionStore::by_event`: newest write first
//!
//! # Cascades
//! - product deleted → its events (and their transactions)
//! - stakeholder deleted → its events (and their transactions); products it
//!   manufactured lose their manufacturer reference
//! - event deleted → its transactions

pub mod filter;
pub mod memory;
pub mod patch;

use std::sync::Arc;

use async_trait::async_trait;
use custody_kernel::types::{EventId, ProductId, StakeholderId, TransactionId};
use custody_kernel::{
    BlockchainTransaction, Entity, Product, Stakeholder, SupplyChainEvent, UniqueField,
};
use thiserror::Error;

pub use filter::{EventFilter, PageRequest, ProductFilter, StakeholderFilter, TransactionFilter};
pub use memory::MemoryStore;
pub use patch::{EventPatch, ProductPatch, StakeholderPatch, TransactionPatch};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated on {0}")]
    UniqueViolation(UniqueField),

    #[error("referenced {0} does not exist")]
    ForeignKey(Entity),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait StakeholderStore: Send + Sync {
    async fn create(&self, stakeholder: Stakeholder) -> StoreResult<()>;
    async fn get(&self, id: StakeholderId) -> StoreResult<Stakeholder>;
    async fn get_by_email(&self, email: &str) -> StoreResult<Stakeholder>;
    async fn get_by_wallet(&self, wallet_address: &str) -> StoreResult<Stakeholder>;
    async fn update(&self, id: StakeholderId, patch: StakeholderPatch) -> StoreResult<()>;
    async fn delete(&self, id: StakeholderId) -> StoreResult<()>;
    /// One page plus the total number of matches.
    async fn list(
        &self,
        filter: &StakeholderFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<Stakeholder>, u64)>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, product: Product) -> StoreResult<()>;
    async fn get(&self, id: ProductId) -> StoreResult<Product>;
    async fn get_by_sku(&self, sku: &str) -> StoreResult<Product>;
    async fn update(&self, id: ProductId, patch: ProductPatch) -> StoreResult<()>;
    async fn delete(&self, id: ProductId) -> StoreResult<()>;
    async fn list(&self, filter: &ProductFilter, page: PageRequest)
        -> StoreResult<(Vec<Product>, u64)>;
    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64>;
    async fn by_manufacturer(&self, manufacturer_id: StakeholderId) -> StoreResult<Vec<Product>>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create(&self, event: SupplyChainEvent) -> StoreResult<()>;
    async fn get(&self, id: EventId) -> StoreResult<SupplyChainEvent>;
    async fn update(&self, id: EventId, patch: EventPatch) -> StoreResult<()>;
    async fn delete(&self, id: EventId) -> StoreResult<()>;
    async fn list(
        &self,
        filter: &EventFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<SupplyChainEvent>, u64)>;
    async fn count(&self, filter: &EventFilter) -> StoreResult<u64>;
    async fn by_product(&self, product_id: ProductId) -> StoreResult<Vec<SupplyChainEvent>>;
    async fn by_stakeholder(&self, stakeholder_id: StakeholderId)
        -> StoreResult<Vec<SupplyChainEvent>>;
}

/// Transactions are never deleted directly, only through event cascades.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn create(&self, transaction: BlockchainTransaction) -> StoreResult<()>;
    async fn get(&self, id: TransactionId) -> StoreResult<BlockchainTransaction>;
    async fn get_by_hash(&self, hash: &str) -> StoreResult<BlockchainTransaction>;
    async fn update(&self, id: TransactionId, patch: TransactionPatch) -> StoreResult<()>;
    async fn list(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<BlockchainTransaction>, u64)>;
    async fn by_event(&self, event_id: EventId) -> StoreResult<Vec<BlockchainTransaction>>;
}

/// One handle per record kind. Usually all four point at the same backend.
#[derive(Clone)]
pub struct Repositories {
    pub stakeholders: Arc<dyn StakeholderStore>,
    pub products: Arc<dyn ProductStore>,
    pub events: Arc<dyn EventStore>,
    pub transactions: Arc<dyn TransactionStore>,
}

impl Repositories {
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: StakeholderStore + ProductStore + EventStore + TransactionStore + 'static,
    {
        Self {
            stakeholders: backend.clone(),
            products: backend.clone(),
            events: backend.clone(),
            transactions: backend,
        }
    }

    pub fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }
}
