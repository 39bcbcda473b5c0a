// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-memory reference backend.
//!
//! All four tables sit behind one `RwLock`, so a cascade delete is a single
//! critical section. Rows carry an insertion sequence number that breaks ties
//! between equal timestamps.

use async_trait::async_trait;
use custody_kernel::types::{EventId, ProductId, StakeholderId, TransactionId};
use custody_kernel::{
    BlockchainTransaction, Entity, Product, Stakeholder, SupplyChainEvent, UniqueField,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use tokio::sync::RwLock;

use super::{
    EventFilter, EventPatch, EventStore, PageRequest, ProductFilter, ProductPatch, ProductStore,
    StakeholderFilter, StakeholderPatch, StakeholderStore, StoreError, StoreResult,
    TransactionFilter, TransactionPatch, TransactionStore,
};

struct Row<T> {
    seq: u64,
    record: T,
}

#[derive(Default)]
struct Tables {
    next_seq: u64,
    stakeholders: FxHashMap<StakeholderId, Row<Stakeholder>>,
    products: FxHashMap<ProductId, Row<Product>>,
    events: FxHashMap<EventId, Row<SupplyChainEvent>>,
    transactions: FxHashMap<TransactionId, Row<BlockchainTransaction>>,
}

impl Tables {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn email_taken(&self, email: &str, except: Option<StakeholderId>) -> bool {
        self.stakeholders
            .values()
            .any(|r| r.record.email == email && Some(r.record.id) != except)
    }

    fn wallet_taken(&self, wallet: &str, except: Option<StakeholderId>) -> bool {
        self.stakeholders.values().any(|r| {
            r.record.wallet_address.as_deref() == Some(wallet) && Some(r.record.id) != except
        })
    }

    fn check_event_refs(&self, event: &SupplyChainEvent) -> StoreResult<()> {
        if let Some(p) = event.product_id {
            if !self.products.contains_key(&p) {
                return Err(StoreError::ForeignKey(Entity::Product));
            }
        }
        if let Some(s) = event.stakeholder_id {
            if !self.stakeholders.contains_key(&s) {
                return Err(StoreError::ForeignKey(Entity::Stakeholder));
            }
        }
        Ok(())
    }

    /// Removes matching events and, transitively, their transactions.
    fn purge_events<F>(&mut self, doomed: F) -> usize
    where
        F: Fn(&SupplyChainEvent) -> bool,
    {
        let ids: FxHashSet<EventId> = self
            .events
            .values()
            .filter(|r| doomed(&r.record))
            .map(|r| r.record.id)
            .collect();

        self.events.retain(|id, _| !ids.contains(id));
        self.transactions
            .retain(|_, r| r.record.event_id.map_or(true, |e| !ids.contains(&e)));
        ids.len()
    }
}

/// Collects matching records in `order`, returns one page and the match count.
fn select<'a, T, K, F, O>(
    rows: impl Iterator<Item = &'a Row<T>>,
    matches: F,
    order: O,
    page: PageRequest,
) -> (Vec<T>, u64)
where
    T: Clone + 'a,
    F: Fn(&T) -> bool,
    O: Fn(&Row<T>) -> K,
    K: Ord,
{
    let mut hits: Vec<&Row<T>> = rows.filter(|r| matches(&r.record)).collect();
    hits.sort_by_key(|r| order(*r));
    let total = hits.len() as u64;
    let items = page.apply(hits).into_iter().map(|r| r.record.clone()).collect();
    (items, total)
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StakeholderStore for MemoryStore {
    async fn create(&self, stakeholder: Stakeholder) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t.email_taken(&stakeholder.email, None) {
            return Err(StoreError::UniqueViolation(UniqueField::Email));
        }
        if let Some(w) = stakeholder.wallet_address.as_deref() {
            if t.wallet_taken(w, None) {
                return Err(StoreError::UniqueViolation(UniqueField::WalletAddress));
            }
        }
        let seq = t.seq();
        t.stakeholders.insert(stakeholder.id, Row { seq, record: stakeholder });
        Ok(())
    }

    async fn get(&self, id: StakeholderId) -> StoreResult<Stakeholder> {
        let t = self.tables.read().await;
        t.stakeholders
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Stakeholder> {
        let t = self.tables.read().await;
        t.stakeholders
            .values()
            .find(|r| r.record.email == email)
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_wallet(&self, wallet_address: &str) -> StoreResult<Stakeholder> {
        let t = self.tables.read().await;
        t.stakeholders
            .values()
            .find(|r| r.record.wallet_address.as_deref() == Some(wallet_address))
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: StakeholderId, patch: StakeholderPatch) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if let Some(email) = patch.email.as_deref() {
            if t.email_taken(email, Some(id)) {
                return Err(StoreError::UniqueViolation(UniqueField::Email));
            }
        }
        if let Some(w) = patch.wallet_address.as_deref() {
            if t.wallet_taken(w, Some(id)) {
                return Err(StoreError::UniqueViolation(UniqueField::WalletAddress));
            }
        }
        let row = t.stakeholders.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(&mut row.record);
        Ok(())
    }

    async fn delete(&self, id: StakeholderId) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t.stakeholders.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        for row in t.products.values_mut() {
            if row.record.manufacturer_id == Some(id) {
                row.record.manufacturer_id = None;
            }
        }
        t.purge_events(|e| e.stakeholder_id == Some(id));
        Ok(())
    }

    async fn list(
        &self,
        filter: &StakeholderFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<Stakeholder>, u64)> {
        let t = self.tables.read().await;
        Ok(select(t.stakeholders.values(), |s| filter.matches(s), |r| r.seq, page))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create(&self, product: Product) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t.products.values().any(|r| r.record.sku == product.sku) {
            return Err(StoreError::UniqueViolation(UniqueField::Sku));
        }
        if let Some(m) = product.manufacturer_id {
            if !t.stakeholders.contains_key(&m) {
                return Err(StoreError::ForeignKey(Entity::Stakeholder));
            }
        }
        let seq = t.seq();
        t.products.insert(product.id, Row { seq, record: product });
        Ok(())
    }

    async fn get(&self, id: ProductId) -> StoreResult<Product> {
        let t = self.tables.read().await;
        t.products
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_sku(&self, sku: &str) -> StoreResult<Product> {
        let t = self.tables.read().await;
        t.products
            .values()
            .find(|r| r.record.sku == sku)
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if let Some(m) = patch.manufacturer_id {
            if !t.stakeholders.contains_key(&m) {
                return Err(StoreError::ForeignKey(Entity::Stakeholder));
            }
        }
        let row = t.products.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(&mut row.record);
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t.products.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        t.purge_events(|e| e.product_id == Some(id));
        Ok(())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<Product>, u64)> {
        let t = self.tables.read().await;
        Ok(select(t.products.values(), |p| filter.matches(p), |r| r.seq, page))
    }

    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        let t = self.tables.read().await;
        Ok(t.products.values().filter(|r| filter.matches(&r.record)).count() as u64)
    }

    async fn by_manufacturer(&self, manufacturer_id: StakeholderId) -> StoreResult<Vec<Product>> {
        let t = self.tables.read().await;
        let filter = ProductFilter::by_manufacturer(manufacturer_id);
        let (items, _) = select(
            t.products.values(),
            |p| filter.matches(p),
            |r| r.seq,
            PageRequest::new(usize::MAX, 0),
        );
        Ok(items)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create(&self, event: SupplyChainEvent) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        t.check_event_refs(&event)?;
        let seq = t.seq();
        t.events.insert(event.id, Row { seq, record: event });
        Ok(())
    }

    async fn get(&self, id: EventId) -> StoreResult<SupplyChainEvent> {
        let t = self.tables.read().await;
        t.events
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: EventId, patch: EventPatch) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        let row = t.events.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(&mut row.record);
        Ok(())
    }

    async fn delete(&self, id: EventId) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        match t.purge_events(|e| e.id == id) {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn list(
        &self,
        filter: &EventFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<SupplyChainEvent>, u64)> {
        let t = self.tables.read().await;
        // Newest occurrence first
        Ok(select(
            t.events.values(),
            |e| filter.matches(e),
            |r| Reverse((r.record.timestamp, r.seq)),
            page,
        ))
    }

    async fn count(&self, filter: &EventFilter) -> StoreResult<u64> {
        let t = self.tables.read().await;
        Ok(t.events.values().filter(|r| filter.matches(&r.record)).count() as u64)
    }

    async fn by_product(&self, product_id: ProductId) -> StoreResult<Vec<SupplyChainEvent>> {
        let t = self.tables.read().await;
        let filter = EventFilter::by_product(product_id);
        let (items, _) = select(
            t.events.values(),
            |e| filter.matches(e),
            |r| (r.record.timestamp, r.seq),
            PageRequest::new(usize::MAX, 0),
        );
        Ok(items)
    }

    async fn by_stakeholder(
        &self,
        stakeholder_id: StakeholderId,
    ) -> StoreResult<Vec<SupplyChainEvent>> {
        let t = self.tables.read().await;
        let filter = EventFilter::by_stakeholder(stakeholder_id);
        let (items, _) = select(
            t.events.values(),
            |e| filter.matches(e),
            |r| Reverse((r.record.created_at, r.seq)),
            PageRequest::new(usize::MAX, 0),
        );
        Ok(items)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn create(&self, transaction: BlockchainTransaction) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t
            .transactions
            .values()
            .any(|r| r.record.transaction_hash == transaction.transaction_hash)
        {
            return Err(StoreError::UniqueViolation(UniqueField::TransactionHash));
        }
        if let Some(e) = transaction.event_id {
            if !t.events.contains_key(&e) {
                return Err(StoreError::ForeignKey(Entity::Event));
            }
        }
        let seq = t.seq();
        t.transactions.insert(transaction.id, Row { seq, record: transaction });
        Ok(())
    }

    async fn get(&self, id: TransactionId) -> StoreResult<BlockchainTransaction> {
        let t = self.tables.read().await;
        t.transactions
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_hash(&self, hash: &str) -> StoreResult<BlockchainTransaction> {
        let t = self.tables.read().await;
        t.transactions
            .values()
            .find(|r| r.record.transaction_hash == hash)
            .map(|r| r.record.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: TransactionId, patch: TransactionPatch) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        let row = t.transactions.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(&mut row.record);
        Ok(())
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<BlockchainTransaction>, u64)> {
        let t = self.tables.read().await;
        Ok(select(
            t.transactions.values(),
            |tx| filter.matches(tx),
            |r| Reverse((r.record.created_at, r.seq)),
            page,
        ))
    }

    async fn by_event(&self, event_id: EventId) -> StoreResult<Vec<BlockchainTransaction>> {
        let t = self.tables.read().await;
        let filter = TransactionFilter {
            event_id: Some(event_id),
            ..TransactionFilter::default()
        };
        let (items, _) = select(
            t.transactions.values(),
            |tx| filter.matches(tx),
            |r| Reverse((r.record.created_at, r.seq)),
            PageRequest::new(usize::MAX, 0),
        );
        Ok(items)
    }
}
