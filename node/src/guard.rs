// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-product write serialization.
//!
//! Event creation reads a product's history and then inserts. Two creators
//! racing on one product can both pass the sequence check unless they hold a
//! permit for that product across the read and the insert.

use std::sync::Arc;

use async_trait::async_trait;
use custody_kernel::types::ProductId;
use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Held for the duration of one read-check-insert. Released on drop.
#[derive(Debug)]
pub struct SequencePermit {
    held: Option<OwnedMutexGuard<()>>,
}

impl SequencePermit {
    pub fn unguarded() -> Self {
        Self { held: None }
    }

    pub fn is_exclusive(&self) -> bool {
        self.held.is_some()
    }
}

#[async_trait]
pub trait SequenceGuard: Send + Sync {
    async fn acquire(&self, product_id: ProductId) -> SequencePermit;
}

/// One async mutex per product, created on demand.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    table: Mutex<FxHashMap<ProductId, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of products with a live lock entry.
    pub async fn tracked(&self) -> usize {
        self.table.lock().await.len()
    }
}

#[async_trait]
impl SequenceGuard for KeyedLocks {
    async fn acquire(&self, product_id: ProductId) -> SequencePermit {
        let lock = {
            let mut table = self.table.lock().await;
            // Entries nobody holds or waits on can go
            table.retain(|id, l| *id == product_id || Arc::strong_count(l) > 1);
            table.entry(product_id).or_default().clone()
        };
        SequencePermit {
            held: Some(lock.lock_owned().await),
        }
    }
}

/// Takes no lock. Concurrent creators for one product may both succeed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGuard;

#[async_trait]
impl SequenceGuard for NoopGuard {
    async fn acquire(&self, _product_id: ProductId) -> SequencePermit {
        SequencePermit::unguarded()
    }
}

pub fn for_config(serialize_event_writes: bool) -> Arc<dyn SequenceGuard> {
    if serialize_event_writes {
        Arc::new(KeyedLocks::new())
    } else {
        Arc::new(NoopGuard)
    }
}
