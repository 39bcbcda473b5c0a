// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeZone;
use custody_kernel::types::{EventId, EventType, ProductId, StakeholderId, Timestamp};
use custody_kernel::{Product, Stakeholder, SupplyChainEvent};
use custody_node::api::{CreateEventRequest, CreateProductRequest, CreateStakeholderRequest};
use custody_node::store::{
    EventFilter, EventPatch, EventStore, MemoryStore, PageRequest, Repositories, StoreResult,
};
use custody_node::{Engine, EngineResult, NodeConfig};

pub fn t(minutes: i64) -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

pub fn engine() -> Engine {
    Engine::in_memory(NodeConfig::default())
}

pub fn engine_with(config: NodeConfig) -> Engine {
    Engine::in_memory(config)
}

pub async fn stakeholder(engine: &Engine, kind: &str, email: &str) -> Stakeholder {
    let req = CreateStakeholderRequest {
        name: format!("{} org", kind),
        kind: kind.to_string(),
        email: email.to_string(),
        ..Default::default()
    };
    engine.create_stakeholder(&engine.context(), req).await.unwrap()
}

pub async fn manufacturer(engine: &Engine, email: &str) -> Stakeholder {
    stakeholder(engine, "manufacturer", email).await
}

pub async fn product(engine: &Engine, sku: &str, manufacturer: Option<StakeholderId>) -> Product {
    let req = CreateProductRequest {
        sku: sku.to_string(),
        name: format!("Product {}", sku),
        manufacturer_id: manufacturer,
        ..Default::default()
    };
    engine.create_product(&engine.context(), req).await.unwrap()
}

pub async fn record(
    engine: &Engine,
    product: ProductId,
    event_type: EventType,
    at: Timestamp,
) -> EngineResult<SupplyChainEvent> {
    let req = CreateEventRequest::new(event_type, at).for_product(product);
    engine.create_event(&engine.context(), req).await
}

/// Event store whose history reads stall, widening the window between a
/// sequence check and the insert that follows it.
pub struct SlowHistory {
    pub inner: Arc<MemoryStore>,
    pub delay: Duration,
}

#[async_trait]
impl EventStore for SlowHistory {
    async fn create(&self, event: SupplyChainEvent) -> StoreResult<()> {
        EventStore::create(&*self.inner, event).await
    }

    async fn get(&self, id: EventId) -> StoreResult<SupplyChainEvent> {
        EventStore::get(&*self.inner, id).await
    }

    async fn update(&self, id: EventId, patch: EventPatch) -> StoreResult<()> {
        EventStore::update(&*self.inner, id, patch).await
    }

    async fn delete(&self, id: EventId) -> StoreResult<()> {
        EventStore::delete(&*self.inner, id).await
    }

    async fn list(
        &self,
        filter: &EventFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<SupplyChainEvent>, u64)> {
        EventStore::list(&*self.inner, filter, page).await
    }

    async fn count(&self, filter: &EventFilter) -> StoreResult<u64> {
        EventStore::count(&*self.inner, filter).await
    }

    async fn by_product(&self, product_id: ProductId) -> StoreResult<Vec<SupplyChainEvent>> {
        let history = EventStore::by_product(&*self.inner, product_id).await;
        tokio::time::sleep(self.delay).await;
        history
    }

    async fn by_stakeholder(
        &self,
        stakeholder_id: StakeholderId,
    ) -> StoreResult<Vec<SupplyChainEvent>> {
        EventStore::by_stakeholder(&*self.inner, stakeholder_id).await
    }
}

/// Engine over a memory backend whose event history reads take `delay`.
pub fn slow_engine(config: NodeConfig, delay: Duration) -> Engine {
    let backend = Arc::new(MemoryStore::new());
    let mut repos = Repositories::from_backend(backend.clone());
    repos.events = Arc::new(SlowHistory {
        inner: backend,
        delay,
    });
    Engine::new(config, repos)
}
