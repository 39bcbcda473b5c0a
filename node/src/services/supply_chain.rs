// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event recording, sequence checks, traces and verification.

use chrono::Utc;
use custody_kernel::config::MAX_HASH_LEN;
use custody_kernel::types::{EventId, ProductId, StakeholderId};
use custody_kernel::{validate, Entity, ProposedEvent, SupplyChainEvent, Trace};

use crate::api::{CreateEventRequest, Page};
use crate::context::OpContext;
use crate::engine::Engine;
use crate::errors::{EngineResult, StoreResultExt};
use crate::guard::SequencePermit;
use crate::store::{EventFilter, EventPatch, PageRequest};
use crate::telemetry::{EVENTS_RECORDED, EVENTS_REJECTED, EVENTS_VERIFIED};

impl Engine {
    /// Validates, sequence-checks and writes one event.
    ///
    /// The product's permit is held from the history read until the insert
    /// has completed.
    #[tracing::instrument(
        skip(self, ctx, req),
        fields(event_type = %req.event_type, product_id = ?req.product_id)
    )]
    pub async fn create_event(
        &self,
        ctx: &OpContext,
        req: CreateEventRequest,
    ) -> EngineResult<SupplyChainEvent> {
        self.bounded(ctx, "create_event", async move {
            let recorded = async {
                let proposed = req.into_proposed()?;
                let _permit = match proposed.product_id {
                    Some(product_id) => self.guard.acquire(product_id).await,
                    None => SequencePermit::unguarded(),
                };
                self.check_sequence(&proposed).await?;

                let record = proposed.into_record(Utc::now());
                let id = record.id;
                let store = &self.repos.events;
                store.create(record).await.context("recording event")?;
                store
                    .get(id)
                    .await
                    .or_not_found(Entity::Event, "reading event")
            }
            .await;

            match &recorded {
                Ok(event) => {
                    metrics::increment_counter!(EVENTS_RECORDED);
                    tracing::info!(event_id = %event.id, "Event recorded");
                }
                Err(e) => {
                    metrics::increment_counter!(EVENTS_REJECTED, "reason" => e.reason());
                    tracing::warn!(reason = e.reason(), "Event rejected: {}", e);
                }
            }
            recorded
        })
        .await
    }

    /// Dry run of `create_event`: `Ok(())` when the event would be admitted
    /// right now. Nothing is written and no permit is taken.
    pub async fn validate_event_sequence(
        &self,
        ctx: &OpContext,
        req: CreateEventRequest,
    ) -> EngineResult<()> {
        self.bounded(ctx, "validate_event_sequence", async move {
            let proposed = req.into_proposed()?;
            self.check_sequence(&proposed).await
        })
        .await
    }

    async fn check_sequence(&self, proposed: &ProposedEvent) -> EngineResult<()> {
        if let Some(product_id) = proposed.product_id {
            self.repos
                .products
                .get(product_id)
                .await
                .or_not_found(Entity::Product, "reading product")?;
        }
        if let Some(stakeholder_id) = proposed.stakeholder_id {
            self.repos
                .stakeholders
                .get(stakeholder_id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")?;
        }

        let Some(product_id) = proposed.product_id else {
            return Ok(());
        };
        let history = self
            .repos
            .events
            .by_product(product_id)
            .await
            .context("reading product history")?;
        tracing::debug!(
            policy = self.policy.name(),
            history = history.len(),
            "Checking event sequence"
        );
        self.policy.admit(proposed, &history)?;
        Ok(())
    }

    pub async fn get_event(&self, ctx: &OpContext, id: EventId) -> EngineResult<SupplyChainEvent> {
        self.bounded(ctx, "get_event", async move {
            self.repos
                .events
                .get(id)
                .await
                .or_not_found(Entity::Event, "reading event")
        })
        .await
    }

    /// Removes the event and its transactions.
    #[tracing::instrument(skip(self, ctx), fields(event_id = %id))]
    pub async fn delete_event(&self, ctx: &OpContext, id: EventId) -> EngineResult<()> {
        self.bounded(ctx, "delete_event", async move {
            self.repos
                .events
                .delete(id)
                .await
                .or_not_found(Entity::Event, "deleting event")?;
            tracing::info!("Event deleted");
            Ok(())
        })
        .await
    }

    /// Newest occurrence first.
    pub async fn list_events(
        &self,
        ctx: &OpContext,
        filter: &EventFilter,
        page: PageRequest,
    ) -> EngineResult<Page<SupplyChainEvent>> {
        let page = self.page(page);
        self.bounded(ctx, "list_events", async move {
            let (items, total) = self
                .repos
                .events
                .list(filter, page)
                .await
                .context("listing events")?;
            Ok(Page::new(items, total, page))
        })
        .await
    }

    /// Ascending occurrence time.
    pub async fn events_by_product(
        &self,
        ctx: &OpContext,
        product_id: ProductId,
    ) -> EngineResult<Vec<SupplyChainEvent>> {
        self.bounded(ctx, "events_by_product", async move {
            self.repos
                .products
                .get(product_id)
                .await
                .or_not_found(Entity::Product, "reading product")?;
            self.repos
                .events
                .by_product(product_id)
                .await
                .context("scanning events by product")
        })
        .await
    }

    /// Newest write first.
    pub async fn events_by_stakeholder(
        &self,
        ctx: &OpContext,
        stakeholder_id: StakeholderId,
    ) -> EngineResult<Vec<SupplyChainEvent>> {
        self.bounded(ctx, "events_by_stakeholder", async move {
            self.repos
                .stakeholders
                .get(stakeholder_id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")?;
            self.repos
                .events
                .by_stakeholder(stakeholder_id)
                .await
                .context("scanning events by stakeholder")
        })
        .await
    }

    #[tracing::instrument(skip(self, ctx), fields(product_id = %product_id))]
    pub async fn get_trace(&self, ctx: &OpContext, product_id: ProductId) -> EngineResult<Trace> {
        self.bounded(ctx, "get_trace", async move {
            let product = self
                .repos
                .products
                .get(product_id)
                .await
                .or_not_found(Entity::Product, "reading product")?;
            let events = self
                .repos
                .events
                .by_product(product_id)
                .await
                .context("scanning events by product")?;

            let trace = Trace::assemble(product, events);
            tracing::debug!(events = trace.len(), "Trace assembled");
            Ok(trace)
        })
        .await
    }

    /// Marks the event verified and stores `blockchain_hash` in one update.
    /// An earlier hash is overwritten.
    #[tracing::instrument(skip(self, ctx, blockchain_hash), fields(event_id = %id))]
    pub async fn verify_event(
        &self,
        ctx: &OpContext,
        id: EventId,
        blockchain_hash: &str,
    ) -> EngineResult<SupplyChainEvent> {
        self.bounded(ctx, "verify_event", async move {
            validate::bounded("blockchain_hash", blockchain_hash, MAX_HASH_LEN)?;
            let store = &self.repos.events;
            let current = store
                .get(id)
                .await
                .or_not_found(Entity::Event, "reading event")?;
            if let Some(previous) = current
                .blockchain_hash
                .as_deref()
                .filter(|h| *h != blockchain_hash)
            {
                tracing::warn!(previous, replacement = blockchain_hash, "Overwriting event hash");
            }

            store
                .update(id, EventPatch::verification(blockchain_hash))
                .await
                .or_not_found(Entity::Event, "verifying event")?;
            metrics::increment_counter!(EVENTS_VERIFIED);
            tracing::info!("Event verified");

            store
                .get(id)
                .await
                .or_not_found(Entity::Event, "reading event")
        })
        .await
    }
}
