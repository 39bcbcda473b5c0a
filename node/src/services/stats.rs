// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Summary statistics. Each figure is its own store call, so figures may
//! disagree slightly under concurrent writes.

use custody_kernel::stats::latest_by_occurrence;
use custody_kernel::types::{ProductId, StakeholderId};
use custody_kernel::{Entity, ProductStats, StakeholderStats};

use crate::context::OpContext;
use crate::engine::Engine;
use crate::errors::{EngineResult, StoreResultExt};
use crate::store::{EventFilter, ProductFilter};

impl Engine {
    #[tracing::instrument(skip(self, ctx), fields(stakeholder_id = %id))]
    pub async fn stakeholder_stats(
        &self,
        ctx: &OpContext,
        id: StakeholderId,
    ) -> EngineResult<StakeholderStats> {
        self.bounded(ctx, "stakeholder_stats", async move {
            self.repos
                .stakeholders
                .get(id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")?;

            let total_products = self
                .repos
                .products
                .count(&ProductFilter::by_manufacturer(id))
                .await
                .context("counting products")?;
            let events = &self.repos.events;
            let total_events = events
                .count(&EventFilter::by_stakeholder(id))
                .await
                .context("counting events")?;
            let verified_events = events
                .count(&EventFilter::by_stakeholder(id).verified(true))
                .await
                .context("counting verified events")?;
            // Newest write first
            let last_activity = events
                .by_stakeholder(id)
                .await
                .context("scanning events by stakeholder")?
                .first()
                .map(|e| e.created_at);

            Ok(StakeholderStats {
                stakeholder_id: id,
                total_products,
                total_events,
                verified_events,
                pending_events: total_events.saturating_sub(verified_events),
                last_activity,
            })
        })
        .await
    }

    #[tracing::instrument(skip(self, ctx), fields(product_id = %id))]
    pub async fn product_stats(&self, ctx: &OpContext, id: ProductId) -> EngineResult<ProductStats> {
        self.bounded(ctx, "product_stats", async move {
            self.repos
                .products
                .get(id)
                .await
                .or_not_found(Entity::Product, "reading product")?;

            let events = &self.repos.events;
            let total_events = events
                .count(&EventFilter::by_product(id))
                .await
                .context("counting events")?;
            let verified_events = events
                .count(&EventFilter::by_product(id).verified(true))
                .await
                .context("counting verified events")?;
            let history = events
                .by_product(id)
                .await
                .context("scanning events by product")?;

            Ok(ProductStats::counts(id, total_events, verified_events)
                .with_latest(latest_by_occurrence(&history)))
        })
        .await
    }
}
