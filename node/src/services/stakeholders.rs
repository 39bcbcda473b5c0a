// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use chrono::Utc;
use custody_kernel::types::StakeholderId;
use custody_kernel::{Entity, KernelError, Stakeholder, UniqueField};

use crate::api::{CreateStakeholderRequest, Page, UpdateStakeholderRequest};
use crate::context::OpContext;
use crate::engine::Engine;
use crate::errors::{is_taken, EngineResult, StoreResultExt};
use crate::store::{PageRequest, StakeholderFilter, StakeholderPatch};

impl Engine {
    #[tracing::instrument(skip(self, ctx, req), fields(email = %req.email))]
    pub async fn create_stakeholder(
        &self,
        ctx: &OpContext,
        req: CreateStakeholderRequest,
    ) -> EngineResult<Stakeholder> {
        self.bounded(ctx, "create_stakeholder", async move {
            let record = req.into_record()?;
            self.ensure_contact_free(&record.email, record.wallet_address.as_deref())
                .await?;

            let id = record.id;
            let store = &self.repos.stakeholders;
            store.create(record).await.context("creating stakeholder")?;
            let created = store
                .get(id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")?;

            tracing::info!(stakeholder_id = %id, kind = %created.kind, "Stakeholder created");
            Ok(created)
        })
        .await
    }

    pub async fn get_stakeholder(
        &self,
        ctx: &OpContext,
        id: StakeholderId,
    ) -> EngineResult<Stakeholder> {
        self.bounded(ctx, "get_stakeholder", async move {
            self.repos
                .stakeholders
                .get(id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")
        })
        .await
    }

    pub async fn get_stakeholder_by_email(
        &self,
        ctx: &OpContext,
        email: &str,
    ) -> EngineResult<Stakeholder> {
        self.bounded(ctx, "get_stakeholder_by_email", async move {
            self.repos
                .stakeholders
                .get_by_email(email)
                .await
                .or_not_found(Entity::Stakeholder, "looking up stakeholder by email")
        })
        .await
    }

    /// Partial update. Uniqueness is only rechecked for values that change.
    #[tracing::instrument(skip(self, ctx, req), fields(stakeholder_id = %id))]
    pub async fn update_stakeholder(
        &self,
        ctx: &OpContext,
        id: StakeholderId,
        req: UpdateStakeholderRequest,
    ) -> EngineResult<Stakeholder> {
        self.bounded(ctx, "update_stakeholder", async move {
            let patch = req.into_patch()?;
            let store = &self.repos.stakeholders;
            let current = store
                .get(id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")?;

            if let Some(email) = patch.email.as_deref().filter(|e| *e != current.email) {
                if is_taken(store.get_by_email(email).await, "checking email")? {
                    return Err(KernelError::duplicate(UniqueField::Email).into());
                }
            }
            if let Some(wallet) = patch
                .wallet_address
                .as_deref()
                .filter(|w| current.wallet_address.as_deref() != Some(*w))
            {
                if is_taken(store.get_by_wallet(wallet).await, "checking wallet address")? {
                    return Err(KernelError::duplicate(UniqueField::WalletAddress).into());
                }
            }

            store
                .update(id, patch)
                .await
                .or_not_found(Entity::Stakeholder, "updating stakeholder")?;
            tracing::debug!("Stakeholder updated");
            store
                .get(id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")
        })
        .await
    }

    /// Removes the stakeholder, its events and their transactions.
    #[tracing::instrument(skip(self, ctx), fields(stakeholder_id = %id))]
    pub async fn delete_stakeholder(&self, ctx: &OpContext, id: StakeholderId) -> EngineResult<()> {
        self.bounded(ctx, "delete_stakeholder", async move {
            self.repos
                .stakeholders
                .delete(id)
                .await
                .or_not_found(Entity::Stakeholder, "deleting stakeholder")?;
            tracing::info!("Stakeholder deleted");
            Ok(())
        })
        .await
    }

    pub async fn list_stakeholders(
        &self,
        ctx: &OpContext,
        filter: &StakeholderFilter,
        page: PageRequest,
    ) -> EngineResult<Page<Stakeholder>> {
        let page = self.page(page);
        self.bounded(ctx, "list_stakeholders", async move {
            let (items, total) = self
                .repos
                .stakeholders
                .list(filter, page)
                .await
                .context("listing stakeholders")?;
            Ok(Page::new(items, total, page))
        })
        .await
    }

    #[tracing::instrument(skip(self, ctx), fields(stakeholder_id = %id))]
    pub async fn verify_stakeholder(
        &self,
        ctx: &OpContext,
        id: StakeholderId,
    ) -> EngineResult<Stakeholder> {
        self.bounded(ctx, "verify_stakeholder", async move {
            let patch = StakeholderPatch {
                is_verified: Some(true),
                updated_at: Some(Utc::now()),
                ..StakeholderPatch::default()
            };
            let store = &self.repos.stakeholders;
            store
                .update(id, patch)
                .await
                .or_not_found(Entity::Stakeholder, "verifying stakeholder")?;
            tracing::info!("Stakeholder verified");
            store
                .get(id)
                .await
                .or_not_found(Entity::Stakeholder, "reading stakeholder")
        })
        .await
    }

    async fn ensure_contact_free(&self, email: &str, wallet: Option<&str>) -> EngineResult<()> {
        let store = &self.repos.stakeholders;
        if is_taken(store.get_by_email(email).await, "checking email")? {
            return Err(KernelError::duplicate(UniqueField::Email).into());
        }
        if let Some(wallet) = wallet {
            if is_taken(store.get_by_wallet(wallet).await, "checking wallet address")? {
                return Err(KernelError::duplicate(UniqueField::WalletAddress).into());
            }
        }
        Ok(())
    }
}
