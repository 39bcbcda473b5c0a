// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger transactions attesting custody events.

use custody_kernel::types::{EventId, TransactionId, TransactionStatus};
use custody_kernel::{BlockchainTransaction, Entity, KernelError, UniqueField};

use crate::api::{CreateTransactionRequest, Page};
use crate::context::OpContext;
use crate::engine::Engine;
use crate::errors::{is_taken, EngineResult, StoreResultExt};
use crate::store::{PageRequest, TransactionFilter, TransactionPatch};

impl Engine {
    #[tracing::instrument(skip(self, ctx, req), fields(event_id = ?req.event_id))]
    pub async fn create_transaction(
        &self,
        ctx: &OpContext,
        req: CreateTransactionRequest,
    ) -> EngineResult<BlockchainTransaction> {
        self.bounded(ctx, "create_transaction", async move {
            let record = req.into_record()?;
            if let Some(event_id) = record.event_id {
                self.repos
                    .events
                    .get(event_id)
                    .await
                    .or_not_found(Entity::Event, "reading event")?;
            }

            let store = &self.repos.transactions;
            if is_taken(
                store.get_by_hash(&record.transaction_hash).await,
                "checking transaction hash",
            )? {
                return Err(KernelError::duplicate(UniqueField::TransactionHash).into());
            }

            let id = record.id;
            store.create(record).await.context("creating transaction")?;
            let created = store
                .get(id)
                .await
                .or_not_found(Entity::Transaction, "reading transaction")?;

            tracing::info!(transaction_id = %id, status = %created.status, "Transaction recorded");
            Ok(created)
        })
        .await
    }

    pub async fn get_transaction(
        &self,
        ctx: &OpContext,
        id: TransactionId,
    ) -> EngineResult<BlockchainTransaction> {
        self.bounded(ctx, "get_transaction", async move {
            self.repos
                .transactions
                .get(id)
                .await
                .or_not_found(Entity::Transaction, "reading transaction")
        })
        .await
    }

    pub async fn get_transaction_by_hash(
        &self,
        ctx: &OpContext,
        hash: &str,
    ) -> EngineResult<BlockchainTransaction> {
        self.bounded(ctx, "get_transaction_by_hash", async move {
            self.repos
                .transactions
                .get_by_hash(hash)
                .await
                .or_not_found(Entity::Transaction, "looking up transaction by hash")
        })
        .await
    }

    /// `block_number`, when given, is written alongside the status.
    #[tracing::instrument(skip(self, ctx), fields(transaction_id = %id))]
    pub async fn update_transaction_status(
        &self,
        ctx: &OpContext,
        id: TransactionId,
        status: &str,
        block_number: Option<i64>,
    ) -> EngineResult<BlockchainTransaction> {
        self.bounded(ctx, "update_transaction_status", async move {
            let status: TransactionStatus = status.parse()?;
            let store = &self.repos.transactions;
            store
                .update(
                    id,
                    TransactionPatch {
                        status: Some(status),
                        block_number,
                    },
                )
                .await
                .or_not_found(Entity::Transaction, "updating transaction")?;
            tracing::info!(%status, "Transaction status updated");

            store
                .get(id)
                .await
                .or_not_found(Entity::Transaction, "reading transaction")
        })
        .await
    }

    /// Newest first.
    pub async fn list_transactions(
        &self,
        ctx: &OpContext,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> EngineResult<Page<BlockchainTransaction>> {
        let page = self.page(page);
        self.bounded(ctx, "list_transactions", async move {
            let (items, total) = self
                .repos
                .transactions
                .list(filter, page)
                .await
                .context("listing transactions")?;
            Ok(Page::new(items, total, page))
        })
        .await
    }

    /// Newest first.
    pub async fn transactions_by_event(
        &self,
        ctx: &OpContext,
        event_id: EventId,
    ) -> EngineResult<Vec<BlockchainTransaction>> {
        self.bounded(ctx, "transactions_by_event", async move {
            self.repos
                .events
                .get(event_id)
                .await
                .or_not_found(Entity::Event, "reading event")?;
            self.repos
                .transactions
                .by_event(event_id)
                .await
                .context("scanning transactions by event")
        })
        .await
    }
}
