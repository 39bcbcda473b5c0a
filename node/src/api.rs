// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Request and response shapes for the engine.
//!
//! Enumerated fields arrive as raw strings so that a bad literal surfaces as
//! the matching `InvalidEnum` kind instead of a generic decode failure.

use chrono::Utc;
use custody_kernel::config::{
    MAX_CATEGORY_LEN, MAX_HASH_LEN, MAX_LOCATION_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, MAX_SKU_LEN,
    MAX_WALLET_LEN,
};
use custody_kernel::types::{
    EventId, EventType, Metadata, ProductId, StakeholderId, StakeholderType, Timestamp,
    TransactionId, TransactionStatus,
};
use custody_kernel::{
    validate, BlockchainTransaction, KernelError, KernelResult, Product, ProposedEvent,
    Stakeholder,
};
use serde::{Deserialize, Serialize};

use crate::store::{PageRequest, ProductPatch, StakeholderPatch};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateStakeholderRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub wallet_address: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CreateStakeholderRequest {
    pub fn into_record(self) -> KernelResult<Stakeholder> {
        let kind: StakeholderType = self.kind.parse()?;
        validate::bounded("name", &self.name, MAX_NAME_LEN)?;
        validate::email(&self.email)?;
        validate::optional_max_len("wallet_address", self.wallet_address.as_deref(), MAX_WALLET_LEN)?;
        validate::optional_max_len("phone", self.phone.as_deref(), MAX_PHONE_LEN)?;

        let now = Utc::now();
        Ok(Stakeholder {
            id: StakeholderId::new(),
            name: self.name,
            kind,
            wallet_address: self.wallet_address,
            email: self.email,
            phone: self.phone,
            address: self.address,
            is_verified: false,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Absent fields are left unchanged. Type and verification are not editable here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateStakeholderRequest {
    pub name: Option<String>,
    pub wallet_address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateStakeholderRequest {
    pub fn into_patch(self) -> KernelResult<StakeholderPatch> {
        if let Some(name) = self.name.as_deref() {
            validate::bounded("name", name, MAX_NAME_LEN)?;
        }
        if let Some(email) = self.email.as_deref() {
            validate::email(email)?;
        }
        validate::optional_max_len("wallet_address", self.wallet_address.as_deref(), MAX_WALLET_LEN)?;
        validate::optional_max_len("phone", self.phone.as_deref(), MAX_PHONE_LEN)?;

        Ok(StakeholderPatch {
            name: self.name,
            wallet_address: self.wallet_address,
            email: self.email,
            phone: self.phone,
            address: self.address,
            is_verified: None,
            updated_at: Some(Utc::now()),
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub manufacturer_id: Option<StakeholderId>,
    pub metadata: Option<Metadata>,
}

impl CreateProductRequest {
    pub fn into_record(self) -> KernelResult<Product> {
        validate::bounded("sku", &self.sku, MAX_SKU_LEN)?;
        validate::bounded("name", &self.name, MAX_NAME_LEN)?;
        validate::optional_max_len("category", self.category.as_deref(), MAX_CATEGORY_LEN)?;

        let now = Utc::now();
        Ok(Product {
            id: ProductId::new(),
            sku: self.sku,
            name: self.name,
            description: self.description,
            category: self.category,
            manufacturer_id: self.manufacturer_id,
            metadata: self.metadata,
            created_at: now,
            updated_at: now,
        })
    }
}

/// SKU is the natural key and cannot be changed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub manufacturer_id: Option<StakeholderId>,
    pub metadata: Option<Metadata>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> KernelResult<ProductPatch> {
        if let Some(name) = self.name.as_deref() {
            validate::bounded("name", name, MAX_NAME_LEN)?;
        }
        validate::optional_max_len("category", self.category.as_deref(), MAX_CATEGORY_LEN)?;

        Ok(ProductPatch {
            name: self.name,
            description: self.description,
            category: self.category,
            manufacturer_id: self.manufacturer_id,
            metadata: self.metadata,
            updated_at: Some(Utc::now()),
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub product_id: Option<ProductId>,
    pub stakeholder_id: Option<StakeholderId>,
    pub event_type: String,
    pub location: Option<String>,
    /// When the custody action happened. Required.
    pub timestamp: Option<Timestamp>,
    pub metadata: Option<Metadata>,
    pub blockchain_hash: Option<String>,
}

impl CreateEventRequest {
    pub fn new(event_type: EventType, timestamp: Timestamp) -> Self {
        Self {
            event_type: event_type.as_str().to_owned(),
            timestamp: Some(timestamp),
            ..Self::default()
        }
    }

    pub fn for_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn by_stakeholder(mut self, stakeholder_id: StakeholderId) -> Self {
        self.stakeholder_id = Some(stakeholder_id);
        self
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Input contract only; existence and sequence are judged by the engine.
    pub fn into_proposed(self) -> KernelResult<ProposedEvent> {
        let event_type: EventType = self.event_type.parse()?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| KernelError::invalid_field("timestamp", "required"))?;
        validate::optional_max_len("location", self.location.as_deref(), MAX_LOCATION_LEN)?;
        validate::optional_max_len("blockchain_hash", self.blockchain_hash.as_deref(), MAX_HASH_LEN)?;

        Ok(ProposedEvent {
            product_id: self.product_id,
            stakeholder_id: self.stakeholder_id,
            event_type,
            location: self.location,
            timestamp,
            metadata: self.metadata,
            blockchain_hash: self.blockchain_hash,
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub event_id: Option<EventId>,
    pub transaction_hash: String,
    pub block_number: Option<i64>,
    pub gas_used: Option<i64>,
    /// Defaults to `pending`.
    pub status: Option<String>,
}

impl CreateTransactionRequest {
    pub fn new(transaction_hash: impl Into<String>) -> Self {
        Self {
            transaction_hash: transaction_hash.into(),
            ..Self::default()
        }
    }

    pub fn for_event(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn into_record(self) -> KernelResult<BlockchainTransaction> {
        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => TransactionStatus::default(),
        };
        validate::bounded("transaction_hash", &self.transaction_hash, MAX_HASH_LEN)?;

        Ok(BlockchainTransaction {
            id: TransactionId::new(),
            event_id: self.event_id,
            transaction_hash: self.transaction_hash,
            block_number: self.block_number,
            gas_used: self.gas_used,
            status,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// `page` must already be normalized.
    pub fn new(items: Vec<T>, total: u64, page: PageRequest) -> Self {
        let end = page.offset.saturating_add(page.limit) as u64;
        Self {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
            has_more: end < total,
        }
    }
}
