// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.
//!
//! `KernelError` is the taxonomy every caller above the core sees. It names a
//! *kind* of failure plus the entity or field involved, never a storage detail.

use core::fmt;
use thiserror::Error;

/// Record kinds, used to qualify `NotFound`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Stakeholder,
    Product,
    Event,
    Transaction,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Stakeholder => "stakeholder",
            Entity::Product => "product",
            Entity::Event => "event",
            Entity::Transaction => "transaction",
        };
        f.write_str(name)
    }
}

/// Fields carrying a uniqueness constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Email,
    Sku,
    WalletAddress,
    TransactionHash,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniqueField::Email => "email",
            UniqueField::Sku => "SKU",
            UniqueField::WalletAddress => "wallet address",
            UniqueField::TransactionHash => "transaction hash",
        };
        f.write_str(name)
    }
}

/// Fields restricted to an enumerated set of literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnumField {
    StakeholderType,
    EventType,
    TransactionStatus,
}

impl fmt::Display for EnumField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnumField::StakeholderType => "stakeholder type",
            EnumField::EventType => "event type",
            EnumField::TransactionStatus => "transaction status",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("{entity} not found")]
    NotFound { entity: Entity },

    #[error("{field} already exists")]
    Duplicate { field: UniqueField },

    #[error("invalid {field}")]
    InvalidEnum { field: EnumField },

    #[error("invalid event sequence")]
    InvalidEventSequence,

    #[error("unauthorized access")]
    Unauthorized,

    /// Input contract violation (syntax, length, missing value).
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl KernelError {
    pub fn not_found(entity: Entity) -> Self {
        KernelError::NotFound { entity }
    }

    pub fn duplicate(field: UniqueField) -> Self {
        KernelError::Duplicate { field }
    }

    pub fn invalid_enum(field: EnumField) -> Self {
        KernelError::InvalidEnum { field }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        KernelError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type Result<T> = KernelResult<T>;
