// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use custody_kernel::{Entity, KernelError};
use thiserror::Error;

use crate::store::{StoreError, StoreResult};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("storage failure while {context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

impl EngineError {
    pub fn kernel(&self) -> Option<&KernelError> {
        match self {
            EngineError::Kernel(k) => Some(k),
            _ => None,
        }
    }

    pub fn is_not_found(&self, entity: Entity) -> bool {
        matches!(self, EngineError::Kernel(KernelError::NotFound { entity: e }) if *e == entity)
    }

    /// Label used for the rejection counter.
    pub fn reason(&self) -> &'static str {
        match self {
            EngineError::Kernel(KernelError::NotFound { .. }) => "not_found",
            EngineError::Kernel(KernelError::Duplicate { .. }) => "duplicate",
            EngineError::Kernel(KernelError::InvalidEnum { .. }) => "invalid_enum",
            EngineError::Kernel(KernelError::InvalidEventSequence) => "invalid_event_sequence",
            EngineError::Kernel(KernelError::Unauthorized) => "unauthorized",
            EngineError::Kernel(KernelError::InvalidField { .. }) => "invalid_field",
            EngineError::Storage { .. } => "storage",
            EngineError::Cancelled => "cancelled",
            EngineError::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Translation of store outcomes into the caller-facing taxonomy.
pub trait StoreResultExt<T> {
    /// A missing record becomes `NotFound` for `entity`.
    fn or_not_found(self, entity: Entity, context: &'static str) -> EngineResult<T>;

    /// Constraint violations become their kernel kinds; the rest is wrapped.
    fn context(self, context: &'static str) -> EngineResult<T>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn or_not_found(self, entity: Entity, context: &'static str) -> EngineResult<T> {
        match self {
            Err(StoreError::NotFound) => Err(KernelError::not_found(entity).into()),
            other => other.context(context),
        }
    }

    fn context(self, context: &'static str) -> EngineResult<T> {
        self.map_err(|source| match source {
            StoreError::UniqueViolation(field) => KernelError::duplicate(field).into(),
            StoreError::ForeignKey(entity) => KernelError::not_found(entity).into(),
            source => EngineError::Storage { context, source },
        })
    }
}

/// `true` when a natural-key lookup found a record, `false` when it did not.
pub fn is_taken<T>(lookup: StoreResult<T>, context: &'static str) -> EngineResult<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(StoreError::NotFound) => Ok(false),
        Err(source) => Err(EngineError::Storage { context, source }),
    }
}
