// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! custody-kernel: the pure domain core of product custody tracking.
//!
//! Records, identifiers, the error taxonomy, event sequence policies, trace
//! assembly and statistics. Nothing here performs I/O; the node crate feeds
//! these types from its store.

pub mod config;
pub mod error;
pub mod types;
pub mod record;
pub mod event;
pub mod policy;
pub mod trace;
pub mod stats;
pub mod validate;

pub use error::{Entity, EnumField, KernelError, KernelResult, UniqueField};
pub use event::ProposedEvent;
pub use policy::{HistoryMembership, SequencePolicy, SequencePolicyKind, StrictLifecycle};
pub use record::{BlockchainTransaction, Product, Stakeholder, SupplyChainEvent};
pub use stats::{ProductStats, StakeholderStats};
pub use trace::Trace;

#[cfg(test)]
pub mod tests;
