// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.
//!
//! Every record kind gets its own newtype over a random UUID so that a
//! product id can never be passed where an event id is expected.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Fresh random (v4) identifier.
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                $name(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map($name)
            }
        }
    };
}

define_id!(
    /// Identifies a [`Stakeholder`](crate::record::Stakeholder).
    StakeholderId
);
define_id!(
    /// Identifies a [`Product`](crate::record::Product).
    ProductId
);
define_id!(
    /// Identifies a [`SupplyChainEvent`](crate::record::SupplyChainEvent).
    EventId
);
define_id!(
    /// Identifies a [`BlockchainTransaction`](crate::record::BlockchainTransaction).
    TransactionId
);
