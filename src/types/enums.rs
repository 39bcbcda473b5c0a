// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Custody enums.
//!
//! Each enum parses from its lower-case literal and reports the matching
//! `InvalidEnum` kind on anything else.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{EnumField, KernelError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderType {
    Manufacturer,
    Distributor,
    Retailer,
}

impl StakeholderType {
    pub const ALL: [StakeholderType; 3] = [
        StakeholderType::Manufacturer,
        StakeholderType::Distributor,
        StakeholderType::Retailer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StakeholderType::Manufacturer => "manufacturer",
            StakeholderType::Distributor => "distributor",
            StakeholderType::Retailer => "retailer",
        }
    }
}

impl FromStr for StakeholderType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(KernelError::invalid_enum(EnumField::StakeholderType))
    }
}

impl fmt::Display for StakeholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custody action recorded by a [`SupplyChainEvent`](crate::record::SupplyChainEvent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Manufactured,
    Shipped,
    Received,
    Sold,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Manufactured,
        EventType::Shipped,
        EventType::Received,
        EventType::Sold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Manufactured => "manufactured",
            EventType::Shipped => "shipped",
            EventType::Received => "received",
            EventType::Sold => "sold",
        }
    }
}

impl FromStr for EventType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(KernelError::invalid_enum(EnumField::EventType))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Confirmed,
        TransactionStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

impl FromStr for TransactionStatus {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(KernelError::invalid_enum(EnumField::TransactionStatus))
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
