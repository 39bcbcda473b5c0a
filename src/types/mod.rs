// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod enums;

pub use enums::{EventType, StakeholderType, TransactionStatus};
pub use id::{EventId, ProductId, StakeholderId, TransactionId};

/// Opaque metadata document attached to products and events.
/// Stored and returned as-is; nothing in the kernel looks inside.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
