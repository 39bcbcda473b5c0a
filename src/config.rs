// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Page size used when a listing asks for zero items.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Upper bound on a single page.
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Maximum length of a product SKU.
pub const MAX_SKU_LEN: usize = 100;

/// Maximum length of stakeholder and product names.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a product category.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Maximum length of a wallet address (0x + 40 hex digits).
pub const MAX_WALLET_LEN: usize = 42;

/// Maximum length of a ledger hash (0x + 64 hex digits).
pub const MAX_HASH_LEN: usize = 66;

/// Maximum length of an event location.
pub const MAX_LOCATION_LEN: usize = 255;

/// Maximum length of a phone number.
pub const MAX_PHONE_LEN: usize = 20;

/// Maximum length of an email address.
pub const MAX_EMAIL_LEN: usize = 255;
