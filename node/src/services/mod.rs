// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! `Engine` operations, one module per record kind.

mod ledger;
mod products;
mod stakeholders;
mod stats;
mod supply_chain;
