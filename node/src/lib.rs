// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! custody-node: async service layer over `custody-kernel`.

pub mod api;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod guard;
pub mod services;
pub mod store;
pub mod telemetry;

pub use config::NodeConfig;
pub use context::OpContext;
pub use engine::Engine;
pub use errors::{EngineError, EngineResult};
