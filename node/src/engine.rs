// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::future::Future;
use std::sync::Arc;

use custody_kernel::config::MAX_PAGE_LIMIT;
use custody_kernel::{KernelError, SequencePolicy};

use crate::config::NodeConfig;
use crate::context::OpContext;
use crate::errors::EngineResult;
use crate::guard::{self, SequenceGuard};
use crate::store::{PageRequest, Repositories};
use crate::telemetry::OPERATION_DURATION;

/// Entry point for every custody operation.
///
/// Operations live in `crate::services`, grouped by record kind. Each one
/// takes an `OpContext` and runs under its deadline and cancellation token.
pub struct Engine {
    config: Arc<NodeConfig>,
    pub(crate) policy: Box<dyn SequencePolicy>,
    pub(crate) guard: Arc<dyn SequenceGuard>,
    pub(crate) repos: Repositories,
}

impl Engine {
    pub fn new(config: NodeConfig, repos: Repositories) -> Self {
        let policy = config.sequence_policy.build();
        let guard = guard::for_config(config.serialize_event_writes);

        if config.api_key.is_none() {
            tracing::warn!("No API key configured; authorization is disabled");
        }
        if !config.serialize_event_writes {
            tracing::warn!("Event writes are not serialized per product");
        }
        tracing::info!(
            policy = policy.name(),
            page_limit = config.default_page_limit,
            "Engine initialized"
        );

        Self {
            config: Arc::new(config),
            policy,
            guard,
            repos,
        }
    }

    pub fn in_memory(config: NodeConfig) -> Self {
        Self::new(config, Repositories::memory())
    }

    /// Replaces the serialization guard chosen from configuration.
    pub fn with_guard(mut self, guard: Arc<dyn SequenceGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Fresh context carrying the configured default deadline.
    pub fn context(&self) -> OpContext {
        match self.config.operation_timeout {
            Some(timeout) => OpContext::new().with_timeout(timeout),
            None => OpContext::new(),
        }
    }

    /// `Unauthorized` unless the presented key matches the configured one.
    pub fn authorize(&self, presented: Option<&str>) -> EngineResult<()> {
        match self.config.api_key.as_deref() {
            None => Ok(()),
            Some(expected) if presented == Some(expected) => Ok(()),
            Some(_) => {
                tracing::warn!(key_present = presented.is_some(), "Rejected API key");
                Err(KernelError::Unauthorized.into())
            }
        }
    }

    pub(crate) fn page(&self, page: PageRequest) -> PageRequest {
        page.normalized(self.config.default_page_limit, MAX_PAGE_LIMIT)
    }

    /// Runs `work` under `ctx` and records its duration.
    pub(crate) async fn bounded<F, T>(
        &self,
        ctx: &OpContext,
        op: &'static str,
        work: F,
    ) -> EngineResult<T>
    where
        F: Future<Output = EngineResult<T>>,
    {
        let started = std::time::Instant::now();
        let result = ctx.run(work).await;
        metrics::histogram!(OPERATION_DURATION, started.elapsed().as_secs_f64(), "op" => op);
        if let Err(e) = &result {
            tracing::debug!(op, reason = e.reason(), "Operation failed: {}", e);
        }
        result
    }
}
