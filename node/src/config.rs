// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::Duration;

use custody_kernel::config::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use custody_kernel::SequencePolicyKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Node configuration.
///
/// Built once and handed to the engine behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub sequence_policy: SequencePolicyKind,
    /// Serialize event creation per product. Off reproduces the
    /// read-then-write race between concurrent creators.
    pub serialize_event_writes: bool,
    /// Deadline applied when the caller does not supply one. `None` waits forever.
    pub operation_timeout: Option<Duration>,
    pub default_page_limit: usize,
    /// Key callers must present to `Engine::authorize`. `None` disables the check.
    pub api_key: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            sequence_policy: SequencePolicyKind::HistoryMembership,
            serialize_event_writes: true,
            operation_timeout: Some(Duration::from_secs(10)),
            default_page_limit: DEFAULT_PAGE_LIMIT,
            api_key: None,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `CUSTODY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("CUSTODY_SEQUENCE_POLICY") {
            cfg.sequence_policy = v.parse().map_err(|e: custody_kernel::KernelError| {
                ConfigError::Invalid {
                    var: "CUSTODY_SEQUENCE_POLICY",
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(v) = lookup("CUSTODY_SERIALIZE_EVENT_WRITES") {
            cfg.serialize_event_writes = parse_bool("CUSTODY_SERIALIZE_EVENT_WRITES", &v)?;
        }

        if let Some(v) = lookup("CUSTODY_OP_TIMEOUT_MS") {
            let ms: u64 = v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "CUSTODY_OP_TIMEOUT_MS",
                reason: format!("expected milliseconds, got `{}`", v),
            })?;
            // 0 disables the default deadline
            cfg.operation_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Some(v) = lookup("CUSTODY_PAGE_LIMIT") {
            let limit: usize = v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "CUSTODY_PAGE_LIMIT",
                reason: format!("expected a positive integer, got `{}`", v),
            })?;
            if limit == 0 || limit > MAX_PAGE_LIMIT {
                return Err(ConfigError::Invalid {
                    var: "CUSTODY_PAGE_LIMIT",
                    reason: format!("must be between 1 and {}", MAX_PAGE_LIMIT),
                });
            }
            cfg.default_page_limit = limit;
        }

        if let Some(v) = lookup("CUSTODY_API_KEY") {
            if !v.is_empty() {
                cfg.api_key = Some(v);
            }
        }

        Ok(cfg)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("expected a boolean, got `{}`", value),
        }),
    }
}
