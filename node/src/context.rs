// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-operation deadline and cancellation.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{EngineError, EngineResult};

#[derive(Clone, Debug, Default)]
pub struct OpContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl OpContext {
    /// No deadline and a fresh token.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Ties this operation to an externally owned token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drives `work` until it finishes, the token fires or the deadline passes.
    ///
    /// Dropping `work` part way is safe because every store mutation is a
    /// single call.
    pub async fn run<F, T>(&self, work: F) -> EngineResult<T>
    where
        F: Future<Output = EngineResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        // timeout_at polls the inner future first, so an elapsed deadline
        // has to be caught here.
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(EngineError::DeadlineExceeded);
            }
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, work).await {
                    Ok(result) => result,
                    Err(_) => Err(EngineError::DeadlineExceeded),
                },
                None => work.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(EngineError::Cancelled),
            result = bounded => result,
        }
    }
}
