// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{engine, product, slow_engine, t};
use custody_kernel::types::EventType;
use custody_kernel::KernelError;
use custody_node::api::CreateEventRequest;
use custody_node::guard::{KeyedLocks, SequenceGuard};
use custody_node::{EngineError, NodeConfig, OpContext};
use tokio_util::sync::CancellationToken;

fn manufactured(product_id: custody_kernel::types::ProductId) -> CreateEventRequest {
    CreateEventRequest::new(EventType::Manufactured, t(0)).for_product(product_id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_manufacture_single_winner() {
    let engine = Arc::new(slow_engine(NodeConfig::default(), Duration::from_millis(50)));
    let p = product(&engine, "SKU-1", None).await;
    let product_id = p.id;

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let ctx = engine.context();
                engine.create_event(&ctx, manufactured(product_id)).await
            })
        })
        .collect();

    let mut ok = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => ok += 1,
            Err(EngineError::Kernel(KernelError::InvalidEventSequence)) => rejected += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!((ok, rejected), (1, 1));

    let history = engine.events_by_product(&engine.context(), p.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_unserialized_writes_reproduce_race() {
    let config = NodeConfig {
        serialize_event_writes: false,
        ..NodeConfig::default()
    };
    let engine = slow_engine(config, Duration::from_millis(50));
    let p = product(&engine, "SKU-1", None).await;

    let ctx = engine.context();
    let (a, b) = tokio::join!(
        engine.create_event(&ctx, manufactured(p.id)),
        engine.create_event(&ctx, manufactured(p.id)),
    );
    assert!(a.is_ok() && b.is_ok());

    let history = engine.events_by_product(&ctx, p.id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_keyed_locks_release_entries() {
    let locks = KeyedLocks::new();
    let a = custody_kernel::types::ProductId::new();
    let b = custody_kernel::types::ProductId::new();

    let permit = locks.acquire(a).await;
    assert!(permit.is_exclusive());
    drop(permit);

    let _held = locks.acquire(b).await;
    // `a` was idle and is pruned when `b` is acquired
    assert_eq!(locks.tracked().await, 1);
}

#[tokio::test]
async fn test_cancelled_token_short_circuits() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;

    let token = CancellationToken::new();
    token.cancel();
    let ctx = OpContext::new().with_cancellation(token);
    let err = engine.create_event(&ctx, manufactured(p.id)).await.unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));

    let history = engine.events_by_product(&engine.context(), p.id).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_elapsed_deadline_short_circuits() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;

    let ctx = OpContext::new().with_timeout(Duration::ZERO);
    let err = engine.get_product(&ctx, p.id).await.unwrap_err();
    assert!(matches!(err, EngineError::DeadlineExceeded));
}

#[tokio::test]
async fn test_deadline_during_history_read_writes_nothing() {
    let engine = slow_engine(NodeConfig::default(), Duration::from_millis(200));
    let p = product(&engine, "SKU-1", None).await;

    let ctx = OpContext::new().with_timeout(Duration::from_millis(20));
    let err = engine.create_event(&ctx, manufactured(p.id)).await.unwrap_err();
    assert!(matches!(err, EngineError::DeadlineExceeded));

    let history = engine.events_by_product(&engine.context(), p.id).await.unwrap();
    assert!(history.is_empty());

    // The permit was released with the abandoned operation
    let ctx = OpContext::new().with_timeout(Duration::from_secs(5));
    engine.create_event(&ctx, manufactured(p.id)).await.unwrap();
}

#[tokio::test]
async fn test_cancellation_during_history_read() {
    let engine = slow_engine(NodeConfig::default(), Duration::from_millis(200));
    let p = product(&engine, "SKU-1", None).await;

    let token = CancellationToken::new();
    let ctx = OpContext::new().with_cancellation(token.clone());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let err = engine.create_event(&ctx, manufactured(p.id)).await.unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
    canceller.await.unwrap();

    let history = engine.events_by_product(&engine.context(), p.id).await.unwrap();
    assert!(history.is_empty());
}
