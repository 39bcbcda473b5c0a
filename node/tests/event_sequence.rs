// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use common::{engine, engine_with, manufacturer, product, record, stakeholder, t};
use custody_kernel::types::{EventType, ProductId, StakeholderId};
use custody_kernel::{Entity, EnumField, KernelError, SequencePolicyKind};
use custody_node::api::CreateEventRequest;
use custody_node::{EngineError, NodeConfig};

fn kernel_err(err: EngineError) -> KernelError {
    match err {
        EngineError::Kernel(k) => k,
        other => panic!("expected kernel error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_first_manufacture_then_repeat_rejected() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;

    record(&engine, p.id, EventType::Manufactured, t(0)).await.unwrap();
    let err = record(&engine, p.id, EventType::Manufactured, t(5)).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);
}

#[tokio::test]
async fn test_shipped_requires_manufactured_or_received() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;

    let err = record(&engine, p.id, EventType::Shipped, t(0)).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);

    record(&engine, p.id, EventType::Manufactured, t(1)).await.unwrap();
    record(&engine, p.id, EventType::Shipped, t(2)).await.unwrap();
}

#[tokio::test]
async fn test_received_and_sold_prerequisites() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;
    record(&engine, p.id, EventType::Manufactured, t(0)).await.unwrap();

    let err = record(&engine, p.id, EventType::Received, t(1)).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);
    let err = record(&engine, p.id, EventType::Sold, t(1)).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);

    record(&engine, p.id, EventType::Shipped, t(2)).await.unwrap();
    record(&engine, p.id, EventType::Received, t(3)).await.unwrap();
    record(&engine, p.id, EventType::Sold, t(4)).await.unwrap();
}

#[tokio::test]
async fn test_repeated_sales_admitted_by_default_policy() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;
    for (i, ty) in [EventType::Manufactured, EventType::Shipped, EventType::Received]
        .into_iter()
        .enumerate()
    {
        record(&engine, p.id, ty, t(i as i64)).await.unwrap();
    }

    record(&engine, p.id, EventType::Sold, t(10)).await.unwrap();
    record(&engine, p.id, EventType::Sold, t(11)).await.unwrap();
    record(&engine, p.id, EventType::Sold, t(12)).await.unwrap();

    let trace = engine.get_trace(&engine.context(), p.id).await.unwrap();
    assert_eq!(trace.len(), 6);
}

#[tokio::test]
async fn test_reshipment_after_receipt() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;
    record(&engine, p.id, EventType::Manufactured, t(0)).await.unwrap();
    record(&engine, p.id, EventType::Shipped, t(1)).await.unwrap();
    record(&engine, p.id, EventType::Received, t(2)).await.unwrap();
    record(&engine, p.id, EventType::Shipped, t(3)).await.unwrap();
}

#[tokio::test]
async fn test_invalid_event_type_and_missing_timestamp() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;
    let ctx = engine.context();

    let mut req = CreateEventRequest::new(EventType::Manufactured, t(0)).for_product(p.id);
    req.event_type = "teleported".into();
    let err = engine.create_event(&ctx, req).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::invalid_enum(EnumField::EventType));

    let mut req = CreateEventRequest::new(EventType::Manufactured, t(0)).for_product(p.id);
    req.timestamp = None;
    let err = engine.create_event(&ctx, req).await.unwrap_err();
    assert!(matches!(
        kernel_err(err),
        KernelError::InvalidField { field: "timestamp", .. }
    ));
}

#[tokio::test]
async fn test_unknown_product_and_stakeholder() {
    let engine = engine();
    let ctx = engine.context();

    let req = CreateEventRequest::new(EventType::Manufactured, t(0)).for_product(ProductId::new());
    let err = engine.create_event(&ctx, req).await.unwrap_err();
    assert!(err.is_not_found(Entity::Product));

    let p = product(&engine, "SKU-1", None).await;
    let req = CreateEventRequest::new(EventType::Manufactured, t(0))
        .for_product(p.id)
        .by_stakeholder(StakeholderId::new());
    let err = engine.create_event(&ctx, req).await.unwrap_err();
    assert!(err.is_not_found(Entity::Stakeholder));
}

#[tokio::test]
async fn test_event_without_product_skips_sequence_check() {
    let engine = engine();
    let ctx = engine.context();

    // Sold with no history would be rejected if a product were named
    let req = CreateEventRequest::new(EventType::Sold, t(0)).at_location("Warehouse 7");
    let event = engine.create_event(&ctx, req).await.unwrap();
    assert_eq!(event.product_id, None);
    assert!(!event.is_verified);
}

#[tokio::test]
async fn test_validate_event_sequence_is_a_dry_run() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;
    let ctx = engine.context();

    let req = CreateEventRequest::new(EventType::Manufactured, t(0)).for_product(p.id);
    engine.validate_event_sequence(&ctx, req.clone()).await.unwrap();
    engine.validate_event_sequence(&ctx, req).await.unwrap();

    let events = engine.events_by_product(&ctx, p.id).await.unwrap();
    assert!(events.is_empty());

    let req = CreateEventRequest::new(EventType::Sold, t(0)).for_product(p.id);
    let err = engine.validate_event_sequence(&ctx, req).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);
}

#[tokio::test]
async fn test_trace_orders_by_occurrence_not_creation() {
    let engine = engine();
    let p = product(&engine, "SKU-1", None).await;

    // Written out of order; membership policy ignores timestamps
    record(&engine, p.id, EventType::Manufactured, t(30)).await.unwrap();
    record(&engine, p.id, EventType::Shipped, t(10)).await.unwrap();
    record(&engine, p.id, EventType::Received, t(20)).await.unwrap();

    let trace = engine.get_trace(&engine.context(), p.id).await.unwrap();
    let stamps: Vec<_> = trace.events.iter().map(|e| e.timestamp).collect();
    assert_eq!(stamps, vec![t(10), t(20), t(30)]);
    assert_eq!(trace.product.id, p.id);
}

#[tokio::test]
async fn test_trace_for_missing_product() {
    let engine = engine();
    let err = engine
        .get_trace(&engine.context(), ProductId::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found(Entity::Product));
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let engine = engine();
    let ctx = engine.context();

    let m = manufacturer(&engine, "m@factory.example").await;
    let p = product(&engine, "ABC-1", Some(m.id)).await;
    assert_eq!(p.manufacturer_id, Some(m.id));

    let e1 = record(&engine, p.id, EventType::Manufactured, t(1)).await.unwrap();
    let e2 = record(&engine, p.id, EventType::Shipped, t(2)).await.unwrap();
    let err = record(&engine, p.id, EventType::Manufactured, t(3)).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);

    let trace = engine.get_trace(&ctx, p.id).await.unwrap();
    let ids: Vec<_> = trace.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![e1.id, e2.id]);
    assert_eq!(trace.events[0].event_type, EventType::Manufactured);
    assert_eq!(trace.events[1].event_type, EventType::Shipped);

    let stats = engine.product_stats(&ctx, p.id).await.unwrap();
    assert_eq!(stats.total_events, 2);
    assert_eq!(stats.verified_events, 0);
    assert_eq!(stats.last_activity, Some(t(2)));
}

#[tokio::test]
async fn test_strict_lifecycle_selected_by_config() {
    let engine = engine_with(NodeConfig {
        sequence_policy: SequencePolicyKind::StrictLifecycle,
        ..NodeConfig::default()
    });
    assert_eq!(engine.policy_name(), "strict_lifecycle");

    let p = product(&engine, "SKU-1", None).await;
    record(&engine, p.id, EventType::Manufactured, t(0)).await.unwrap();
    record(&engine, p.id, EventType::Shipped, t(10)).await.unwrap();
    record(&engine, p.id, EventType::Received, t(20)).await.unwrap();

    // Stale
    let err = record(&engine, p.id, EventType::Shipped, t(15)).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);

    record(&engine, p.id, EventType::Sold, t(30)).await.unwrap();
    let err = record(&engine, p.id, EventType::Sold, t(40)).await.unwrap_err();
    assert_eq!(kernel_err(err), KernelError::InvalidEventSequence);
}

#[tokio::test]
async fn test_events_by_stakeholder_newest_write_first() {
    let engine = engine();
    let ctx = engine.context();
    let carrier = stakeholder(&engine, "distributor", "carrier@example.com").await;
    let p = product(&engine, "SKU-1", None).await;

    let first = engine
        .create_event(
            &ctx,
            CreateEventRequest::new(EventType::Manufactured, t(50)).for_product(p.id),
        )
        .await
        .unwrap();
    let shipped = engine
        .create_event(
            &ctx,
            CreateEventRequest::new(EventType::Shipped, t(0))
                .for_product(p.id)
                .by_stakeholder(carrier.id),
        )
        .await
        .unwrap();
    let received = engine
        .create_event(
            &ctx,
            CreateEventRequest::new(EventType::Received, t(5))
                .for_product(p.id)
                .by_stakeholder(carrier.id),
        )
        .await
        .unwrap();

    let mine = engine.events_by_stakeholder(&ctx, carrier.id).await.unwrap();
    let ids: Vec<_> = mine.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![received.id, shipped.id]);
    assert!(!ids.contains(&first.id));

    let err = engine
        .events_by_stakeholder(&ctx, StakeholderId::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found(Entity::Stakeholder));
}
