// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const EVENTS_RECORDED: &str = "custody_events_recorded_total";
pub const EVENTS_REJECTED: &str = "custody_events_rejected_total";
pub const EVENTS_VERIFIED: &str = "custody_events_verified_total";
pub const OPERATION_DURATION: &str = "custody_operation_duration_seconds";

/// Initialize telemetry (logs + metric descriptions).
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place. Metrics go to whatever recorder the host installs, if any.
pub fn init_telemetry() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("custody_node=info"));

    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    metrics::describe_counter!(EVENTS_RECORDED, "Custody events admitted and written");
    metrics::describe_counter!(EVENTS_REJECTED, "Custody event creations refused, by reason");
    metrics::describe_counter!(EVENTS_VERIFIED, "Verification writes applied to events");
    metrics::describe_histogram!(OPERATION_DURATION, "Wall time of engine operations, by op");
}
