// crates/caresync-server/src/telemetry.rs
// ============================================================================
// Module: Server Telemetry
// Description: Observability hooks for the HTTP route layer.
// Purpose: Provide request counters and latency buckets without hard deps.
// Dependencies: none
// ============================================================================

//! ## Overview
//! A thin metrics interface for route counters and latency histograms. It is
//! intentionally dependency-light so deployments can plug in Prometheus or
//! OpenTelemetry without redesign. Labels carry only static route names and
//! status codes, never document contents or caller identity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for route histograms.
pub const ROUTE_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Events
// ============================================================================

/// One observed route request.
///
/// # Invariants
/// - `route` is a static route label, never a raw request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMetricEvent {
    /// Static label of the matched route.
    pub route: &'static str,
    /// Response status code.
    pub status: u16,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for route requests and latencies.
pub trait RequestMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: RouteMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: RouteMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl RequestMetrics for NoopMetrics {
    fn record_request(&self, _event: RouteMetricEvent) {}

    fn record_latency(&self, _event: RouteMetricEvent, _latency: Duration) {}
}
