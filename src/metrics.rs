//! Prometheus metrics: the HTTP middleware, the `/metrics` listener and the
//! business counters the services bump.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use campus_config::ServerConfig;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Reads `OBSERVABILITY_ENABLED` once; on by default.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| ServerConfig::from_env().observability_enabled)
}

/// Installs the Prometheus recorder and its upkeep task. `None` when metrics are
/// disabled or the recorder cannot be installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .and_then(|builder| builder.install_recorder());

    let handle = match handle {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            return None;
        }
    };

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for the metrics listener.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// `kind` is `student` or `employee`.
pub fn track_account_created(kind: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("accounts_created_total", "kind" => kind.to_string()).increment(1);
}

pub fn track_login_success(kind: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("logins_total", "kind" => kind.to_string(), "status" => "success").increment(1);
}

pub fn track_login_failure(kind: &str, reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!(
        "logins_total",
        "kind" => kind.to_string(),
        "status" => "failure",
        "reason" => reason.to_string()
    )
    .increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}

/// `stage` is `requested` or `completed`.
pub fn track_password_reset(stage: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("password_resets_total", "stage" => stage.to_string()).increment(1);
}

pub fn track_email_delivery(status: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("emails_total", "status" => status.to_string()).increment(1);
}

pub fn track_authorization_check(allowed: bool, permission: &str) {
    if !is_observability_enabled() {
        return;
    }
    let status = if allowed { "allowed" } else { "denied" };
    counter!(
        "authorization_checks_total",
        "permission" => permission.to_string(),
        "status" => status
    )
    .increment(1);
}
