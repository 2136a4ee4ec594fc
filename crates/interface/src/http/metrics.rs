//! Métricas Prometheus de la capa HTTP
//!
//! Registra un contador de peticiones y un histograma de latencias por
//! método y ruta, y los expone en formato de texto plano en `/metrics`.

use super::AppState;
use axum::extract::{MatchedPath, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Instant;

const NAMESPACE: &str = "denda";

/// Registro central; agrupa las familias de métricas y el `Registry`
pub struct MetricsRegistry {
    registry: Registry,
    pub http: HttpMetrics,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let http = HttpMetrics::register(&registry)?;
        Ok(Self { registry, http })
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

/// Métricas del servidor HTTP
#[derive(Clone)]
pub struct HttpMetrics {
    pub requests_total: IntCounterVec,
    pub request_duration: HistogramVec,
}

impl HttpMetrics {
    fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = IntCounterVec::new(
            Opts::new(
                format!("{}_http_requests_total", NAMESPACE),
                "Total HTTP requests by method, route and status code",
            ),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                format!("{}_http_request_duration_seconds", NAMESPACE),
                "HTTP request duration in seconds by method and route",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["method", "path"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            requests_total,
            request_duration,
        })
    }

    pub fn observe(&self, method: &str, path: &str, status: &str, seconds: f64) {
        self.requests_total
            .with_label_values(&[method, path, status])
            .inc();
        self.request_duration
            .with_label_values(&[method, path])
            .observe(seconds);
    }
}

/// Middleware de instrumentación; usa la plantilla de ruta para no
/// disparar la cardinalidad con los IDs
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    state
        .metrics
        .http
        .observe(&method, &path, &status, start.elapsed().as_secs_f64());

    response
}

pub async fn export(State(state): State<AppState>) -> Response {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            buffer,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "encode failure").into_response()
        }
    }
}
