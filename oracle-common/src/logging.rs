//! Logging utilities for Oracle services.
//!
//! Structured logging via `tracing`, with JSON or human-readable output.
//!
//! # Noise Filtering
//!
//! Noisy library modules (hyper, reqwest, h2, rustls, tower_http) are set to
//! `warn` so the request flow of the presentation layer stays readable.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Default noisy modules that should be filtered to warn level.
pub const NOISY_MODULES: &[&str] = &[
    "hyper",
    "hyper_util",
    "reqwest",
    "h2",
    "rustls",
    "tokio_util",
    "tower_http",
];

/// Header carrying the trace ID to the remote analysis service.
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Build the filter directives string for a base level plus exclusions.
fn build_directives(log_level: &str, excluded_targets: &[String]) -> String {
    let mut directives = String::from(log_level);

    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }

    for target in excluded_targets {
        directives.push_str(&format!(",{}=warn", target));
    }

    directives
}

/// Initialize logging with the given configuration.
///
/// # Arguments
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - Output format: "json" for structured JSON, "pretty" for human-readable
///
/// `RUST_LOG` overrides the computed filter when set.
pub fn init_logging(log_level: &str, log_format: &str) {
    init_logging_with_exclusions(log_level, log_format, &[]);
}

/// Initialize logging with custom excluded targets.
///
/// Like `init_logging`, but allows specifying additional modules to exclude.
pub fn init_logging_with_exclusions(
    log_level: &str,
    log_format: &str,
    excluded_targets: &[String],
) {
    let directives = build_directives(log_level, excluded_targets);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so rendered output on stdout stays pipeable.
    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = %log_format,
        noise_filtered = NOISY_MODULES.len() + excluded_targets.len(),
        "Logging initialized"
    );
}

/// Generate a new trace ID for request tracing.
pub fn generate_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a new span ID for step tracing.
pub fn generate_span_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

// ============================================================================
// Request Context
// ============================================================================

/// Trace identity of one analysis request.
///
/// The trace ID travels to the analysis service in [`TRACE_ID_HEADER`] so
/// both sides log the same ID.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub trace_id: String,
    pub span_id: String,
    /// Component that issued the request
    pub service: String,
}

impl RequestContext {
    /// Fresh context for the default `oracle` component.
    pub fn new() -> Self {
        Self::for_service("oracle")
    }

    /// Fresh context for a named component.
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            trace_id: generate_trace_id(),
            span_id: generate_span_id(),
            service: service.into(),
        }
    }

    /// Continue the caller's trace when the request carries one.
    pub fn from_headers(headers: &http::HeaderMap, service: impl Into<String>) -> Self {
        let trace_id = headers
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(generate_trace_id, String::from);

        Self {
            trace_id,
            ..Self::for_service(service)
        }
    }

    /// Headers to send with an outbound request.
    pub fn to_headers(&self) -> http::HeaderMap {
        let mut headers = http::HeaderMap::new();
        if let Ok(trace_id) = http::HeaderValue::from_str(&self.trace_id) {
            headers.insert(TRACE_ID_HEADER, trace_id);
        }
        headers
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a tracing span for calls to the remote analysis service.
///
/// # Example
///
/// ```ignore
/// let span = api_call_span!(ctx.trace_id, endpoint = "/api/analyze", method = "POST");
/// let _enter = span.enter();
/// ```
#[macro_export]
macro_rules! api_call_span {
    ($trace_id:expr, $($field:tt)*) => {
        tracing::info_span!("api_call", trace_id = %$trace_id, $($field)*)
    };
}
