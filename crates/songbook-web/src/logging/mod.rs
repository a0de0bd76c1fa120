//! Request logging infrastructure
//!
//! - Response interceptor pipeline (request observer, error reporter)
//! - Tracing bridge routing `tracing` events into the logger taxonomy
//! - Process-wide subscriber installation

mod bridge;
mod error_reporter;
mod interceptor;
mod request_observer;

use std::sync::Arc;

use songbook_core::LoggerTaxonomy;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use bridge::{logger_for_target, TaxonomyLayer};
pub use error_reporter::{not_found, server_error, ErrorReporter, FailureReport, PanicReporter};
pub use interceptor::{
    intercept_responses, InterceptorPipeline, RequestSnapshot, ResponseInterceptor,
};
pub use request_observer::{
    client_ip, host_name, is_asset_path, query_params, RequestLogEntry, RequestObserver,
    FORWARDED_FOR_HEADER, REQUEST_ID_HEADER,
};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "debug";

/// Install the global subscriber: `RUST_LOG` (or `default_filter`) in front
/// of the taxonomy bridge. Fails if a global subscriber is already set.
pub fn init_tracing(taxonomy: Arc<LoggerTaxonomy>, default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(TaxonomyLayer::new(taxonomy))
        .try_init()?;

    Ok(())
}

/// Standard pipeline: report failures first, then log the request line
pub fn standard_pipeline(taxonomy: Arc<LoggerTaxonomy>) -> InterceptorPipeline {
    InterceptorPipeline::new()
        .with(ErrorReporter::new(taxonomy.clone()))
        .with(RequestObserver::new(taxonomy))
}
