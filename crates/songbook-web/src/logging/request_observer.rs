//! Request observer
//!
//! Emits one INFO line on the `request` logger for every completed request
//! except static assets:
//!
//! ```text
//! method: GET, path: /about, status: 200, ip: 203.0.113.5, host: localhost, params: {}, request_id: abc-123
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use songbook_core::{loggers, LogLevel, LoggerTaxonomy};

use super::interceptor::{RequestSnapshot, ResponseInterceptor};

/// Caller-supplied correlation header
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Proxy chain header; the first entry is the original client
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Placeholder when no address or host is known
const UNKNOWN: &str = "unknown";

/// Asset paths never logged: exact matches
const ASSET_PATHS: &[&str] = &["/favicon.ico"];
/// Asset paths never logged: prefixes
const ASSET_PREFIXES: &[&str] = &["/static", "/bootstrap"];

/// Static assets skip request logging
pub fn is_asset_path(path: &str) -> bool {
    ASSET_PATHS.contains(&path) || ASSET_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Client address: first `X-Forwarded-For` entry, else the socket peer.
pub fn client_ip(forwarded_for: Option<&str>, peer: Option<SocketAddr>) -> String {
    forwarded_for
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Host without its port suffix; `[::1]:5000` becomes `[::1]`.
pub fn host_name(host: &str) -> &str {
    let host = host.trim();
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Query string as key/value pairs. Repeated keys keep the first value;
/// an unparseable query yields no parameters.
pub fn query_params(query: Option<&str>) -> BTreeMap<String, String> {
    let pairs: Vec<(String, String)> = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    let mut params = BTreeMap::new();
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    params
}

/// Derived view over one request/response pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLogEntry {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub ip: String,
    pub host: String,
    pub params: BTreeMap<String, String>,
    pub request_id: Option<String>,
}

impl RequestLogEntry {
    pub fn from_exchange(request: &RequestSnapshot, status: StatusCode) -> Self {
        let host = request
            .header("host")
            .map(host_name)
            .or_else(|| request.uri.host())
            .unwrap_or(UNKNOWN)
            .to_string();

        Self {
            method: request.method.as_str().to_string(),
            path: request.path().to_string(),
            status: status.as_u16(),
            ip: client_ip(request.header(FORWARDED_FOR_HEADER), request.peer),
            host,
            params: query_params(request.uri.query()),
            request_id: request
                .header(REQUEST_ID_HEADER)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for RequestLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ");

        write!(
            f,
            "method: {}, path: {}, status: {}, ip: {}, host: {}, params: {{{}}}",
            self.method, self.path, self.status, self.ip, self.host, params
        )?;
        if let Some(id) = &self.request_id {
            write!(f, ", request_id: {}", id)?;
        }
        Ok(())
    }
}

/// Interceptor writing request lines to the `request` logger
pub struct RequestObserver {
    taxonomy: Arc<LoggerTaxonomy>,
}

impl RequestObserver {
    pub fn new(taxonomy: Arc<LoggerTaxonomy>) -> Self {
        Self { taxonomy }
    }
}

impl ResponseInterceptor for RequestObserver {
    fn name(&self) -> &'static str {
        "request_observer"
    }

    fn on_response(&self, request: &RequestSnapshot, response: Response) -> Response {
        if is_asset_path(request.path()) {
            return response;
        }

        let logger = self.taxonomy.logger(loggers::REQUEST);
        if logger.is_enabled_for(LogLevel::Info) {
            let entry = RequestLogEntry::from_exchange(request, response.status());
            logger.info(entry.to_string());
        }
        response
    }
}
