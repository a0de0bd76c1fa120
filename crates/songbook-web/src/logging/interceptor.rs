//! Response interceptors
//!
//! Interceptors see every completed response together with a snapshot of
//! the request that produced it. They run synchronously, in order, after the
//! handler (and every inner layer) has finished and before the response
//! leaves the server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderMap, Method, Uri};

/// Owned view of the request, captured before the handler consumes it
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Socket peer, when the server was started with connect info
    pub peer: Option<SocketAddr>,
}

impl RequestSnapshot {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            peer: None,
        }
    }

    pub fn from_request(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
            peer: request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0),
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Header value as text; missing or non-UTF-8 values are `None`
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Hook invoked once per completed request
pub trait ResponseInterceptor: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Inspect (and optionally replace) the response
    fn on_response(&self, request: &RequestSnapshot, response: Response) -> Response;
}

/// Fixed, ordered list of interceptors built at server construction
#[derive(Clone, Default)]
pub struct InterceptorPipeline {
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl InterceptorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Interceptor names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    pub fn run(&self, request: &RequestSnapshot, response: Response) -> Response {
        self.interceptors
            .iter()
            .fold(response, |response, interceptor| {
                interceptor.on_response(request, response)
            })
    }
}

/// Middleware driving the pipeline
pub async fn intercept_responses(
    State(pipeline): State<Arc<InterceptorPipeline>>,
    request: Request,
    next: Next,
) -> Response {
    let snapshot = RequestSnapshot::from_request(&request);
    let response = next.run(request).await;
    pipeline.run(&snapshot, response)
}
