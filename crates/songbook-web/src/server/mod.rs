//! Songbook Server
//!
//! Router assembly and the HTTP server lifecycle. Every response passes
//! through the interceptor pipeline (error reporter, then request observer)
//! before it is sent.

mod dependencies;
mod startup;
mod state;

pub use dependencies::{DependenciesBuilder, SongbookDependencies};
pub use startup::{build_server, install_logging, open_database};
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers::{api, auth, health, map, pages, songs};
use crate::logging::{intercept_responses, not_found, standard_pipeline, PanicReporter};

const STYLESHEET: &str = "body { font-family: sans-serif; margin: 2rem; }\nnav a { margin-right: 1rem; }\ntable { border-collapse: collapse; }\nth, td { padding: 0.25rem 0.75rem; text-align: left; }\n.error { color: #b00020; }\n";

async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

/// Application routes, without the logging layers
pub fn routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::OPTIONS, Method::GET, Method::POST]);

    let api_routes = Router::new()
        .route("/songs", get(api::songs))
        .route("/locations", get(api::locations))
        .layer(cors);

    Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/welcome", get(pages::welcome))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(auth::dashboard))
        .route("/songs", get(songs::list))
        .route("/songs/upload", get(songs::upload_form).post(songs::upload))
        .route("/map", get(map::map))
        .route("/locations/upload", post(map::upload_locations))
        .route("/health", get(health::health))
        .route("/static/css/site.css", get(stylesheet))
        .nest("/api", api_routes)
}

/// Attach the fallback page, panic catching and the interceptor pipeline.
///
/// The pipeline is the outermost layer so it sees the final response of every
/// request, including 404s and caught panics.
pub fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    let pipeline = Arc::new(standard_pipeline(state.taxonomy.clone()));

    routes
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(pipeline, intercept_responses))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(PanicReporter)),
        )
        .with_state(state)
}

/// Full application router
pub fn build_router(state: AppState) -> Router {
    with_layers(routes(), state)
}

/// Songbook HTTP server
pub struct SongbookServer {
    state: AppState,
}

impl SongbookServer {
    pub fn new(dependencies: SongbookDependencies) -> Self {
        Self {
            state: dependencies.into_state(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.state.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let local = listener.local_addr()?;
        let taxonomy = self.state.taxonomy.clone();
        let router = self.router();

        info!("Listening on http://{}", local);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Server stopped");
        taxonomy.flush();
        Ok(())
    }

    /// Start the server in the background
    pub fn spawn(self) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C, serving until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
