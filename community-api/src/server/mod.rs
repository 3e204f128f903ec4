// Server module - HTTP server setup and routing
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;

use std::net::SocketAddr;

use axum::routing::get;
use axum::{middleware, Router};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use self::state::AppState;
use crate::StartupError;

/// Create the axum application router with all routes and middleware
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/blogs", get(handlers::list_blogs).post(handlers::create_blog))
        .route(
            "/forum",
            get(handlers::list_forum).post(handlers::create_forum_post),
        )
        .route(
            "/targets/:id",
            get(handlers::get_target).patch(handlers::vote_target),
        )
        .route(
            "/targets/:id/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        .route("/trending", get(handlers::trending))
        .route(
            "/notifications/comments",
            get(handlers::list_comment_notifications),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server on the specified address until a shutdown signal arrives
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), StartupError> {
    info!("Server listening on {}", addr);
    info!("- Health endpoint: http://{}/health", addr);
    info!("- Trending endpoint: http://{}/trending", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
