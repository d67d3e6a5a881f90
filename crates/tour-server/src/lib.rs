pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderName;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with every function route and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ]);

    Router::new()
        .route("/health", get(routes::health::health))
        // Status normalizer
        .route(
            "/fix-order-status",
            post(routes::orders::fix_order_status).get(routes::orders::fix_order_status),
        )
        // Robots / sitemap
        .route("/robots-txt", get(routes::seo::robots_txt))
        .route("/robots.txt", get(routes::seo::robots_txt))
        .route("/sitemap-xml", get(routes::seo::sitemap_xml))
        .route("/sitemap.xml", get(routes::seo::sitemap_xml))
        // Stripe publishable key
        .route(
            "/get-stripe-key",
            get(routes::stripe::get_stripe_key).post(routes::stripe::get_stripe_key),
        )
        // Legacy credential import
        .route(
            "/migrate-woocommerce-credentials",
            post(routes::credentials::migrate_credentials),
        )
        // Email relay
        .route("/send-email", post(routes::email::send_email))
        // Innermost first: panics become envelopes before CORS headers are
        // added, and `options_ok` rewrites the CORS layer's OPTIONS answers.
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(routes::options_ok))
        .with_state(state)
}

/// Serve the function routes on `host:port`.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    serve_on(state, listener).await
}

/// Serve on a pre-bound listener, so callers can read the actual port first
/// (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("tour functions listening on http://{addr}");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
