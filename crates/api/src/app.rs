use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, SecurityConfig};
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{groups, health, participations, reading};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if security.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<_> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        pool,
        config: config.clone(),
    };

    let group_routes = Router::new()
        .route("/api/v1/groups", post(groups::create_group))
        .route("/api/v1/groups/by-code/:code", get(groups::get_group_by_code))
        .route("/api/v1/groups/:group_id/finish", post(groups::finish_group))
        .route(
            "/api/v1/groups/:group_id/participations",
            get(participations::list_participations).post(participations::join_group),
        )
        .route(
            "/api/v1/groups/:group_id/participations/search",
            get(participations::find_by_name),
        );

    // Updates of a single participation, gated by its edit token
    let participation_routes = Router::new()
        .route(
            "/api/v1/participations/:id",
            axum::routing::delete(participations::delete_participation),
        )
        .route(
            "/api/v1/participations/:id/complete",
            post(participations::complete_participation),
        )
        .route(
            "/api/v1/participations/:id/cancel",
            post(participations::cancel_participation),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/reading", get(reading::get_reading))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(group_routes)
        .merge(participation_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security))
        .with_state(state)
}
