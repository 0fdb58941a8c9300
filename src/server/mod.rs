//! HTTP transport for the movie operations.

use std::{
    net::SocketAddr,
    sync::{Arc, OnceLock},
};

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ServerConfig;
use crate::error::QueryError;
use crate::model::Movie;
use crate::query::{MovieService, Operation, QueryOutput};
use crate::source::BackendKind;

/// Errors that can occur while running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address is invalid.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    /// Binding or serving failed.
    #[error("http server error: {0}")]
    Io(#[from] std::io::Error),
}

type AppState = Arc<MovieService>;

/// Serves the movie API until Ctrl-C.
pub async fn serve(config: &ServerConfig, service: MovieService) -> Result<(), ServerError> {
    install_tracing_subscriber();

    let addr: SocketAddr = config.socket_addr()?;
    let backend = service.kind();
    let app = build_router(Arc::new(service), &config.allow_origins);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        %backend,
        allow_origins = ?config.allow_origins,
        "movie api listening"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("movie api stopped");
    Ok(())
}

/// Builds the router with CORS for `allow_origins` and request tracing.
pub fn build_router(service: AppState, allow_origins: &[String]) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/movies", get(all_movies_handler))
        .route("/api/movie", get(movie_by_title_handler))
        .route("/api/movies/related", get(related_handler))
        .route("/api/movies/by-director", get(by_director_handler))
        .route("/api/movies/by-actor", get(by_actor_handler))
        .route("/api/query", post(query_handler));

    if let Some(layer) = build_cors_layer(allow_origins) {
        router = router.layer(layer);
    }

    router.with_state(service).layer(TraceLayer::new_for_http())
}

fn build_cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let mut allowed = Vec::new();
    for origin in origins {
        let normalized = normalize_origin(origin);
        match normalized
            .as_deref()
            .and_then(|value| HeaderValue::from_str(value).ok())
        {
            Some(value) => allowed.push(value),
            None => {
                tracing::warn!(%origin, ?normalized, "ignoring invalid CORS origin");
            }
        }
    }

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(true),
    )
}

fn normalize_origin(origin: &str) -> Option<String> {
    let trimmed = origin.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn health_handler(State(service): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: service.kind(),
    })
}

async fn all_movies_handler(State(service): State<AppState>) -> Result<Json<Vec<Movie>>, AppError> {
    Ok(Json(service.all_movies().await?))
}

async fn movie_by_title_handler(
    State(service): State<AppState>,
    Query(params): Query<TitleParams>,
) -> Result<Json<Movie>, AppError> {
    Ok(Json(service.movie_by_title(&params.title).await?))
}

async fn related_handler(
    State(service): State<AppState>,
    Query(params): Query<TitleParams>,
) -> Result<Json<Vec<Movie>>, AppError> {
    Ok(Json(service.movies_within_hops(&params.title).await?))
}

async fn by_director_handler(
    State(service): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<Vec<Movie>>, AppError> {
    Ok(Json(service.movies_by_director(&params.name).await?))
}

async fn by_actor_handler(
    State(service): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<Vec<Movie>>, AppError> {
    Ok(Json(service.movies_by_actor(&params.name).await?))
}

async fn query_handler(
    State(service): State<AppState>,
    Json(operation): Json<Operation>,
) -> Result<Json<QueryOutput>, AppError> {
    tracing::debug!(operation = operation.name(), "dispatching query");
    Ok(Json(service.run(&operation).await?))
}

#[derive(Debug, Deserialize)]
struct TitleParams {
    title: String,
}

#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: BackendKind,
}

#[derive(Debug, Error)]
#[error(transparent)]
struct AppError(#[from] QueryError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QueryError::NotFound(_) => StatusCode::NOT_FOUND,
            QueryError::DataContract(_) | QueryError::MalformedRow { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            QueryError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = Json(ErrorPayload {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    message: String,
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => tracing::error!(?err, "failed to listen for shutdown signal"),
    }
}

/// Installs the global `fmt` subscriber filtered by `RUST_LOG` (default
/// `info`). Later calls are no-ops.
pub fn install_tracing_subscriber() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
