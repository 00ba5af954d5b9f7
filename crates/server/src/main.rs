use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use server_api::{
    create_swimmer, decrement_swimmer, delete_swimmer, get_swimmer, increment_swimmer,
    list_swimmers, reset_swimmer, update_swimmer, ApiContext,
};
use shared::{
    domain::{Swimmer, SwimmerId},
    error::{ApiError, ErrorCode},
    protocol::{CreateSwimmerRequest, UpdateSwimmerRequest, SWIMMERS_ROUTE},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let addr = settings.bind_addr()?;
    let state = AppState {
        api: ApiContext::default(),
    };
    let app = build_router(Arc::new(state), settings.body_limit_bytes);

    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to install ctrl-c handler; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            SWIMMERS_ROUTE,
            get(http_list_swimmers).post(http_create_swimmer),
        )
        .route(
            "/api/swimmers/:id",
            get(http_get_swimmer)
                .patch(http_update_swimmer)
                .delete(http_delete_swimmer),
        )
        .route("/api/swimmers/:id/reset", post(http_reset_swimmer))
        .route("/api/swimmers/:id/increment", post(http_increment_swimmer))
        .route("/api/swimmers/:id/decrement", post(http_decrement_swimmer))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.api.storage.health_check().await {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}

async fn http_list_swimmers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Swimmer>>, HttpError> {
    list_swimmers(&state.api).await.map(Json).map_err(http_error)
}

async fn http_get_swimmer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Swimmer>, HttpError> {
    let id = swimmer_id(path)?;
    get_swimmer(&state.api, id).await.map(Json).map_err(http_error)
}

async fn http_create_swimmer(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateSwimmerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Swimmer>), HttpError> {
    let Json(req) = body.map_err(json_rejection)?;
    let swimmer = create_swimmer(&state.api, req).await.map_err(http_error)?;
    Ok((StatusCode::CREATED, Json(swimmer)))
}

async fn http_update_swimmer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateSwimmerRequest>, JsonRejection>,
) -> Result<Json<Swimmer>, HttpError> {
    let id = swimmer_id(path)?;
    let Json(req) = body.map_err(json_rejection)?;
    update_swimmer(&state.api, id, req)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_delete_swimmer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, HttpError> {
    let id = swimmer_id(path)?;
    delete_swimmer(&state.api, id).await.map_err(http_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_reset_swimmer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Swimmer>, HttpError> {
    let id = swimmer_id(path)?;
    reset_swimmer(&state.api, id).await.map(Json).map_err(http_error)
}

async fn http_increment_swimmer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Swimmer>, HttpError> {
    let id = swimmer_id(path)?;
    increment_swimmer(&state.api, id)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_decrement_swimmer(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Swimmer>, HttpError> {
    let id = swimmer_id(path)?;
    decrement_swimmer(&state.api, id)
        .await
        .map(Json)
        .map_err(http_error)
}

fn swimmer_id(path: Result<Path<i64>, PathRejection>) -> Result<SwimmerId, HttpError> {
    path.map(|Path(id)| SwimmerId(id)).map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation(rejection.body_text())),
        )
    })
}

fn json_rejection(rejection: JsonRejection) -> HttpError {
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(ApiError::validation(rejection.body_text())))
}

fn http_error(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
