//! HTTP routes over [`StreetStore`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::core::db::{NewStreet, Point, StoreError, Street, StreetRepository, StreetStore};

pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:8080";

pub fn router(store: Arc<StreetStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/streets", post(create_street).get(list_streets))
        .route(
            "/streets/{id}",
            get(get_street).put(update_street).delete(delete_street),
        )
        .route("/streets/{id}/geometry", post(add_point_to_geometry))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serve the API on `bind` until Ctrl-C.
pub async fn serve(store: Arc<StreetStore>, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

async fn create_street(
    State(store): State<Arc<StreetStore>>,
    Json(street): Json<NewStreet>,
) -> Result<impl IntoResponse, ApiError> {
    let street = store.create_street(&street).await?;
    let location = format!("/streets/{}", street.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(street)))
}

async fn list_streets(State(store): State<Arc<StreetStore>>) -> Result<Json<Vec<Street>>, ApiError> {
    Ok(Json(store.get_streets().await?))
}

async fn get_street(
    State(store): State<Arc<StreetStore>>,
    Path(id): Path<i64>,
) -> Result<Json<Street>, ApiError> {
    let street = store
        .get_street_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(street))
}

async fn update_street(
    State(store): State<Arc<StreetStore>>,
    Path(id): Path<i64>,
    Json(street): Json<NewStreet>,
) -> Result<Json<Street>, ApiError> {
    Ok(Json(store.update_street(id, &street).await?))
}

/// Always 204, whether or not the street existed.
async fn delete_street(
    State(store): State<Arc<StreetStore>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    store.delete_street(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct GeometryQuery {
    /// Missing means prepend.
    #[serde(rename = "addToEnd", default)]
    add_to_end: bool,
}

async fn add_point_to_geometry(
    State(store): State<Arc<StreetStore>>,
    Path(id): Path<i64>,
    Query(query): Query<GeometryQuery>,
    Json(point): Json<Point>,
) -> Result<StatusCode, ApiError> {
    if store
        .append_or_prepend_point(id, point, query.add_to_end)
        .await?
    {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::NotFound)
    }
}

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound,
            StoreError::Validation(e) => ApiError::BadRequest(e.to_string()),
            e => {
                tracing::error!(error = %e, "street store failure");
                ApiError::Internal(e.to_string())
            }
        }
    }
}
