//! HTTP surface: REST passthrough and the WebSocket upgrade route.

use crate::error::GatewayResult;
use crate::state::AppState;
use crate::ws;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::routing::{delete, get};
use axum::{Json, Router};
use rowsync_docstore::DocumentStore as _;
use rowsync_protocol::{DocId, Fields, PersistedDocument};
use serde_json::json;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the gateway router.
pub fn create_app(state: AppState) -> Router {
    // the original served browser clients from arbitrary origins
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(cors::Any)
        .allow_origin(cors::Any);

    Router::new()
        .route("/healthcheck", get(|| async { "OK" }))
        .route("/ws/{collection}", get(ws::handle_ws))
        .route("/api/{collection}", get(list_documents).post(create_document))
        .route("/api/{collection}/{id}", delete(delete_document))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> GatewayResult<Json<Vec<PersistedDocument>>> {
    let collection = state.store.resolve(&collection)?;
    let documents = state.docstore.list(collection.name()).await?;
    Ok(Json(documents))
}

async fn create_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(fields): Json<Fields>,
) -> GatewayResult<(StatusCode, Json<PersistedDocument>)> {
    let collection = state.store.resolve(&collection)?;
    let document = state.docstore.add(collection.name(), &fields).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

async fn delete_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> GatewayResult<Json<serde_json::Value>> {
    let collection = state.store.resolve(&collection)?;
    state
        .docstore
        .delete(collection.name(), &DocId::new(id.clone()))
        .await?;
    Ok(Json(json!({ "deleted": id })))
}
