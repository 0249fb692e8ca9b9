//! API REST de la file des chanteurs.
//!
//! Toutes les réponses réussies renvoient la file complète (`[EntryView]`).
//! L'inscription est ouverte à tous ; les autres mutations exigent une
//! session hôte, vérifiée par le prédicat [`HostPredicate`].
//!
//! Les corps sont lus de façon tolérante : un JSON invalide vaut un objet
//! vide, et les champs de mauvais type sont traités comme absents.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::entry::EntryView;
use crate::manager::QueueManager;
use crate::Error;

/// « L'appelant détient-il une session hôte ? »
pub type HostPredicate = Arc<dyn Fn(&HeaderMap) -> bool + Send + Sync>;

/// État partagé des handlers de la file
#[derive(Clone)]
pub struct QueueApiState {
    manager: QueueManager,
    is_host: HostPredicate,
}

impl QueueApiState {
    fn require_host(&self, headers: &HeaderMap) -> Result<(), Response> {
        if (self.is_host)(headers) {
            Ok(())
        } else {
            tracing::debug!("Host-only queue route called without host session");
            Err(map_status(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Host session required",
            ))
        }
    }
}

/// Router de l'API `/api/queue` (chemins absolus)
pub fn queue_api_router(manager: QueueManager, is_host: HostPredicate) -> Router {
    Router::new()
        .route("/api/queue", get(list_queue).post(add_singer))
        .route("/api/queue/", delete(missing_id))
        .route("/api/queue/reorder", patch(reorder_queue))
        .route("/api/queue/currently-singing", patch(set_currently_singing))
        .route("/api/queue/{id}/move-to-bottom", post(move_to_bottom))
        .route("/api/queue/{id}", delete(remove_singer))
        .with_state(QueueApiState { manager, is_host })
}

/// Inscription d'un chanteur.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddSingerRequest {
    #[schema(example = "Alice")]
    pub name: Option<String>,
}

impl AddSingerRequest {
    fn from_body(body: &Value) -> Self {
        Self {
            name: body.get("name").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Nouvel ordre (partiel) de la file.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub ordered_ids: Vec<String>,
}

impl ReorderRequest {
    fn from_body(body: &Value) -> Self {
        let ordered_ids = body
            .get("orderedIds")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self { ordered_ids }
    }
}

/// Chanteur courant ; `null` (ou absent) pour n'en marquer aucun.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CurrentlySingingRequest {
    pub id: Option<String>,
}

impl CurrentlySingingRequest {
    fn from_body(body: &Value) -> Self {
        Self {
            id: body
                .get("id")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

fn parse_body(body: &Bytes) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Default::default()),
    }
}

fn path_id(raw: &str) -> Result<&str, Response> {
    let id = raw.trim();
    if id.is_empty() {
        Err(map_status(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Id is required",
        ))
    } else {
        Ok(id)
    }
}

fn respond(status: StatusCode, result: crate::Result<Vec<EntryView>>) -> Response {
    match result {
        Ok(list) => (status, Json(list)).into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/queue",
    tag = "queue",
    responses(
        (status = 200, description = "File dans l'ordre de passage", body = [EntryView])
    )
)]
pub async fn list_queue(State(state): State<QueueApiState>) -> Response {
    (StatusCode::OK, Json(state.manager.list().await)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/queue",
    tag = "queue",
    request_body = AddSingerRequest,
    responses(
        (status = 201, description = "Chanteur inscrit en fin de file", body = [EntryView]),
        (status = 400, description = "Nom absent ou vide", body = ErrorResponse)
    )
)]
pub async fn add_singer(State(state): State<QueueApiState>, body: Bytes) -> Response {
    let req = AddSingerRequest::from_body(&parse_body(&body));
    let name = req.name.unwrap_or_default();
    respond(StatusCode::CREATED, state.manager.add(&name).await)
}

#[utoipa::path(
    patch,
    path = "/api/queue/reorder",
    tag = "queue",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "File réordonnée (ids inconnus ignorés)", body = [EntryView]),
        (status = 401, description = "Session hôte requise", body = ErrorResponse)
    )
)]
pub async fn reorder_queue(
    State(state): State<QueueApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = state.require_host(&headers) {
        return resp;
    }
    let req = ReorderRequest::from_body(&parse_body(&body));
    respond(StatusCode::OK, state.manager.reorder(req.ordered_ids.as_slice()).await)
}

#[utoipa::path(
    patch,
    path = "/api/queue/currently-singing",
    tag = "queue",
    request_body = CurrentlySingingRequest,
    responses(
        (status = 200, description = "Chanteur courant mis à jour", body = [EntryView]),
        (status = 401, description = "Session hôte requise", body = ErrorResponse),
        (status = 404, description = "Entrée introuvable", body = ErrorResponse)
    )
)]
pub async fn set_currently_singing(
    State(state): State<QueueApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = state.require_host(&headers) {
        return resp;
    }
    let req = CurrentlySingingRequest::from_body(&parse_body(&body));
    respond(
        StatusCode::OK,
        state.manager.set_currently_singing(req.id.as_deref()).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/queue/{id}/move-to-bottom",
    tag = "queue",
    params(
        ("id" = String, Path, description = "Identifiant de l'entrée")
    ),
    responses(
        (status = 200, description = "Entrée renvoyée en fin de file", body = [EntryView]),
        (status = 400, description = "Identifiant vide", body = ErrorResponse),
        (status = 401, description = "Session hôte requise", body = ErrorResponse),
        (status = 404, description = "Entrée introuvable", body = ErrorResponse)
    )
)]
pub async fn move_to_bottom(
    State(state): State<QueueApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = state.require_host(&headers) {
        return resp;
    }
    match path_id(&id) {
        Ok(id) => respond(StatusCode::OK, state.manager.move_to_bottom(id).await),
        Err(resp) => resp,
    }
}

#[utoipa::path(
    delete,
    path = "/api/queue/{id}",
    tag = "queue",
    params(
        ("id" = String, Path, description = "Identifiant de l'entrée")
    ),
    responses(
        (status = 200, description = "Entrée retirée", body = [EntryView]),
        (status = 400, description = "Identifiant vide", body = ErrorResponse),
        (status = 401, description = "Session hôte requise", body = ErrorResponse),
        (status = 404, description = "Entrée introuvable", body = ErrorResponse)
    )
)]
pub async fn remove_singer(
    State(state): State<QueueApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = state.require_host(&headers) {
        return resp;
    }
    match path_id(&id) {
        Ok(id) => respond(StatusCode::OK, state.manager.remove(id).await),
        Err(resp) => resp,
    }
}

/// DELETE /api/queue/ (identifiant absent)
async fn missing_id(State(state): State<QueueApiState>, headers: HeaderMap) -> Response {
    if let Err(resp) = state.require_host(&headers) {
        return resp;
    }
    map_status(
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Id is required",
    )
}

fn map_status<S: Into<String>>(status: StatusCode, error: &str, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

fn map_error(error: Error) -> Response {
    match error {
        Error::Validation(message) => {
            map_status(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        }
        Error::NotFound(id) => map_status(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("No queue entry with id {}", id),
        ),
        other => {
            tracing::error!("Queue API internal error: {}", other);
            map_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                other.to_string(),
            )
        }
    }
}
