//! Documentation OpenAPI de l'API de la file.

use utoipa::OpenApi;

/// Documentation OpenAPI pour `/api/queue`.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_queue,
        crate::api::add_singer,
        crate::api::reorder_queue,
        crate::api::set_currently_singing,
        crate::api::move_to_bottom,
        crate::api::remove_singer,
    ),
    components(
        schemas(
            crate::entry::EntryView,
            crate::api::AddSingerRequest,
            crate::api::ReorderRequest,
            crate::api::CurrentlySingingRequest,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "queue", description = "File d'attente des chanteurs")
    ),
    info(
        title = "Ambabe Queue API",
        version = "0.1.0",
        description = r#"
# File des chanteurs

- `GET /api/queue` et `POST /api/queue` sont ouverts à tous.
- Les autres routes exigent le cookie de session hôte (`POST /host/auth`),
  sinon `401 UNAUTHORIZED`.

Chaque réponse réussie renvoie la file complète, dans l'ordre de passage.
Les erreurs ont la forme `{ "error": "<CODE>", "message": "..." }`.
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
