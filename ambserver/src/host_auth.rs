//! Session hôte : mot de passe partagé échangé contre un cookie
//!
//! Les routes d'administration de la file (réordonner, retirer, marquer le
//! chanteur courant) ne sont accessibles qu'avec ce cookie. Le jeton est
//! dérivé du secret : changer le mot de passe invalide les sessions ouvertes.
//!
//! Routes enregistrées par [`host_auth_router`] :
//!
//! - `POST /host/auth` - formulaire `password=...`, redirige vers `/host`
//!   (succès) ou `/host?error=1` (échec)
//! - `POST /host/logout` - efface le cookie
//! - `GET /host/session` - `{ "host": bool }`

use ambconfig::get_config;
use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    http::{
        HeaderMap, StatusCode,
        header::{COOKIE, LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Nom du cookie de session hôte
pub const HOST_COOKIE: &str = "ambabe_host";

/// Vérificateur de session hôte
#[derive(Clone)]
pub struct HostAuth {
    secret: Arc<str>,
    token: Arc<str>,
}

impl std::fmt::Debug for HostAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostAuth").finish_non_exhaustive()
    }
}

impl HostAuth {
    pub fn new(secret: impl AsRef<str>) -> Self {
        let secret = secret.as_ref().trim();
        Self {
            token: session_token(secret).into(),
            secret: secret.into(),
        }
    }

    /// Construit le vérificateur depuis `host.password` / `AMBABE_HOST_PASSWORD`
    pub fn from_config() -> Self {
        Self::new(get_config().get_host_password())
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        candidate.trim() == &*self.secret
    }

    /// Valeur attendue du cookie [`HOST_COOKIE`]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// L'appelant présente-t-il une session hôte valide ?
    pub fn is_host(&self, headers: &HeaderMap) -> bool {
        cookie_value(headers, HOST_COOKIE).is_some_and(|value| value == &*self.token)
    }

    fn session_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            HOST_COOKIE, self.token
        )
    }
}

fn session_token(secret: &str) -> String {
    let digest = Sha256::digest(format!("ambabe-host:{}", secret).as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Cherche un cookie par nom dans toutes les en-têtes `Cookie`
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct HostSessionResponse {
    pub host: bool,
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// POST /host/auth
pub async fn host_login(
    State(auth): State<HostAuth>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let password = form.map(|Form(f)| f.password).unwrap_or_default();

    if auth.check_password(&password) {
        tracing::info!("Host session opened");
        (
            StatusCode::FOUND,
            [
                (LOCATION, "/host".to_string()),
                (SET_COOKIE, auth.session_cookie()),
            ],
        )
            .into_response()
    } else {
        tracing::warn!("Rejected host login attempt");
        found("/host?error=1")
    }
}

/// POST /host/logout
pub async fn host_logout() -> Response {
    (
        StatusCode::FOUND,
        [
            (LOCATION, "/".to_string()),
            (
                SET_COOKIE,
                format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", HOST_COOKIE),
            ),
        ],
    )
        .into_response()
}

/// GET /host/session
pub async fn host_session(
    State(auth): State<HostAuth>,
    headers: HeaderMap,
) -> Json<HostSessionResponse> {
    Json(HostSessionResponse {
        host: auth.is_host(&headers),
    })
}

/// Router des routes de session hôte
pub fn host_auth_router(auth: HostAuth) -> Router {
    Router::new()
        .route("/host/auth", post(host_login))
        .route("/host/logout", post(host_logout))
        .route("/host/session", get(host_session))
        .with_state(auth)
}
