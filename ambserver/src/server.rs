//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module fournit une abstraction simple pour créer le serveur HTTP
//! d'Ambabe, en cachant la configuration et le routage d'Axum.
//!
//! ## Fonctionnalités
//!
//! - **Routes JSON simples** : ajoutez des endpoints avec `add_route()`
//! - **Handlers avec état** : `add_handler_with_state()`
//! - **Documentation API** : OpenAPI/Swagger automatique avec `add_openapi()`
//! - **Session hôte** : `init_host_auth()` monte les routes `/host/*`
//! - **Arrêt gracieux** : arrêt propre sur Ctrl+C

use crate::host_auth::{HostAuth, host_auth_router};
use crate::logs::{LogState, LoggingOptions, LogsApiDoc, create_logs_router, init_logging, log_dump};
use ambconfig::get_config;
use axum::handler::Handler;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Info serveur sérialisable
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

/// Serveur principal
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
    log_state: Option<LogState>,
    host_auth: Option<HostAuth>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Hôte annoncé aux clients (ex: "192.168.1.42")
    /// * `http_port` - Port HTTP à écouter
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
            log_state: None,
            host_auth: None,
        }
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure fournie est appelée à chaque requête GET sur `path`.
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// # use ambserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3000);
    /// server.add_route("/api/status", || async {
    ///     serde_json::json!({ "status": "online" })
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let handler = move || {
            let f = f.clone();
            async move { Json(f().await) }
        };

        self.merge(Router::new().route(path, get(handler))).await;
    }

    /// Ajoute un handler GET avec état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route(path, get(handler)).with_state(state);
        self.merge(route).await;
    }

    /// Ajoute une API documentée avec OpenAPI et Swagger UI
    ///
    /// Les routes de `api_router` portent leur chemin complet (ex: `/api/queue`)
    /// et sont fusionnées telles quelles au router principal.
    ///
    /// - `/swagger-ui/{name}` affiche la documentation
    /// - `/api-docs/{name}.json` fournit la spécification OpenAPI
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let swagger_path: &'static str = Box::leak(format!("/swagger-ui/{}", name).into_boxed_str());
        let openapi_json_path: &'static str =
            Box::leak(format!("/api-docs/{}.json", name).into_boxed_str());

        let swagger = SwaggerUi::new(swagger_path).url(openapi_json_path, openapi);

        self.merge(api_router.merge(swagger)).await;
    }

    async fn merge(&mut self, route: Router) {
        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(route);
    }

    /// Router assemblé (copie), utile pour les tests
    pub async fn router(&self) -> Router {
        self.router.read().await.clone()
    }

    /// Démarre le serveur HTTP
    ///
    /// Lie le port configuré (une erreur de bind est retournée) puis sert
    /// les requêtes en tâche de fond jusqu'à Ctrl+C.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(
            "Server {} running at http://{}:{}",
            self.name, self.base_url, self.http_port
        );

        let router = self.router.read().await.clone();
        self.join_handle = Some(tokio::spawn(async move {
            let shutdown = async {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
                info!("Ctrl+C reçu, arrêt gracieux");
            };

            if let Err(e) = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("HTTP server error: {}", e);
            }
        }));

        Ok(())
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
        }
    }

    /// Initialise le système de logging et enregistre les routes de logs
    ///
    /// Routes enregistrées :
    ///
    /// - `GET /log-dump` - contenu du buffer (filtrable par niveau / mot-clé)
    /// - `GET|POST /api/logs/log_setup` - niveau de log courant
    pub async fn init_logging(&mut self, options: LoggingOptions) -> LogState {
        let log_state = init_logging(options);

        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_openapi(
            create_logs_router(log_state.clone()),
            LogsApiDoc::openapi(),
            "logs",
        )
        .await;

        self.log_state = Some(log_state.clone());
        log_state
    }

    pub fn log_state(&self) -> Option<&LogState> {
        self.log_state.as_ref()
    }

    /// Installe la session hôte et enregistre les routes `/host/*`
    pub async fn init_host_auth(&mut self, auth: HostAuth) -> HostAuth {
        self.merge(host_auth_router(auth.clone())).await;
        self.host_auth = Some(auth.clone());
        auth
    }

    /// Vérificateur de session hôte, s'il a été installé
    pub fn host_auth(&self) -> Option<&HostAuth> {
        self.host_auth.as_ref()
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    pub fn new_configured() -> Self {
        let config = get_config();
        Self {
            name: config.get_server_name(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
        }
    }

    /// Construit le serveur
    ///
    /// ```rust
    /// # use ambserver::ServerBuilder;
    /// let server = ServerBuilder::new("MyAPI", "localhost", 3000).build();
    /// assert_eq!(server.info().http_port, 3000);
    /// ```
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}
