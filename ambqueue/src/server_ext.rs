//! Extension de ambserver::Server pour la file des chanteurs

use crate::api::{queue_api_router, HostPredicate};
use crate::manager::QueueManager;
use crate::openapi::ApiDoc;
use ambserver::{HostAuth, Server};
use axum::http::HeaderMap;
use std::sync::Arc;
use utoipa::OpenApi;

/// Trait pour monter l'API de la file sur un serveur HTTP.
///
/// Permet à `ambqueue` d'ajouter ses routes à `ambserver::Server` sans que
/// `ambserver` dépende de `ambqueue`.
pub trait QueueServerExt {
    /// Enregistre `/api/queue` et sa documentation (`/swagger-ui/queue`)
    ///
    /// Les routes réservées à l'hôte sont vérifiées avec la session installée
    /// par `init_host_auth` ; sans session installée, elles répondent 401.
    async fn add_queue_api(&mut self, manager: QueueManager);

    /// Ouvre la file configurée et enregistre ses routes
    ///
    /// Installe la session hôte depuis la configuration si ce n'est pas déjà fait.
    async fn init_queue_api(&mut self) -> anyhow::Result<QueueManager>;
}

impl QueueServerExt for Server {
    async fn add_queue_api(&mut self, manager: QueueManager) {
        let is_host: HostPredicate = match self.host_auth().cloned() {
            Some(auth) => Arc::new(move |headers: &HeaderMap| auth.is_host(headers)),
            None => {
                tracing::warn!("Queue API mounted without host session, host routes are closed");
                Arc::new(|_: &HeaderMap| false)
            }
        };

        self.add_openapi(queue_api_router(manager, is_host), ApiDoc::openapi(), "queue")
            .await;
    }

    async fn init_queue_api(&mut self) -> anyhow::Result<QueueManager> {
        if self.host_auth().is_none() {
            self.init_host_auth(HostAuth::from_config()).await;
        }

        let manager = QueueManager::from_config().await?;
        if let Some(path) = manager.file_path() {
            tracing::info!("Queue snapshot file: {}", path.display());
        }

        self.add_queue_api(manager.clone()).await;
        Ok(manager)
    }
}
