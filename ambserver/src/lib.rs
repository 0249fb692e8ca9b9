//! # ambserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit le serveur HTTP d'Ambabe et son environnement :
//!
//! - [`server`] : `Server` / `ServerBuilder`, routes JSON, OpenAPI, arrêt gracieux
//! - [`logs`] : capture des logs `tracing` dans un buffer circulaire consultable
//! - [`host_auth`] : session hôte (mot de passe partagé → cookie)
//!
//! Les autres crates s'y branchent par des traits d'extension (voir
//! `ambqueue::QueueServerExt`), sans que `ambserver` les connaisse.
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use ambserver::{HostAuth, ServerBuilder, logs::LoggingOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("Ambabe", "localhost", 3847).build();
//!     server.init_logging(LoggingOptions::default()).await;
//!     server.init_host_auth(HostAuth::new("4321")).await;
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod host_auth;
pub mod logs;
pub mod server;

pub use host_auth::{HOST_COOKIE, HostAuth};
pub use logs::{BufferLayer, LogState, LoggingOptions};
pub use server::{Server, ServerBuilder, ServerInfo};
