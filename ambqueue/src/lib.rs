//! # ambqueue - File d'attente des chanteurs
//!
//! Cette crate gère l'unique file d'un karaoké :
//! - Ordre de passage, inscription, retrait, réordonnancement
//! - Chanteur « en scène » (au plus un, référencé par id)
//! - Snapshot JSON sur disque, écrit en tâche de fond après chaque mutation
//! - API REST `/api/queue` avec routes réservées à l'hôte
//!
//! # Architecture
//!
//! - **QueueCore** : machine à états synchrone, garante des invariants
//! - **QueueManager** : handle clonable, un seul écrivain à la fois
//! - **SnapshotStore** : lecture tolérante et écriture atomique du fichier
//! - **QueueServerExt** : montage sur `ambserver::Server` (feature `ambserver`)
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use ambqueue::QueueManager;
//!
//! # #[tokio::main]
//! # async fn main() -> ambqueue::Result<()> {
//! let manager = QueueManager::open("/tmp/ambabe/queue.json").await;
//!
//! let list = manager.add("Alice").await?;
//! manager.add("Bob").await?;
//! manager.set_currently_singing(Some(&list[0].id)).await?;
//!
//! // Alice a fini : retour en fin de file
//! let list = manager.move_to_bottom(&list[0].id).await?;
//! assert_eq!(list[0].name, "Bob");
//!
//! manager.flush().await?;
//! # Ok(())
//! # }
//! ```

mod api;
mod entry;
mod error;
mod manager;
mod openapi;
mod persistence;
mod queue;

#[cfg(feature = "ambconfig")]
mod config_ext;

#[cfg(feature = "ambserver")]
mod server_ext;

// Réexports publics
pub use api::{
    queue_api_router, AddSingerRequest, CurrentlySingingRequest, ErrorResponse, HostPredicate,
    QueueApiState, ReorderRequest,
};
pub use entry::{Entry, EntryView};
pub use error::{Error, Result};
pub use manager::QueueManager;
pub use openapi::ApiDoc;
pub use persistence::{decode_snapshot, Snapshot, SnapshotStore};
pub use queue::QueueCore;

#[cfg(feature = "ambconfig")]
pub use config_ext::QueueConfigExt;

#[cfg(feature = "ambserver")]
pub use server_ext::QueueServerExt;
