//! QueueManager : accès partagé et sérialisé à la file
//!
//! Un seul écrivain à la fois (verrou d'écriture tokio) ; les lectures
//! partagent le verrou et ne voient jamais une mutation à moitié appliquée.
//!
//! Chaque mutation publie le nouveau snapshot sur un canal `watch` ; une
//! tâche de fond l'écrit sur disque sans retarder la réponse. Le canal ne
//! garde que la dernière valeur : des mutations rapprochées donnent une
//! seule écriture, celle de l'état le plus récent.

use crate::entry::EntryView;
use crate::persistence::{Snapshot, SnapshotStore};
use crate::queue::QueueCore;
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error};

struct ManagerInner {
    core: RwLock<QueueCore>,
    store: Option<Arc<SnapshotStore>>,
    snapshot_tx: watch::Sender<Snapshot>,
}

/// Handle clonable vers la file des chanteurs
#[derive(Clone)]
pub struct QueueManager {
    inner: Arc<ManagerInner>,
}

impl QueueManager {
    /// File sans persistance
    pub fn in_memory() -> Self {
        let core = QueueCore::new();
        let (snapshot_tx, _) = watch::channel(core.snapshot());
        Self {
            inner: Arc::new(ManagerInner {
                core: RwLock::new(core),
                store: None,
                snapshot_tx,
            }),
        }
    }

    /// Restaure la file depuis `path` et lance l'écrivain de fond
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let store = Arc::new(SnapshotStore::new(path));
        let core = QueueCore::from_snapshot(store.load().await);
        let (snapshot_tx, snapshot_rx) = watch::channel(core.snapshot());

        tokio::spawn(snapshot_writer(store.clone(), snapshot_rx));

        Self {
            inner: Arc::new(ManagerInner {
                core: RwLock::new(core),
                store: Some(store),
                snapshot_tx,
            }),
        }
    }

    /// Ouvre la file à l'emplacement configuré (`queue.directory` / `queue.file`)
    #[cfg(feature = "ambconfig")]
    pub async fn from_config() -> Result<Self> {
        use crate::config_ext::QueueConfigExt;

        let path = ambconfig::get_config().queue_file_path()?;
        Ok(Self::open(path).await)
    }

    /// Chemin du fichier snapshot, si la file est persistante
    pub fn file_path(&self) -> Option<&Path> {
        self.inner.store.as_deref().map(SnapshotStore::path)
    }

    pub async fn list(&self) -> Vec<EntryView> {
        self.inner.core.read().await.list()
    }

    pub async fn len(&self) -> usize {
        self.inner.core.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.core.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.core.read().await.snapshot()
    }

    pub async fn add(&self, name: &str) -> Result<Vec<EntryView>> {
        self.mutate("add", |core| {
            let entry = core.add(name)?;
            debug!(id = %entry.id(), name = %entry.name(), "Singer added");
            Ok(())
        })
        .await
    }

    pub async fn remove(&self, id: &str) -> Result<Vec<EntryView>> {
        self.mutate("remove", |core| {
            let entry = core.remove(id)?;
            debug!(id = %entry.id(), name = %entry.name(), "Singer removed");
            Ok(())
        })
        .await
    }

    pub async fn reorder<S: AsRef<str>>(&self, ordered_ids: &[S]) -> Result<Vec<EntryView>> {
        self.mutate("reorder", |core| {
            core.reorder(ordered_ids);
            debug!(requested = ordered_ids.len(), "Queue reordered");
            Ok(())
        })
        .await
    }

    pub async fn set_currently_singing(&self, id: Option<&str>) -> Result<Vec<EntryView>> {
        self.mutate("set_currently_singing", |core| {
            core.set_currently_singing(id)?;
            debug!(id = ?id, "Currently singing updated");
            Ok(())
        })
        .await
    }

    pub async fn move_to_bottom(&self, id: &str) -> Result<Vec<EntryView>> {
        self.mutate("move_to_bottom", |core| {
            core.move_to_bottom(id)?;
            debug!(id = %id, "Singer moved to bottom");
            Ok(())
        })
        .await
    }

    /// Écrit immédiatement l'état courant (arrêt du serveur, tests)
    pub async fn flush(&self) -> Result<()> {
        let Some(store) = &self.inner.store else {
            return Ok(());
        };
        let snapshot = self.snapshot().await;
        store.save(&snapshot).await
    }

    async fn mutate<F>(&self, op: &str, f: F) -> Result<Vec<EntryView>>
    where
        F: FnOnce(&mut QueueCore) -> Result<()>,
    {
        let mut core = self.inner.core.write().await;
        if let Err(e) = f(&mut core) {
            debug!(op, "Queue operation rejected: {}", e);
            return Err(e);
        }

        self.inner.snapshot_tx.send_replace(core.snapshot());
        Ok(core.list())
    }
}

async fn snapshot_writer(store: Arc<SnapshotStore>, mut rx: watch::Receiver<Snapshot>) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if let Err(e) = store.save(&snapshot).await {
            error!(path = %store.path().display(), "Failed to persist queue: {}", e);
        }
    }
    debug!("Queue snapshot writer stopped");
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("file", &self.file_path())
            .finish_non_exhaustive()
    }
}
