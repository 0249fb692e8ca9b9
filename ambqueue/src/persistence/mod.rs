//! Persistance de la file dans un fichier JSON
//!
//! Format courant :
//!
//! ```json
//! { "queue": [{ "id": "...", "name": "...", "addedAt": 1718000000000 }],
//!   "currentlySingingId": null }
//! ```
//!
//! L'ancien format (tableau nu d'entrées) est encore accepté en lecture.
//! La lecture ne fait jamais échouer le démarrage : un fichier absent ou
//! illisible donne une file vide.

use crate::entry::Entry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// État persisté de la file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub queue: Vec<Entry>,
    #[serde(default)]
    pub currently_singing_id: Option<String>,
    /// Révision de la file au moment de la capture (non sérialisée)
    #[serde(skip)]
    pub revision: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Current(Snapshot),
    Legacy(Vec<Entry>),
}

impl From<StoredSnapshot> for Snapshot {
    fn from(stored: StoredSnapshot) -> Self {
        match stored {
            StoredSnapshot::Current(snapshot) => snapshot,
            StoredSnapshot::Legacy(queue) => Snapshot {
                queue,
                ..Default::default()
            },
        }
    }
}

/// Décode le contenu d'un fichier snapshot, dans l'un ou l'autre format
pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot> {
    serde_json::from_slice::<StoredSnapshot>(bytes)
        .map(Snapshot::from)
        .map_err(|e| Error::Persistence(format!("Invalid snapshot: {}", e)))
}

/// Fichier snapshot de la file
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    /// Dernière révision écrite ; tenu pendant toute l'écriture
    last_written: Mutex<Option<u64>>,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_written: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lit le snapshot au démarrage
    ///
    /// Ne retourne jamais d'erreur : fichier absent, illisible ou mal formé
    /// donnent un snapshot vide (avec un avertissement dans les deux derniers cas).
    pub async fn load(&self) -> Snapshot {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No queue snapshot, starting empty");
                return Snapshot::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Cannot read queue snapshot: {}", e);
                return Snapshot::default();
            }
        };

        match decode_snapshot(&bytes) {
            Ok(snapshot) => {
                info!(
                    path = %self.path.display(),
                    entries = snapshot.queue.len(),
                    "Queue snapshot restored"
                );
                snapshot
            }
            Err(e) => {
                warn!(path = %self.path.display(), "{}, starting empty", e);
                Snapshot::default()
            }
        }
    }

    /// Écrit le snapshot (fichier temporaire puis renommage)
    ///
    /// Un snapshot dont la révision n'est pas plus récente que la dernière
    /// écrite est ignoré.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut last_written = self.last_written.lock().await;
        if last_written.is_some_and(|rev| snapshot.revision <= rev) {
            debug!(revision = snapshot.revision, "Skipping stale queue snapshot");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Persistence(format!("Failed to create directory: {}", e))
            })?;
        }

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| Error::Persistence(format!("Failed to encode snapshot: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| Error::Persistence(format!("Failed to write {}: {}", tmp.display(), e)))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), "Cannot remove temporary snapshot: {}", cleanup);
            }
            return Err(Error::Persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        *last_written = Some(snapshot.revision);
        debug!(
            revision = snapshot.revision,
            entries = snapshot.queue.len(),
            "Queue snapshot written"
        );
        Ok(())
    }
}
