//! Extension de ambconfig pour la file des chanteurs

use std::path::PathBuf;

const DEFAULT_QUEUE_DIR: &str = "data";

/// Trait d'extension pour ambconfig::Config
pub trait QueueConfigExt {
    /// Chemin du fichier snapshot de la file
    ///
    /// `<config_dir>/<queue.directory>/<queue.file>` ; le répertoire est créé
    /// s'il n'existe pas (défauts : `data` et `queue.json`).
    fn queue_file_path(&self) -> anyhow::Result<PathBuf>;
}

impl QueueConfigExt for ambconfig::Config {
    fn queue_file_path(&self) -> anyhow::Result<PathBuf> {
        let dir = self.get_managed_dir(&["queue", "directory"], DEFAULT_QUEUE_DIR)?;
        Ok(dir.join(self.get_queue_file_name()))
    }
}
