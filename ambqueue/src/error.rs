//! Types d'erreurs pour ambqueue

/// Erreurs de la file d'attente
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Entrée requise absente ou vide (HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifiant inconnu dans la file (HTTP 404)
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour ambqueue
pub type Result<T> = std::result::Result<T, Error>;
