//! Entry : une place dans la file, et sa projection côté client

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Un chanteur en attente
///
/// Tous les champs sont fixés à la création : pas de modification après
/// inscription. Sérialisé tel quel dans le snapshot (`{id, name, addedAt}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    /// Millisecondes depuis epoch
    #[serde(default)]
    added_at: i64,
}

impl Entry {
    pub(crate) fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            added_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn added_at(&self) -> i64 {
        self.added_at
    }

    /// Même entrée, nom débarrassé des espaces qui l'entourent
    pub(crate) fn trimmed(mut self) -> Self {
        let name = self.name.trim();
        if name.len() != self.name.len() {
            self.name = name.to_string();
        }
        self
    }

    pub(crate) fn view(&self, currently_singing: Option<&str>) -> EntryView {
        EntryView {
            id: self.id.clone(),
            name: self.name.clone(),
            added_at: self.added_at,
            is_currently_singing: currently_singing == Some(self.id.as_str()),
        }
    }
}

/// Projection d'une entrée renvoyée par l'API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: String,
    pub name: String,
    /// Millisecondes depuis epoch
    #[schema(example = 1718000000000_i64)]
    pub added_at: i64,
    pub is_currently_singing: bool,
}
