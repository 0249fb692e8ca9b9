//! QueueCore : la file ordonnée et le pointeur « en train de chanter »
//!
//! Structure purement synchrone : chaque opération s'exécute entièrement
//! ou échoue sans rien modifier. La sérialisation des écrivains et la
//! persistance sont la responsabilité de [`QueueManager`](crate::QueueManager).

use crate::entry::{Entry, EntryView};
use crate::persistence::Snapshot;
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// État de la file
#[derive(Debug, Clone, Default)]
pub struct QueueCore {
    entries: Vec<Entry>,
    /// Référence faible (par id) vers l'entrée en train de chanter
    currently_singing: Option<String>,
    /// Incrémenté à chaque mutation réussie
    revision: u64,
}

impl QueueCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn currently_singing(&self) -> Option<&str> {
        self.currently_singing.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Projection de la file, dans l'ordre courant
    pub fn list(&self) -> Vec<EntryView> {
        let current = self.currently_singing();
        self.entries.iter().map(|e| e.view(current)).collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn new_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Inscrit un chanteur en fin de file
    ///
    /// Le nom est débarrassé des espaces qui l'entourent ; vide, il est refusé.
    pub fn add(&mut self, name: &str) -> Result<&Entry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Name is required".to_string()));
        }

        let entry = Entry::new(self.new_id(), name.to_string());
        self.entries.push(entry);
        self.touch();
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Retire une entrée ; si c'était le chanteur courant, le pointeur est effacé
    pub fn remove(&mut self, id: &str) -> Result<Entry> {
        let index = self.require(id)?;
        let removed = self.entries.remove(index);
        self.clear_current_if(id);
        self.touch();
        Ok(removed)
    }

    /// Réordonne la file
    ///
    /// Les ids de `ordered_ids` qui existent passent en tête, dans l'ordre
    /// donné ; un id inconnu est ignoré et un doublon ne place l'entrée
    /// qu'une fois. Les entrées non citées suivent, dans leur ordre relatif
    /// d'origine. Avec une liste vide, l'ordre ne change pas.
    pub fn reorder<S: AsRef<str>>(&mut self, ordered_ids: &[S]) {
        let positions: HashMap<String, usize> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id().to_string(), i))
            .collect();

        let mut pool: Vec<Option<Entry>> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(Some)
            .collect();

        let mut reordered = Vec::with_capacity(pool.len());
        for id in ordered_ids {
            if let Some(&index) = positions.get(id.as_ref()) {
                if let Some(entry) = pool[index].take() {
                    reordered.push(entry);
                }
            }
        }
        reordered.extend(pool.into_iter().flatten());

        self.entries = reordered;
        self.touch();
    }

    /// Marque (ou démarque avec `None`) le chanteur courant
    pub fn set_currently_singing(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => {
                self.require(id)?;
                self.currently_singing = Some(id.to_string());
            }
            None => self.currently_singing = None,
        }
        self.touch();
        Ok(())
    }

    /// « Terminé » : renvoie l'entrée en fin de file et efface son statut courant
    pub fn move_to_bottom(&mut self, id: &str) -> Result<()> {
        let index = self.require(id)?;
        let entry = self.entries.remove(index);
        self.entries.push(entry);
        self.clear_current_if(id);
        self.touch();
        Ok(())
    }

    fn clear_current_if(&mut self, id: &str) {
        if self.currently_singing.as_deref() == Some(id) {
            self.currently_singing = None;
        }
    }

    /// Représentation persistée de l'état courant
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            queue: self.entries.clone(),
            currently_singing_id: self.currently_singing.clone(),
            revision: self.revision,
        }
    }

    /// Reconstruit l'état depuis un snapshot en rétablissant les invariants
    ///
    /// Les noms sont débarrassés des espaces qui les entourent. Les entrées
    /// sans nom et les ids dupliqués (seule la première
    /// occurrence est gardée) sont écartés ; un `currentlySingingId` qui ne
    /// désigne plus aucune entrée est effacé.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(snapshot.queue.len());

        for entry in snapshot.queue.into_iter().map(Entry::trimmed) {
            if entry.id().is_empty() || entry.name().is_empty() {
                tracing::warn!(id = %entry.id(), "Dropping incomplete snapshot entry");
                continue;
            }
            if !seen.insert(entry.id().to_string()) {
                tracing::warn!(id = %entry.id(), "Dropping duplicate snapshot entry");
                continue;
            }
            entries.push(entry);
        }

        let currently_singing = snapshot
            .currently_singing_id
            .filter(|id| seen.contains(id.as_str()));

        Self {
            entries,
            currently_singing,
            revision: snapshot.revision,
        }
    }
}
