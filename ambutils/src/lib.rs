//! Utilitaires réseau pour Ambabe.
//!
//! Les chanteurs rejoignent la file depuis leur téléphone : le serveur doit
//! donc annoncer une adresse joignable sur le réseau local, pas `localhost`.
//!
//! - [`guess_local_ip`] : devine l'adresse IP utilisée pour les connexions sortantes
//! - [`lan_addresses`] : liste les adresses IPv4 non-loopback des interfaces
mod ip_utils;

pub use ip_utils::{guess_local_ip, lan_addresses};
