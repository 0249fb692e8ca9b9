// logs.rs
mod buffer_layer;

use ambconfig::Config;
pub use buffer_layer::BufferLayer;

use std::{
    collections::VecDeque,
    sync::{Arc, RwLock},
    time::SystemTime,
};

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    Registry,
    filter::LevelFilter,
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
};

/// Représente une entrée de log
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Buffer circulaire partagé
#[derive(Clone)]
pub struct LogState {
    buffer: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
    max_level: Arc<RwLock<Level>>,
    reload_handle: Option<Arc<reload::Handle<LevelFilter, Registry>>>,
}

impl LogState {
    /// Crée un état sans filtre rechargeable (le niveau n'est alors que déclaratif)
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
            max_level: Arc::new(RwLock::new(Level::TRACE)),
            reload_handle: None,
        }
    }

    fn with_reload(
        capacity: usize,
        level: Level,
        reload_handle: reload::Handle<LevelFilter, Registry>,
    ) -> Self {
        let mut state = Self::new(capacity);
        state.max_level = Arc::new(RwLock::new(level));
        state.reload_handle = Some(Arc::new(reload_handle));
        state
    }

    pub fn set_max_level(&self, level: Level) {
        *self
            .max_level
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = level;

        if let Some(handle) = &self.reload_handle {
            if let Err(e) = handle.reload(LevelFilter::from_level(level)) {
                tracing::error!("Failed to reload log level filter: {}", e);
            }
        }
    }

    pub fn get_max_level(&self) -> Level {
        *self
            .max_level
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn push(&self, entry: LogEntry) {
        let mut buf = self
            .buffer
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(entry);
    }

    pub fn dump(&self) -> Vec<LogEntry> {
        self.buffer
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

/// Query params pour /log-dump
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub warn: Option<bool>,
    #[serde(default)]
    pub info: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub trace: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Handler REST (dump JSON du buffer, filtrable)
pub async fn log_dump(
    State(state): State<LogState>,
    Query(params): Query<LogQuery>,
) -> impl IntoResponse {
    let entries: Vec<LogEntry> = state
        .dump()
        .into_iter()
        .filter(|entry| filter_entry(entry, &params))
        .collect();
    Json(entries)
}

/// Fonction de filtrage
fn filter_entry(entry: &LogEntry, q: &LogQuery) -> bool {
    let lvl = entry.level.to_lowercase();
    let flags = [
        (q.error, "error"),
        (q.warn, "warn"),
        (q.info, "info"),
        (q.debug, "debug"),
        (q.trace, "trace"),
    ];

    // si aucun flag → tout est autorisé
    let any_flag = flags.iter().any(|(flag, _)| flag.unwrap_or(false));
    let mut allowed = !any_flag
        || flags
            .iter()
            .any(|(flag, name)| flag.unwrap_or(false) && lvl == *name);

    if let Some(search) = &q.search {
        allowed &= entry.message.contains(search) || entry.target.contains(search);
    }

    allowed
}

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Capacité du buffer circulaire (nombre d'entrées conservées)
    pub buffer_capacity: usize,
    /// Activer la sortie vers stderr/stdout
    pub enable_console: bool,
    /// Niveau minimum au démarrage
    pub min_level: Level,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 1000,
            enable_console: true,
            min_level: Level::INFO,
        }
    }
}

impl LoggingOptions {
    /// Lit les options depuis la section `host.logger` de la configuration
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            buffer_capacity: config
                .get_log_cache_size()
                .unwrap_or(defaults.buffer_capacity),
            enable_console: config
                .get_log_enable_console()
                .unwrap_or(defaults.enable_console),
            min_level: config
                .get_log_min_level()
                .ok()
                .and_then(|l| string_to_level(&l))
                .unwrap_or(defaults.min_level),
        }
    }
}

/// Initialise le système de logging (buffer + console optionnelle)
///
/// Le filtre rechargeable est placé avant les autres couches pour que
/// `/api/logs/log_setup` agisse à la fois sur le buffer et sur la console.
/// Si un subscriber global est déjà installé, l'erreur est ignorée et le
/// `LogState` retourné ne capture simplement rien.
pub fn init_logging(options: LoggingOptions) -> LogState {
    let (filter, reload_handle) = reload::Layer::new(LevelFilter::from_level(options.min_level));

    let log_state =
        LogState::with_reload(options.buffer_capacity, options.min_level, reload_handle);

    let subscriber = Registry::default()
        .with(filter)
        .with(BufferLayer::new(log_state.clone()));

    let result = if options.enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }

    log_state
}

/// Request body pour la configuration du logging
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogSetupRequest {
    pub level: String,
}

/// Response pour la configuration du logging
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogSetupResponse {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

impl LogSetupResponse {
    fn new(level: Level) -> Self {
        Self {
            current_level: level_to_string(level),
            available_levels: ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Handler pour GET /api/logs/log_setup - retourne la configuration actuelle
#[utoipa::path(
    get,
    path = "/api/logs/log_setup",
    responses(
        (status = 200, description = "Log configuration retrieved successfully", body = LogSetupResponse)
    ),
    tag = "logs"
)]
pub async fn log_setup_get(State(state): State<LogState>) -> impl IntoResponse {
    Json(LogSetupResponse::new(state.get_max_level()))
}

/// Handler pour POST /api/logs/log_setup - met à jour le niveau de log
#[utoipa::path(
    post,
    path = "/api/logs/log_setup",
    request_body = LogSetupRequest,
    responses(
        (status = 200, description = "Log level updated successfully", body = LogSetupResponse),
        (status = 400, description = "Invalid log level")
    ),
    tag = "logs"
)]
pub async fn log_setup_post(
    State(state): State<LogState>,
    Json(payload): Json<LogSetupRequest>,
) -> impl IntoResponse {
    let Some(level) = string_to_level(&payload.level) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Invalid log level. Must be one of: ERROR, WARN, INFO, DEBUG, TRACE"
            })),
        )
            .into_response();
    };

    state.set_max_level(level);
    tracing::info!("Log level changed to: {}", payload.level);

    (StatusCode::OK, Json(LogSetupResponse::new(level))).into_response()
}

pub(crate) fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_to_string(level: Level) -> String {
    level.as_str().to_string()
}

/// Crée le router pour l'API de gestion des logs
///
/// Les chemins sont absolus : le router est fusionné tel quel par
/// [`Server::add_openapi`](crate::Server::add_openapi).
pub fn create_logs_router(log_state: LogState) -> axum::Router {
    use axum::routing::get;
    axum::Router::new()
        .route(
            "/api/logs/log_setup",
            get(log_setup_get).post(log_setup_post),
        )
        .with_state(log_state)
}

/// API OpenAPI pour la gestion des logs
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        log_setup_get,
        log_setup_post,
    ),
    components(
        schemas(LogSetupRequest, LogSetupResponse)
    ),
    tags(
        (name = "logs", description = "Log level configuration endpoints")
    )
)]
pub struct LogsApiDoc;
