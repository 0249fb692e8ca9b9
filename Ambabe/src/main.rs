use ambconfig::get_config;
use ambqueue::QueueServerExt;
use ambserver::{HostAuth, LoggingOptions, ServerBuilder};
use ambutils::lan_addresses;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config();
    let mut server = ServerBuilder::new_configured().build();

    // ========== PHASE 1 : Infrastructure ==========
    server
        .init_logging(LoggingOptions::from_config(&config))
        .await;
    info!("Configuration loaded from {}", config.directory());

    server.init_host_auth(HostAuth::from_config()).await;

    server
        .add_route("/info", || async {
            serde_json::json!({
                "name": get_config().get_server_name(),
                "version": env!("CARGO_PKG_VERSION"),
            })
        })
        .await;

    // ========== PHASE 2 : File des chanteurs ==========
    info!("🎤 Initializing singer queue...");
    let queue = server.init_queue_api().await?;
    info!("✅ {} singer(s) waiting", queue.len().await);

    // ========== PHASE 3 : Démarrage du serveur ==========
    info!("🌐 Starting HTTP server...");
    server.start().await?;

    let port = server.info().http_port;
    let addresses = lan_addresses();
    if addresses.is_empty() {
        warn!("No LAN interface found, singers must use http://localhost:{}", port);
    }
    for (interface, ips) in addresses {
        for ip in ips {
            info!("📱 Singers ({}): http://{}:{}/", interface, ip, port);
            info!("🎛️ Host ({}): http://{}:{}/host", interface, ip, port);
        }
    }

    info!("✅ Ambabe is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    if let Err(e) = queue.flush().await {
        error!("Failed to save queue on shutdown: {}", e);
    }
    info!("👋 Ambabe stopped");
    Ok(())
}
