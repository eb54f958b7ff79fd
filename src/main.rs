#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::path::Path;

    use anyhow::Context;
    use tracing::{error, info};
    use tracing_subscriber::EnvFilter;

    use gridwalk::config::GameConfig;
    use gridwalk::host::{self, script::Script};
    use gridwalk::render::text::TextSink;

    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr, the board to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Gridwalk v{}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load_or_default();
    config.validate().context("Invalid configuration")?;
    info!(
        "Configuration loaded: {}x{} grid, speed {} {}, bounds {}, keys {}",
        config.grid_cols,
        config.grid_rows,
        config.player_speed,
        config.speed_unit,
        config.bounds_policy,
        config.key_layout
    );

    let script = match std::env::args().nth(1) {
        Some(path) => Script::load(Path::new(&path))
            .with_context(|| format!("Failed to load replay script '{}'", path))?,
        None => {
            info!("No script given, playing the built-in demo");
            Script::demo()
        }
    };

    // Shutdown signal handler
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    let summary = host::run(&config, &script, TextSink::new(std::io::stdout()), shutdown).await;
    if summary.interrupted {
        info!("Stopped early at tick {}", summary.ticks);
    }

    Ok(())
}

/// The browser build starts through `gridwalk::web::start`
#[cfg(target_arch = "wasm32")]
fn main() {}
