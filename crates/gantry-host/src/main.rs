//! Gantry host application entry point.
//!
//! Wires together the infrastructure services and starts the Tokio async
//! runtime. The dispatch pipeline itself is synchronous; the runtime only
//! hosts the channel pump and the shutdown handler.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()        -- TOML config, defaults on first run
//!  └─ HandlerRegistry      -- control modules subscribe here
//!  └─ StdinLineSource      -- reader thread feeding ConsoleLines
//!  └─ Dispatcher           -- one per channel, pumped to completion per line
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gantry_core::OutputSink;
use gantry_host::application::bus::HandlerRegistry;
use gantry_host::application::dispatch::Dispatcher;
use gantry_host::infrastructure::channel::stdin::StdinLineSource;
use gantry_host::infrastructure::channel::LineSource;
use gantry_host::infrastructure::storage::config::{load_config, override_file_path};
use gantry_host::infrastructure::storage::AppConfig;
use gantry_host::infrastructure::stream::ConsoleSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so its log level can seed the filter.
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialise structured logging. Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.dispatch.log_level.clone())),
        )
        .init();

    if let Some(e) = config_error {
        warn!("failed to load config, using defaults: {e}");
    }

    info!("Gantry host starting");

    let override_path = override_file_path(&config)?;

    // Control modules (motion planner, heaters, …) register their handlers
    // here before the registry is frozen and the channel starts.
    let registry = HandlerRegistry::new();
    let registry = Arc::new(registry);

    let mut dispatcher = Dispatcher::new(Arc::clone(&registry), &config, override_path);
    info!(channel = %dispatcher.channel_id(), handlers = registry.len(), "console channel ready");

    // ── Console channel ───────────────────────────────────────────────────────
    let sink: Arc<dyn OutputSink> = Arc::new(ConsoleSink::new());
    let source = StdinLineSource::new(Arc::clone(&sink));
    let lines = match source.start() {
        Ok(rx) => rx,
        Err(e) => {
            error!("failed to start console channel: {e}");
            return Err(e.into());
        }
    };

    // Shutdown flag shared between the pump and the signal handler.
    let running = Arc::new(AtomicBool::new(true));

    // ── Ctrl-C / SIGTERM handler ──────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    // ── Line pump ─────────────────────────────────────────────────────────────
    // One line at a time, run to completion: the dispatch pipeline is
    // synchronous by design, so it lives on a blocking thread.
    let pump_running = Arc::clone(&running);
    let pump = tokio::task::spawn_blocking(move || {
        while pump_running.load(Ordering::Relaxed) {
            match lines.recv_timeout(Duration::from_millis(100)) {
                Ok(line) => dispatcher.handle_line(&line.text, &line.sink),
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    pump.await?;
    source.stop();

    info!("Gantry host stopped");
    Ok(())
}
