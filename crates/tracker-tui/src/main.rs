mod app;
mod component;
mod components;
mod keys;
mod theme;
mod widgets;

use anyhow::Context;
use tracker_core::config::Config;
use tracker_core::platform;
use tracker_core::retrieval::{RetrievalSettings, Retriever};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::try_data_dir().context("cannot resolve home directory")?;
    let catalog_dir = platform::catalog_dir();
    let media_dir = platform::media_dir();
    for dir in [&data_dir, &catalog_dir, &media_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let log_path = platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    // Allow RUST_LOG override; default to debug for app code but keep the
    // HTTP client internals quiet.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("tracker-tui log: {}", log_path.display());

    tracing::info!("tracker-tui starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load()?;

    // ── Retrieval ────────────────────────────────────────────────────────────
    let settings = RetrievalSettings::from_config(&config.retrieval, catalog_dir, media_dir);
    tracing::info!(
        "catalogs in {}, media in {}, yt-dlp at {}",
        settings.catalog_dir.display(),
        settings.media_dir.display(),
        settings.yt_dlp.display()
    );
    let retriever = Retriever::new(settings).context("building HTTP client")?;

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(&config, retriever);
    app.run().await?;

    tracing::info!("tracker-tui exiting");
    Ok(())
}
