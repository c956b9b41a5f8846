mod app;
mod banner;
mod input;
mod play;
mod typewriter;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use hauler_core::{
    config::{self, AppConfig},
    ContentLoader, SaveManager,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let loader = ContentLoader::new(&config.data_dir);
    let content = loader.content()?;
    let save_manager = SaveManager::new(&config.save_dir);
    tracing::info!(
        data = %loader.root_path().display(),
        saves = %save_manager.root().display(),
        "starting hauler"
    );

    let mut app = app::HaulerApp::new(config, content, save_manager);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("hauler.log");

    let env_filter = EnvFilter::from_default_env();

    // The terminal belongs to the UI, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
