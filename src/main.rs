use anyhow::Result;
use medium_harvest::{
    app::HarvestApp,
    config,
    infrastructure::{directories, logging, shutdown},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let (shutdown, _) = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = HarvestApp::initialize(config, paths, shutdown)?;
    app.run().await
}
