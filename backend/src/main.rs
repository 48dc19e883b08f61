use std::{panic, process, sync::Arc};
use backend::{build_rocket, config::Config, lifecycle::Lifecycle, store::shared_store};
use shared::VoteStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn install_panic_hook(lifecycle: Arc<Lifecycle>) {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        default_hook(info);
        lifecycle.try_finalize("uncaught panic");
        process::exit(1);
    }));
}

#[rocket::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting vote server");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(2);
        }
    };

    let store = match VoteStore::load(&config.db_path) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialise vote store: {}", e);
            process::exit(1);
        }
    };

    let lifecycle = Arc::new(Lifecycle::new(shared_store(store)));
    install_panic_hook(Arc::clone(&lifecycle));

    match build_rocket(&config, Arc::clone(&lifecycle)).launch().await {
        Ok(_) => {
            lifecycle.finalize("exit");
            info!("👋 Vote server stopped");
        }
        Err(e) => {
            error!("Server failed: {}", e);
            lifecycle.finalize("launch failure");
            process::exit(1);
        }
    }
}
