use std::process;
use std::sync::Arc;

use blogs::config::{Config, StoreBackend};
use blogs::{Error, MemoryStore, PgStore, Server, Store, logging};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: failed to load configuration: {e}");
            process::exit(1);
        }
    };
    logging::init(&config.log.filter);

    if let Err(e) = run(config).await {
        error!("{e}");
        process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let addr = config.socket_addr()?;

    let store: Store = match config.store.backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            warn!("using the in-memory store; posts will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };
    info!(backend = ?config.store.backend, "store ready");

    let app = blogs::routes(store).method_override(config.server.method_override);
    Server::bind(addr)
        .max_body_bytes(config.server.max_body_bytes)
        .serve(app)
        .await
}
