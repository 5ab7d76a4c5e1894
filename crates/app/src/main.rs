use std::net::SocketAddr;

use engine::{Engine, JsonFileStore, MemoryStore};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kyfh={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let builder = Engine::builder();
    let builder = if settings.store.memory {
        tracing::info!("Using in-memory ledger store");
        builder.store(MemoryStore::new())
    } else {
        tracing::info!("Using ledger store at {}", settings.store.path.display());
        builder.store(JsonFileStore::new(&settings.store.path))
    };
    let engine = builder.build()?;

    let addr: SocketAddr = format!("{}:{}", settings.server.bind, settings.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = server::app_with_origins(engine, &settings.server.cors_origins);
    server::run_with_listener(app, listener).await?;

    Ok(())
}
