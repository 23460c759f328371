use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rosterd::http::{router, AppState};
use rosterd::seed;
use rosterd::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = std::env::var("ROSTERD_DB").unwrap_or_else(|_| "./rosterd.sqlite3".to_string());
    let port: u16 = std::env::var("ROSTERD_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    let store = Store::open(Path::new(&db_path))
        .with_context(|| format!("while opening store at {db_path}"))?;
    let seeded = seed::ensure_seed_teachers(&store)?;
    info!(
        db = %db_path,
        teachers = seeded.len(),
        "store ready, teacher roster seeded"
    );

    let app = router(AppState::new(store));
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
