use anyhow::Result;
use tour_core::config::Config;
use tour_server::AppState;

pub fn run(config: Config, host: &str, port: u16) -> Result<()> {
    if config.database.is_none() {
        tracing::warn!(
            "SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY not set; table-backed functions will answer 500"
        );
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve_until_interrupted(config, host, port))
}

async fn serve_until_interrupted(config: Config, host: &str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    let state = AppState::new(config);

    tokio::select! {
        res = tour_server::serve_on(state, listener) => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
