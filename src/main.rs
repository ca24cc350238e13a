use anyhow::Context;

use pharma_maturity::config::AppConfig;
use pharma_maturity::llm::create_provider;
use pharma_maturity::sessions::{build_cors_layer, spawn_expiry_task};
use pharma_maturity::warehouse::create_warehouse;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    eprintln!("Pharma Maturity v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Scoring: {:?}", config.scoring);
    eprintln!("   Warehouse table: {}", config.table);
    eprintln!("   API: http://0.0.0.0:{}/api/sessions\n", config.port);

    let llm = create_provider(&config.llm).context("Failed to create LLM provider")?;
    let warehouse = create_warehouse(&config.warehouse)
        .await
        .context("Failed to open warehouse")?;

    let (app, store) = pharma_maturity::build_app(
        llm,
        warehouse,
        config.table.clone(),
        config.scoring,
        config.session_idle_timeout(),
    );
    let app = app.layer(build_cors_layer(&config.cors));

    // Sweep idle sessions every 60s
    let _expiry_handle = spawn_expiry_task(store);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "HTTP server started");
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
