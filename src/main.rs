use anyhow::{Context, Result};
use axum::http::Method;
use dotenv::dotenv;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_bites::api;
use book_bites::config::Config;
use book_bites::openai::OpenAiClient;
use book_bites::summarizer;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenv().ok();

    let config = Config::from_env();

    // Summarizer
    let client = OpenAiClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        &config.openai_model,
    );
    let summarizer = summarizer::strategy_for(config.strategy, client);

    // API router
    let api_router = api::routes(api::AppState { summarizer });

    // CORS (dev use: allow any origin/header on the read-only routes)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let app = api_router.layer(cors).layer(TraceLayer::new_for_http());

    // Bind
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid HOST/PORT")?;
    tracing::info!("listening on http://{} ({:?} strategy)", addr, config.strategy);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
