use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use coinfolio_backend::app;
use coinfolio_backend::config::{AppConfig, StoreBackend};
use coinfolio_backend::external::gemini::GeminiProvider;
use coinfolio_backend::logging::{init_logging, LoggingConfig};
use coinfolio_backend::services::assistant_gateway::AssistantGateway;
use coinfolio_backend::state::AppState;
use coinfolio_backend::store::{ConversationStore, MemoryStore, PgStore, PortfolioStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(&LoggingConfig::from_env()?)?;

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    if config.assistant.credential().is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, assistant requests will fail until it is provided");
    }
    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set, every caller is treated as signed out");
    }

    let (portfolio_store, conversation_store): (Arc<dyn PortfolioStore>, Arc<dyn ConversationStore>) =
        match config.store_backend {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set for the postgres store")?;
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .context("Failed to connect to Postgres")?;
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;

                tracing::info!("Using Postgres store");
                let store = Arc::new(PgStore::new(pool));
                (store.clone() as Arc<dyn PortfolioStore>, store as Arc<dyn ConversationStore>)
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store, data is lost on restart");
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn PortfolioStore>, store as Arc<dyn ConversationStore>)
            }
        };

    let provider = GeminiProvider::from_config(&config.assistant)?;
    tracing::info!("Assistant model: {}", config.assistant.model);
    let gateway = AssistantGateway::new(config.assistant.clone(), Arc::new(provider));

    let state = AppState {
        portfolio_store,
        conversation_store,
        gateway: Arc::new(gateway),
        jwt_secret: config.jwt_secret.clone(),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Coinfolio backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
