//! docsage - Telegram bot that answers questions about uploaded PDFs
//!
//! Startup wires the pieces together and fails fast on anything broken:
//! configuration, the SQLite vector extension and the bot token are all
//! checked before the polling loop begins.

use std::sync::Arc;

use anyhow::{Context, Result};

use docsage_bot::Bot;
use docsage_config::Config;
use docsage_llm::{ChatConfig, EmbedderConfig, OpenAiChat, OpenAiEmbedder};
use docsage_telegram::BotClient;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may be set directly
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("docsage=info,warn")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    // Must happen before any index connection is opened
    docsage_index::init_vector_extension();

    let client = Arc::new(BotClient::new(&config.bot_token)?);
    let me = client
        .get_me()
        .await
        .context("bot token verification failed")?;
    tracing::info!(bot = %me.full_name(), username = ?me.username, "Authenticated");

    let chat = Arc::new(OpenAiChat::new(ChatConfig::new(
        &config.openai_api_key,
        &config.chat_model,
    ))?);
    let embedder = Arc::new(OpenAiEmbedder::new(EmbedderConfig::new(
        &config.openai_api_key,
        &config.embedding_model,
    ))?);

    let bot = Arc::new(Bot::new(config, client.clone(), embedder, chat));
    bot.run(client).await;

    Ok(())
}
