//! HuduAssist KE server binary
//!
//! Run with: cargo run -p hudu-rag --bin hudu-rag-server

use hudu_rag::{
    config::{RagConfig, API_KEY_ENV},
    server::RagServer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hudu_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                   HuduAssist KE 🇰🇪 API                    ║
║        Kenyan Government Information Q&A Service          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Upload policy: {:?}", config.upload.accept);
    tracing::info!("  - General queries: {}", config.llm.general_queries);

    if config.api_key_configured() {
        tracing::info!("{} is set", API_KEY_ENV);
    } else {
        tracing::warn!("{} is not set; /health will report degraded", API_KEY_ENV);
        tracing::warn!("Uploads and queries fail until the key is configured");
    }

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /upload        - Upload a document");
    println!("  POST   /upload-url    - Ingest a document from a URL");
    println!("  POST   /query         - Ask a question");
    println!("  GET    /sessions      - List sessions");
    println!("  DELETE /session/:id   - Delete a session");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
