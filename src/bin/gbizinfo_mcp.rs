use anyhow::Context;
use gbizinfo_mcp::utils::logger;
use gbizinfo_mcp::{build_controller, AppConfig, McpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            logger::init_mcp_logger(false);
            tracing::error!(
                "❌ Configuration failed: {} (Category: {:?})",
                e,
                e.category()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_mcp_logger(config.debug);
    tracing::info!("Starting {} v{}", gbizinfo_mcp::mcp::server::SERVER_NAME, env!("CARGO_PKG_VERSION"));

    let server = McpServer::new(build_controller(&config));
    server.run().await.context("MCP server loop failed")?;
    Ok(())
}
