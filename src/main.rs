//! Nutriflow
//!
//! An MCP server for daily macro-nutrient tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutriflow::build_info;
use nutriflow::config::Config;
use nutriflow::mcp::NutriflowService;
use nutriflow::session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriflow=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::load()?;
    eprintln!("Data directory: {}", config.data_dir.display());
    eprintln!("Catalog: {}", config.catalog_path.display());
    eprintln!("Profile: {}", config.profile_path.display());

    std::fs::create_dir_all(&config.log_dir)?;
    std::fs::create_dir_all(&config.report_dir)?;

    let today = chrono::Local::now().date_naive();
    let session = Session::open(config, today)?;

    let service = NutriflowService::new(session);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
