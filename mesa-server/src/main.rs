use mesa_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. dotenv + logging
    setup_environment()?;

    print_banner();
    tracing::info!("Mesa server starting...");

    // 2. configuration
    let config = Config::from_env();

    // 3. database, services, sample data
    let state = ServerState::initialize(&config).await?;

    // 4. serve (background tasks start inside run)
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
