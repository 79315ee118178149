use tracing::{error, info};
use woki_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if let Err(e) = config.ensure_work_dir_structure() {
        eprintln!("Failed to prepare work dir {}: {e}", config.work_dir.display());
    }

    init_logger_with_file(
        Some(&config.log_level),
        config.log_dir().to_str(),
    );

    info!(
        environment = %config.environment,
        storage = config.storage.as_str(),
        port = config.http_port,
        "Starting woki-server"
    );

    let server = Server::new(&config).await.inspect_err(|e| {
        error!(error = %e, "Failed to initialize server");
    })?;
    server.run().await?;

    Ok(())
}
