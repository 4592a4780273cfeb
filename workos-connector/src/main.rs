use service_core::observability::init_tracing;
use workos_connector::{config::Config, Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
