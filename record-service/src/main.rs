use record_service::{
    config::{RecordConfig, SERVICE_NAME},
    Application,
};
use service_core::error::AppError;
use service_core::observability::{init_tracing, install_panic_hook};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Missing MONGODB_URI ends the process here, before anything is bound
    let config = RecordConfig::load()?;

    init_tracing(
        SERVICE_NAME,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;
    install_panic_hook();

    tracing::info!(
        service = SERVICE_NAME,
        version = env!("CARGO_PKG_VERSION"),
        "Starting record service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
