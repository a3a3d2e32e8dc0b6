use clap::Args;
use reportforge::report::{SharedSettings, TypeCatalogue};
use reportforge::server::client::ConfigClient;
use reportforge::server::ConfigPatch;
use reportforge::{ReportError, ReportResult};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Base URL of the config service.
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    pub url: String,

    /// Only publish if the service is still at this version.
    #[arg(long)]
    pub expected_version: Option<u64>,
}

/// Sends the local settings file (and catalogue override) to the service.
pub async fn run(
    args: PublishArgs,
    settings: Option<SharedSettings>,
    catalogue: Option<TypeCatalogue>,
) -> ReportResult<()> {
    let mut settings = settings.unwrap_or_default();
    if let Some(catalogue) = catalogue {
        settings.management_configs = Some(catalogue.into_entries());
    }

    if settings.base_config.is_none() && settings.management_configs.is_none() {
        return Err(ReportError::Config(
            "Nothing to publish: pass --settings and/or --catalogue".to_string(),
        ));
    }

    let mut patch = ConfigPatch::from(settings);
    patch.expected_version = args.expected_version;

    info!("Publishing shared settings to {}", args.url);
    let resp = ConfigClient::new(&args.url).push(&patch).await?;
    println!("✅ Published config version {}", resp.version);
    Ok(())
}
