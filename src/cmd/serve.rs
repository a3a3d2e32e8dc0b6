use clap::Args;
use reportforge::report::SharedSettings;
use reportforge::server::{self, ConfigStore};
use reportforge::ReportResult;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value_t = 3001)]
    pub port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: std::net::IpAddr,

    /// Directory served for any path the API does not handle.
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, seed: Option<SharedSettings>) -> ReportResult<()> {
    let store = match seed {
        Some(settings) => {
            info!("Seeding config store from settings file");
            ConfigStore::seeded(settings)
        }
        None => ConfigStore::new(),
    };

    let addr = SocketAddr::new(args.host, args.port);
    server::serve(addr, store, args.static_dir).await?;
    Ok(())
}
