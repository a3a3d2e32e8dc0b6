use clap::{Parser, Subcommand};
use reportforge::report::{BaseConfig, SharedSettings, TypeCatalogue};
use reportforge::ReportResult;
use std::path::PathBuf;
use std::process;
use tracing::{info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON with `baseConfig` and/or `managementConfigs`.
    #[arg(global = true, short, long)]
    settings: Option<PathBuf>,

    /// JSON map of type name to type detail. Overrides `managementConfigs`.
    #[arg(global = true, long)]
    catalogue: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Validate(cmd::validate::ValidateArgs),
    Export(cmd::export::ExportArgs),
    Serve(cmd::serve::ServeArgs),
    /// Push the local settings to a running config service.
    Publish(cmd::publish::PublishArgs),
}

fn load_settings(cli: &Cli) -> ReportResult<Option<SharedSettings>> {
    cli.settings
        .as_ref()
        .map(|path| {
            info!("Loading settings from {:?}", path);
            SharedSettings::load_from_file(path)
        })
        .transpose()
}

fn resolve_visuals(
    cli: &Cli,
    settings: Option<&SharedSettings>,
) -> ReportResult<(TypeCatalogue, BaseConfig)> {
    let base = settings
        .and_then(|s| s.base_config.clone())
        .unwrap_or_default();

    let catalogue = match (&cli.catalogue, settings.and_then(|s| s.management_configs.clone())) {
        (Some(path), _) => {
            info!("Loading type catalogue from {:?}", path);
            TypeCatalogue::load_from_file(path)?
        }
        (None, Some(entries)) => TypeCatalogue::new(entries),
        (None, None) => {
            warn!("No type catalogue configured. Using built-in descriptions.");
            TypeCatalogue::default()
        }
    };

    Ok((catalogue, base))
}

async fn execute(cli: Cli) -> ReportResult<bool> {
    let settings = load_settings(&cli)?;

    match &cli.command {
        Commands::Validate(args) => {
            let (catalogue, _) = resolve_visuals(&cli, settings.as_ref())?;
            cmd::validate::run(args.clone(), &catalogue)
        }
        Commands::Export(args) => {
            let (catalogue, base) = resolve_visuals(&cli, settings.as_ref())?;
            cmd::export::run(args.clone(), catalogue, base).await?;
            Ok(true)
        }
        Commands::Serve(args) => {
            cmd::serve::run(args.clone(), settings).await?;
            Ok(true)
        }
        Commands::Publish(args) => {
            let catalogue = cli
                .catalogue
                .as_ref()
                .map(TypeCatalogue::load_from_file)
                .transpose()?;
            cmd::publish::run(args.clone(), settings, catalogue).await?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    println!("\n🚀 ReportForge {}", env!("CARGO_PKG_VERSION"));

    match execute(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("\n❌ FATAL ERROR:");
            eprintln!("   {}", e);
            process::exit(1);
        }
    }
}
