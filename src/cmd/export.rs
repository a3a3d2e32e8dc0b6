use crate::reports;
use clap::Args;
use reportforge::config::Config;
use reportforge::export::{ExportFormat, ExportOrchestrator, ReportSurface};
use reportforge::ingest::load_rows;
use reportforge::render::SnapshotRenderer;
use reportforge::report::{BaseConfig, TypeCatalogue};
use reportforge::server::client::ConfigClient;
use reportforge::{ReportError, ReportResult, ReportSession};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub config: Config,

    /// Spreadsheet (.xlsx, .xls, .ods), CSV or TSV file with a header row.
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Html)]
    pub format: ExportFormat,

    #[arg(short, long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Export only the report at this 1-based position instead of the batch.
    #[arg(long)]
    pub only: Option<usize>,

    /// Pull shared settings from a running config service.
    #[arg(long)]
    pub config_url: Option<String>,

    /// Refuse to export when any score is out of range.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

pub async fn run(args: ExportArgs, catalogue: TypeCatalogue, base: BaseConfig) -> ReportResult<()> {
    if args.only == Some(0) {
        return Err(ReportError::Config(
            "--only takes a 1-based position, got 0".to_string(),
        ));
    }

    let rows = load_rows(&args.input)?;
    let mut session = ReportSession::new(catalogue, base);

    if let Some(url) = &args.config_url {
        match ConfigClient::new(url).fetch_settings().await {
            Ok(settings) => session.apply_shared(settings),
            Err(e) => warn!("Could not fetch shared settings from {}: {}", url, e),
        }
    }

    let validation = session.load(rows);
    reports::print_validation_report(&validation);
    if args.strict && !validation.valid {
        return Err(ReportError::Config(format!(
            "{} score(s) out of range, refusing to export",
            validation.errors.len()
        )));
    }
    reports::print_record_summary(session.records());

    fs::create_dir_all(&args.out_dir)?;
    let mut orchestrator = ExportOrchestrator::builder()
        .capture(SnapshotRenderer::new(&args.config.render))
        .settings(args.config.export.clone())
        .build();

    if let Some(position) = args.only {
        session.select(position - 1)?;
        let artifact = orchestrator.export_single(&session, args.format).await?;
        let path = args.out_dir.join(&artifact.file_name);
        fs::write(&path, &artifact.bytes)?;
        println!("✅ Wrote {:?}", path);
        return Ok(());
    }

    let outcome = orchestrator
        .export_batch(&mut session, args.format, |current, total| {
            info!("Exporting {}/{}", current, total);
        })
        .await?;

    let path = args.out_dir.join(&outcome.archive_name);
    fs::write(&path, &outcome.bytes)?;
    reports::print_batch_outcome(&outcome);
    println!("✅ Wrote {:?}", path);
    Ok(())
}
