use crate::reports;
use clap::Args;
use reportforge::ingest::{load_rows, validate_rows, SystemClock};
use reportforge::report::{derive_batch, TypeCatalogue};
use reportforge::ReportResult;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Spreadsheet (.xlsx, .xls, .ods), CSV or TSV file with a header row.
    pub input: PathBuf,

    /// Also derive every row and print a summary.
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}

/// Returns whether every score was in range.
pub fn run(args: ValidateArgs, catalogue: &TypeCatalogue) -> ReportResult<bool> {
    println!("\n🔎 === INPUT AUDIT === 🔎");
    let rows = load_rows(&args.input)?;
    println!("📂 {} rows from {:?}", rows.len(), args.input);

    let report = validate_rows(&rows);
    reports::print_validation_report(&report);

    if args.summary {
        let records = derive_batch(&rows, catalogue, &SystemClock);
        reports::print_record_summary(&records);
    }

    Ok(report.valid)
}
