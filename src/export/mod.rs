pub mod archive;
pub mod orchestrator;

pub use self::archive::{ArchiveBuilder, ArchiveEntry, TarGzArchive};
pub use self::orchestrator::{BatchOutcome, ExportOrchestrator, ItemOutcome};

use crate::error::ReportResult;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::future::Future;
use strum_macros::{Display, EnumIter, EnumString};

/// Artifact encodings: a markup snapshot, two raster images and a paginated
/// document.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Png,
    Jpeg,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// What a capture needs to produce any encoding of the active report.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSource {
    pub name: String,
    pub markup: String,
    pub page_svg: String,
}

/// Anything that can hand out a snapshot of what it currently shows.
pub trait Capturable {
    fn snapshot_source(&self) -> SnapshotSource;
}

/// The rendering surface a batch walks over. Exactly one record is active at
/// a time; switching it is a visible side effect.
pub trait ReportSurface {
    fn record_count(&self) -> usize;
    fn active_index(&self) -> Option<usize>;
    fn select(&mut self, index: usize) -> ReportResult<()>;
    fn active_view(&self) -> Option<&dyn Capturable>;

    /// Restores a previously observed selection. `None` leaves nothing to do.
    fn restore(&mut self, previous: Option<usize>) -> ReportResult<()> {
        match previous {
            Some(index) => self.select(index),
            None => Ok(()),
        }
    }
}

/// Turns a snapshot into bytes of the requested encoding.
pub trait RenderCapture: Send + Sync {
    fn capture(
        &self,
        source: &SnapshotSource,
        format: ExportFormat,
    ) -> impl Future<Output = ReportResult<Vec<u8>>> + Send;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

pub fn artifact_name(record_name: &str, format: ExportFormat) -> String {
    format!("{}_report.{}", record_name, format.extension())
}
