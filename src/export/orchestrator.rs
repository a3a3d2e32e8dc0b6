use super::{
    artifact_name, ArchiveBuilder, ArchiveEntry, ExportArtifact, ExportFormat, RenderCapture,
    ReportSurface, TarGzArchive,
};
use crate::config::{ExportSettings, FailurePolicy};
use crate::error::{ReportError, ReportResult};
use crate::ingest::{Clock, SystemClock};
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchProgress {
    pub state: BatchState,
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ItemOutcome {
    Exported { index: usize, file_name: String },
    Failed { index: usize, reason: String },
}

impl ItemOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self, ItemOutcome::Exported { .. })
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub archive_name: String,
    pub bytes: Vec<u8>,
    /// One entry per record, in input order.
    pub items: Vec<ItemOutcome>,
}

impl BatchOutcome {
    pub fn exported_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_exported()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.len() - self.exported_count()
    }
}

/// Puts the surface back on the record that was active before the batch,
/// whichever way the batch ends.
struct SelectionGuard<'a, S: ReportSurface + ?Sized> {
    surface: &'a mut S,
    previous: Option<usize>,
}

impl<'a, S: ReportSurface + ?Sized> SelectionGuard<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        let previous = surface.active_index();
        Self { surface, previous }
    }
}

impl<S: ReportSurface + ?Sized> Deref for SelectionGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: ReportSurface + ?Sized> DerefMut for SelectionGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: ReportSurface + ?Sized> Drop for SelectionGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.surface.restore(self.previous) {
            error!("Failed to restore active report {:?}: {}", self.previous, e);
        }
    }
}

/// Resets progress to idle (0, 0) when dropped.
struct ProgressGuard<'a>(&'a mut BatchProgress);

impl ProgressGuard<'_> {
    fn advance(&mut self, current: usize) {
        self.0.current = current;
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        *self.0 = BatchProgress::default();
    }
}

async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Sequences selection, settling, capture and packaging for one or many
/// reports. Capture and archive capabilities are fixed at construction.
#[derive(TypedBuilder)]
pub struct ExportOrchestrator<C: RenderCapture> {
    capture: C,
    #[builder(default = Box::new(TarGzArchive) as Box<dyn ArchiveBuilder>)]
    archive: Box<dyn ArchiveBuilder>,
    #[builder(default)]
    settings: ExportSettings,
    #[builder(default = Box::new(SystemClock) as Box<dyn Clock>)]
    clock: Box<dyn Clock>,
    #[builder(default, setter(skip))]
    progress: BatchProgress,
}

impl<C: RenderCapture> ExportOrchestrator<C> {
    pub fn progress(&self) -> BatchProgress {
        self.progress
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn archive_name(&self, format: ExportFormat) -> String {
        format!(
            "{}_batch_export_{}.{}",
            format,
            self.clock.today().format("%Y-%m-%d"),
            self.archive.extension()
        )
    }

    /// Captures whatever the surface currently shows. Any failure is returned
    /// to the caller.
    pub async fn export_single<S: ReportSurface + ?Sized>(
        &self,
        surface: &S,
        format: ExportFormat,
    ) -> ReportResult<ExportArtifact> {
        settle(self.settings.single_settle()).await;

        let source = surface
            .active_view()
            .ok_or(ReportError::NoSelection)?
            .snapshot_source();

        let bytes = self.capture.capture(&source, format).await.map_err(|e| {
            error!("Export of '{}' as {} failed: {}", source.name, format, e);
            e
        })?;

        let file_name = artifact_name(&source.name, format);
        info!("Exported {} ({} bytes)", file_name, bytes.len());
        Ok(ExportArtifact {
            file_name,
            format,
            bytes,
        })
    }

    /// Exports every record in input order and bundles the results.
    ///
    /// `on_progress` is called once per record with `(done, total)`, whether
    /// or not that record succeeded. Under [`FailurePolicy::SkipFailed`] a
    /// capture failure is logged and recorded in the outcome; only an archive
    /// failure fails the batch. Selection and progress are restored on every
    /// exit path, including unwinding.
    pub async fn export_batch<S, F>(
        &mut self,
        surface: &mut S,
        format: ExportFormat,
        mut on_progress: F,
    ) -> ReportResult<BatchOutcome>
    where
        S: ReportSurface + ?Sized,
        F: FnMut(usize, usize),
    {
        let total = surface.record_count();
        if total == 0 {
            warn!("Batch export requested with no reports loaded");
            return Err(ReportError::EmptyBatch);
        }

        info!("Batch export of {} reports as {}", total, format);
        self.progress = BatchProgress {
            state: BatchState::Running,
            current: 0,
            total,
        };

        let delay = self.settings.batch_settle();
        let policy = self.settings.failure_policy;
        let capture = &self.capture;
        let mut progress = ProgressGuard(&mut self.progress);
        let mut guard = SelectionGuard::new(surface);

        let mut entries = Vec::with_capacity(total);
        let mut items = Vec::with_capacity(total);
        let mut aborted = None;

        for index in 0..total {
            match capture_record(capture, &mut *guard, index, format, delay).await {
                Ok(artifact) => {
                    debug!("[{}/{}] {}", index + 1, total, artifact.file_name);
                    items.push(ItemOutcome::Exported {
                        index,
                        file_name: artifact.file_name.clone(),
                    });
                    entries.push(ArchiveEntry::new(artifact.file_name, artifact.bytes));
                }
                Err(e) => {
                    error!("[{}/{}] capture failed, skipping: {}", index + 1, total, e);
                    items.push(ItemOutcome::Failed {
                        index,
                        reason: e.to_string(),
                    });
                    if policy == FailurePolicy::AbortOnFirst {
                        aborted = Some(e);
                    }
                }
            }

            progress.advance(index + 1);
            on_progress(index + 1, total);

            if aborted.is_some() {
                break;
            }
        }

        drop(guard);

        if let Some(e) = aborted {
            return Err(e);
        }

        let bytes = self.archive.bundle(&entries).map_err(|e| {
            error!("Archive finalization failed: {}", e);
            match e {
                ReportError::Archive(_) => e,
                other => ReportError::Archive(other.to_string()),
            }
        })?;
        drop(progress);

        let outcome = BatchOutcome {
            archive_name: self.archive_name(format),
            bytes,
            items,
        };
        info!(
            "Batch export finished: {} exported, {} failed -> {}",
            outcome.exported_count(),
            outcome.failed_count(),
            outcome.archive_name
        );
        Ok(outcome)
    }
}

async fn capture_record<C, S>(
    capture: &C,
    surface: &mut S,
    index: usize,
    format: ExportFormat,
    delay: Duration,
) -> ReportResult<ExportArtifact>
where
    C: RenderCapture,
    S: ReportSurface + ?Sized,
{
    surface.select(index)?;
    settle(delay).await;

    let source = surface
        .active_view()
        .ok_or_else(|| ReportError::capture(format!("#{}", index + 1), "no active view"))?
        .snapshot_source();

    let bytes = capture.capture(&source, format).await?;
    Ok(ExportArtifact {
        file_name: artifact_name(&source.name, format),
        format,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{Capturable, SnapshotSource};
    use crate::ingest::FixedClock;
    use chrono::NaiveDate;
    use std::future::Future;

    struct Page(String);

    impl Capturable for Page {
        fn snapshot_source(&self) -> SnapshotSource {
            SnapshotSource {
                name: self.0.clone(),
                markup: format!("<p>{}</p>", self.0),
                page_svg: String::new(),
            }
        }
    }

    struct FakeSurface {
        pages: Vec<Page>,
        active: Option<usize>,
        selections: Vec<usize>,
    }

    impl FakeSurface {
        fn new(names: &[&str]) -> Self {
            Self {
                pages: names.iter().map(|n| Page(n.to_string())).collect(),
                active: if names.is_empty() { None } else { Some(0) },
                selections: Vec::new(),
            }
        }
    }

    impl ReportSurface for FakeSurface {
        fn record_count(&self) -> usize {
            self.pages.len()
        }

        fn active_index(&self) -> Option<usize> {
            self.active
        }

        fn select(&mut self, index: usize) -> ReportResult<()> {
            self.selections.push(index);
            self.active = Some(index);
            Ok(())
        }

        fn active_view(&self) -> Option<&dyn Capturable> {
            self.active
                .and_then(|i| self.pages.get(i))
                .map(|p| p as &dyn Capturable)
        }
    }

    /// Echoes the markup; fails for names listed in `fail_for`.
    struct EchoCapture {
        fail_for: Vec<String>,
    }

    impl RenderCapture for EchoCapture {
        fn capture(
            &self,
            source: &SnapshotSource,
            _format: ExportFormat,
        ) -> impl Future<Output = ReportResult<Vec<u8>>> + Send {
            let result = if self.fail_for.contains(&source.name) {
                Err(ReportError::capture(&source.name, "boom"))
            } else {
                Ok(source.markup.clone().into_bytes())
            };
            async move { result }
        }
    }

    struct BrokenArchive;

    impl ArchiveBuilder for BrokenArchive {
        fn extension(&self) -> &str {
            "zip"
        }

        fn bundle(&self, _entries: &[ArchiveEntry]) -> ReportResult<Vec<u8>> {
            Err(ReportError::Archive("disk full".to_string()))
        }
    }

    fn orchestrator(fail_for: &[&str]) -> ExportOrchestrator<EchoCapture> {
        ExportOrchestrator::builder()
            .capture(EchoCapture {
                fail_for: fail_for.iter().map(|s| s.to_string()).collect(),
            })
            .settings(ExportSettings::immediate())
            .clock(Box::new(FixedClock(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap())))
            .build()
    }

    #[tokio::test]
    async fn test_single_export_names_artifact() {
        let surface = FakeSurface::new(&["张三"]);
        let artifact = orchestrator(&[])
            .export_single(&surface, ExportFormat::Html)
            .await
            .unwrap();
        assert_eq!(artifact.file_name, "张三_report.html");
        assert_eq!(artifact.bytes, b"<p>\xE5\xBC\xA0\xE4\xB8\x89</p>".to_vec());
    }

    #[tokio::test]
    async fn test_single_export_propagates_failure() {
        let surface = FakeSurface::new(&["张三"]);
        let err = orchestrator(&["张三"])
            .export_single(&surface, ExportFormat::Png)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Capture { .. }));
    }

    #[tokio::test]
    async fn test_single_export_without_selection() {
        let mut surface = FakeSurface::new(&["张三"]);
        surface.active = None;
        let err = orchestrator(&[])
            .export_single(&surface, ExportFormat::Html)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::NoSelection));
    }

    #[tokio::test]
    async fn test_batch_progress_and_restore() {
        let mut surface = FakeSurface::new(&["a", "b", "c", "d"]);
        surface.active = Some(2);
        let mut orch = orchestrator(&[]);
        let mut calls = Vec::new();

        let outcome = orch
            .export_batch(&mut surface, ExportFormat::Pdf, |c, t| calls.push((c, t)))
            .await
            .unwrap();

        assert_eq!(calls, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
        assert_eq!(surface.active, Some(2));
        assert_eq!(surface.selections, vec![0, 1, 2, 3, 2]);
        assert_eq!(outcome.exported_count(), 4);
        assert_eq!(outcome.archive_name, "pdf_batch_export_2025-03-09.tar.gz");
        assert_eq!(orch.progress(), BatchProgress::default());
    }

    #[tokio::test]
    async fn test_batch_skips_failed_item() {
        let mut surface = FakeSurface::new(&["a", "b", "c"]);
        let mut orch = orchestrator(&["b"]);
        let mut calls = 0;

        let outcome = orch
            .export_batch(&mut surface, ExportFormat::Html, |_, _| calls += 1)
            .await
            .unwrap();

        assert_eq!(calls, 3);
        assert_eq!(outcome.exported_count(), 2);
        assert_eq!(outcome.failed_count(), 1);
        assert!(matches!(outcome.items[1], ItemOutcome::Failed { index: 1, .. }));
        assert_eq!(surface.active, Some(0));
    }

    #[tokio::test]
    async fn test_abort_policy_stops_early_and_restores() {
        let mut surface = FakeSurface::new(&["a", "b", "c"]);
        let mut orch = ExportOrchestrator::builder()
            .capture(EchoCapture {
                fail_for: vec!["b".to_string()],
            })
            .settings(ExportSettings {
                failure_policy: FailurePolicy::AbortOnFirst,
                ..ExportSettings::immediate()
            })
            .build();
        let mut calls = Vec::new();

        let result = orch
            .export_batch(&mut surface, ExportFormat::Html, |c, t| calls.push((c, t)))
            .await;

        assert!(result.is_err());
        assert_eq!(calls, vec![(1, 3), (2, 3)]);
        assert_eq!(surface.active, Some(0));
        assert_eq!(orch.progress(), BatchProgress::default());
    }

    #[tokio::test]
    async fn test_empty_batch_stays_idle() {
        let mut surface = FakeSurface::new(&[]);
        let mut orch = orchestrator(&[]);
        let result = orch
            .export_batch(&mut surface, ExportFormat::Html, |_, _| panic!("no progress expected"))
            .await;

        assert!(matches!(result, Err(ReportError::EmptyBatch)));
        assert_eq!(orch.progress().state, BatchState::Idle);
        assert!(surface.selections.is_empty());
    }

    #[tokio::test]
    async fn test_archive_failure_is_fatal_but_restores() {
        let mut surface = FakeSurface::new(&["a", "b"]);
        surface.active = Some(1);
        let mut orch = ExportOrchestrator::builder()
            .capture(EchoCapture { fail_for: vec![] })
            .archive(Box::new(BrokenArchive))
            .settings(ExportSettings::immediate())
            .build();

        let result = orch.export_batch(&mut surface, ExportFormat::Png, |_, _| {}).await;

        assert!(matches!(result, Err(ReportError::Archive(_))));
        assert_eq!(surface.active, Some(1));
        assert_eq!(orch.progress(), BatchProgress::default());
    }
}
