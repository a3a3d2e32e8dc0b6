mod common;

use chrono::NaiveDate;
use common::{csv, csv_line, sample_scores, uniform};
use flate2::read::GzDecoder;
use reportforge::config::{ExportSettings, RenderParams};
use reportforge::error::ReportResult;
use reportforge::export::{
    ExportFormat, ExportOrchestrator, RenderCapture, ReportSurface, SnapshotSource,
};
use reportforge::ingest::{load_rows_from_reader, FixedClock};
use reportforge::render::SnapshotRenderer;
use reportforge::{ReportError, ReportSession};
use rstest::rstest;
use std::future::Future;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use tar::Archive;

fn session(names: &[&str]) -> ReportSession {
    let lines: Vec<String> = names
        .iter()
        .map(|n| csv_line(n, "45292", sample_scores()))
        .collect();
    let rows = load_rows_from_reader(csv(&lines).as_bytes(), b',').unwrap();
    let mut session = ReportSession::default()
        .with_clock(Box::new(FixedClock(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())));
    session.load(rows);
    session
}

fn archive_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
        .collect()
}

/// Fails for one position in the batch, echoes markup otherwise.
struct FlakyCapture {
    fail_name: Option<String>,
    panic_name: Option<String>,
}

impl RenderCapture for FlakyCapture {
    fn capture(
        &self,
        source: &SnapshotSource,
        _format: ExportFormat,
    ) -> impl Future<Output = ReportResult<Vec<u8>>> + Send {
        let name = source.name.clone();
        let markup = source.markup.clone();
        let fail = self.fail_name.as_deref() == Some(name.as_str());
        let explode = self.panic_name.as_deref() == Some(name.as_str());
        async move {
            if explode {
                panic!("renderer crashed on {}", name);
            }
            if fail {
                return Err(ReportError::capture(name, "surface not ready"));
            }
            Ok(markup.into_bytes())
        }
    }
}

fn orchestrator(fail: Option<&str>, explode: Option<&str>) -> ExportOrchestrator<FlakyCapture> {
    ExportOrchestrator::builder()
        .capture(FlakyCapture {
            fail_name: fail.map(str::to_string),
            panic_name: explode.map(str::to_string),
        })
        .settings(ExportSettings::immediate())
        .clock(Box::new(FixedClock(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())))
        .build()
}

#[rstest]
#[case::first(0)]
#[case::middle(2)]
#[case::last(4)]
#[tokio::test]
async fn test_failing_item_is_skipped(#[case] k: usize) {
    let names = ["a", "b", "c", "d", "e"];
    let mut s = session(&names);
    s.select(1).unwrap();
    let mut orch = orchestrator(Some(names[k]), None);
    let mut seen = Vec::new();

    let outcome = orch
        .export_batch(&mut s, ExportFormat::Html, |c, t| seen.push((c, t)))
        .await
        .unwrap();

    assert_eq!(seen, (1..=5).map(|c| (c, 5)).collect::<Vec<_>>());
    assert_eq!(outcome.exported_count(), 4);
    assert!(!outcome.items[k].is_exported());

    let expected: Vec<String> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != k)
        .map(|(_, n)| format!("{}_report.html", n))
        .collect();
    assert_eq!(archive_names(&outcome.bytes), expected);
    assert_eq!(s.active_index(), Some(1));
    assert_eq!(outcome.archive_name, "html_batch_export_2026-01-01.tar.gz");
}

#[test]
fn test_panicking_capture_still_restores_selection() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let mut s = session(&["a", "b", "c"]);
    s.select(2).unwrap();
    let mut orch = orchestrator(None, Some("b"));

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        runtime.block_on(orch.export_batch(&mut s, ExportFormat::Html, |_, _| {}))
    }));

    assert!(result.is_err());
    assert_eq!(s.active_index(), Some(2));
    assert_eq!(s.view().unwrap().record.name, "c");
    assert_eq!(orch.progress().total, 0);
}

#[tokio::test]
async fn test_empty_session_rejects_batch() {
    let mut s = ReportSession::default();
    let mut orch = orchestrator(None, None);
    let result = orch.export_batch(&mut s, ExportFormat::Png, |_, _| {}).await;
    assert!(matches!(result, Err(ReportError::EmptyBatch)));
}

#[tokio::test]
async fn test_real_renderer_html_batch() {
    let mut s = session(&["张三", "李四"]);
    let mut orch = ExportOrchestrator::builder()
        .capture(SnapshotRenderer::new(&RenderParams::default()))
        .settings(ExportSettings::immediate())
        .build();

    let outcome = orch
        .export_batch(&mut s, ExportFormat::Html, |_, _| {})
        .await
        .unwrap();

    let mut archive = Archive::new(GzDecoder::new(outcome.bytes.as_slice()));
    let mut first = archive.entries().unwrap().next().unwrap().unwrap();
    let mut html = String::new();
    first.read_to_string(&mut html).unwrap();
    assert!(html.contains("张三"));
    assert!(html.contains("<svg"));
}

#[tokio::test]
async fn test_real_renderer_single_png() {
    let mut s = session(&["张三", "李四"]);
    s.select(1).unwrap();
    let orch = ExportOrchestrator::builder()
        .capture(SnapshotRenderer::new(&RenderParams {
            pixel_ratio: 0.5,
            ..RenderParams::default()
        }))
        .settings(ExportSettings::immediate())
        .build();

    let artifact = orch.export_single(&s, ExportFormat::Png).await.unwrap();
    assert_eq!(artifact.file_name, "李四_report.png");
    assert_eq!(&artifact.bytes[..4], b"\x89PNG");
}

#[tokio::test]
async fn test_real_renderer_jpeg_batch() {
    let mut s = session(&["张三", "李四"]);
    let mut orch = ExportOrchestrator::builder()
        .capture(SnapshotRenderer::new(&RenderParams {
            pixel_ratio: 0.5,
            ..RenderParams::default()
        }))
        .settings(ExportSettings::immediate())
        .clock(Box::new(FixedClock(NaiveDate::from_ymd_opt(2026, 2, 3).unwrap())))
        .build();

    let outcome = orch
        .export_batch(&mut s, ExportFormat::Jpeg, |_, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.archive_name, "jpeg_batch_export_2026-02-03.tar.gz");
    assert_eq!(archive_names(&outcome.bytes), ["张三_report.jpg", "李四_report.jpg"]);
}

#[tokio::test]
async fn test_catalogue_swap_changes_exported_markup() {
    let lines = vec![csv_line("甲", "45292", uniform(50.0))];
    let rows = load_rows_from_reader(csv(&lines).as_bytes(), b',').unwrap();
    let mut s = ReportSession::default();
    s.load(rows);
    let orch = orchestrator(None, None);

    let before = orch.export_single(&s, ExportFormat::Html).await.unwrap();
    s.set_catalogue(reportforge::report::TypeCatalogue::empty());
    let after = orch.export_single(&s, ExportFormat::Html).await.unwrap();

    let before = String::from_utf8(before.bytes).unwrap();
    let after = String::from_utf8(after.bytes).unwrap();
    assert!(before.contains("劳模型：冲在一线的劳模"));
    assert!(after.contains(reportforge::render::MISSING_DETAIL_NOTICE));
}
