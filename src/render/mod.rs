pub mod capture;
pub mod chart;
pub mod markup;
pub mod page;
pub mod pdf;

pub use self::capture::SnapshotRenderer;

use crate::export::{Capturable, SnapshotSource};
use crate::geometry::{layout_dual_ring, RingGeometry, RingLayout};
use crate::report::{BaseConfig, ReportRecord};

/// Everything needed to draw one report, resolved at render time.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub record: ReportRecord,
    pub base: BaseConfig,
    pub rings: RingLayout,
    pub hub_radius: f64,
}

impl ReportView {
    pub fn new(record: &ReportRecord, base: &BaseConfig, geometry: &RingGeometry) -> Self {
        Self {
            rings: layout_dual_ring(&record.dual_ring, geometry),
            hub_radius: geometry.hub_radius,
            record: record.clone(),
            base: base.clone(),
        }
    }

    pub fn markup(&self) -> String {
        markup::render_html(self)
    }

    pub fn page_svg(&self) -> String {
        page::render_page_svg(self)
    }
}

impl Capturable for ReportView {
    fn snapshot_source(&self) -> SnapshotSource {
        SnapshotSource {
            name: self.record.name.clone(),
            markup: self.markup(),
            page_svg: self.page_svg(),
        }
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Placeholder shown in place of narrative content when the primary type has
/// no configured detail.
pub const MISSING_DETAIL_NOTICE: &str = "暂无该类型的详细解读配置";
