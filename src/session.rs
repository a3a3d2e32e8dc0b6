use crate::error::{ReportError, ReportResult};
use crate::export::{Capturable, ReportSurface};
use crate::geometry::RingGeometry;
use crate::ingest::{validate_rows, Clock, RawRow, SystemClock, ValidationReport};
use crate::render::ReportView;
use crate::report::{derive_batch, BaseConfig, ReportRecord, SharedSettings, TypeCatalogue};
use tracing::{debug, info};

/// Application state for one loaded batch: the rows, what was derived from
/// them, and which report is currently on screen.
pub struct ReportSession {
    rows: Vec<RawRow>,
    catalogue: TypeCatalogue,
    base: BaseConfig,
    geometry: RingGeometry,
    clock: Box<dyn Clock>,
    records: Vec<ReportRecord>,
    active: Option<usize>,
    view: Option<ReportView>,
}

impl Default for ReportSession {
    fn default() -> Self {
        Self::new(TypeCatalogue::default(), BaseConfig::default())
    }
}

impl ReportSession {
    pub fn new(catalogue: TypeCatalogue, base: BaseConfig) -> Self {
        Self {
            rows: Vec::new(),
            catalogue,
            base,
            geometry: RingGeometry::standard(),
            clock: Box::new(SystemClock),
            records: Vec::new(),
            active: None,
            view: None,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_geometry(mut self, geometry: RingGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Replaces the batch. Range problems are returned, not enforced; the
    /// rows are derived either way and the first report becomes active.
    pub fn load(&mut self, rows: Vec<RawRow>) -> ValidationReport {
        let report = validate_rows(&rows);
        self.rows = rows;
        self.rederive();
        self.active = None;
        self.view = None;
        if !self.records.is_empty() {
            self.show(0);
        }
        info!(
            "Loaded {} reports ({} range errors)",
            self.records.len(),
            report.errors.len()
        );
        report
    }

    fn rederive(&mut self) {
        self.records = derive_batch(&self.rows, &self.catalogue, self.clock.as_ref());
    }

    fn show(&mut self, index: usize) {
        self.active = Some(index);
        self.view = self
            .records
            .get(index)
            .map(|record| ReportView::new(record, &self.base, &self.geometry));
    }

    fn refresh_view(&mut self) {
        if let Some(index) = self.active {
            self.show(index);
        }
    }

    /// Swaps the type-detail lookup and rederives every record from the
    /// stored rows.
    pub fn set_catalogue(&mut self, catalogue: TypeCatalogue) {
        self.catalogue = catalogue;
        self.rederive();
        self.refresh_view();
        debug!("Rederived {} reports after catalogue change", self.records.len());
    }

    pub fn set_base_config(&mut self, base: BaseConfig) {
        self.base = base;
        self.refresh_view();
    }

    /// Overlays settings fetched from the config service. Absent parts are
    /// left as they are.
    pub fn apply_shared(&mut self, settings: SharedSettings) {
        if let Some(base) = settings.base_config {
            self.base = base;
        }
        match settings.management_configs {
            Some(entries) => self.set_catalogue(TypeCatalogue::new(entries)),
            None => self.refresh_view(),
        }
    }

    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn catalogue(&self) -> &TypeCatalogue {
        &self.catalogue
    }

    pub fn base_config(&self) -> &BaseConfig {
        &self.base
    }

    pub fn active_record(&self) -> Option<&ReportRecord> {
        self.active.and_then(|i| self.records.get(i))
    }

    pub fn view(&self) -> Option<&ReportView> {
        self.view.as_ref()
    }
}

impl ReportSurface for ReportSession {
    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn active_index(&self) -> Option<usize> {
        self.active
    }

    fn select(&mut self, index: usize) -> ReportResult<()> {
        if index >= self.records.len() {
            return Err(ReportError::NoSuchRecord {
                index,
                len: self.records.len(),
            });
        }
        self.show(index);
        Ok(())
    }

    fn active_view(&self) -> Option<&dyn Capturable> {
        self.view.as_ref().map(|v| v as &dyn Capturable)
    }
}
