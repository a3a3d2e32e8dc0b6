use super::chart::{ring_chart_body, type_bar_chart_body, RING_VIEW_BOX};
use super::markup::REPORT_TITLE;
use super::{escape_xml, ReportView, MISSING_DETAIL_NOTICE};
use std::fmt::Write;

pub const PAGE_WIDTH: f64 = 800.0;
const MARGIN: f64 = 40.0;
const BODY_SIZE: f64 = 15.0;
const LINE_HEIGHT: f64 = 24.0;
/// Characters per body line. Labels are mostly CJK, so one char is roughly
/// one em wide.
const WRAP_CHARS: usize = 46;

/// Breaks text into lines of at most `width` characters, honouring explicit
/// newlines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width.max(1)) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}

struct PageBuilder {
    out: String,
    y: f64,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            out: String::new(),
            y: 0.0,
        }
    }

    fn text(&mut self, x: f64, size: f64, weight: u32, fill: &str, text: &str) {
        self.y += size * 1.6;
        let _ = write!(
            self.out,
            r#"<text x="{x}" y="{y:.1}" font-size="{size}" font-weight="{weight}" fill="{fill}">{t}</text>"#,
            y = self.y,
            t = escape_xml(text),
        );
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, WRAP_CHARS) {
            self.y += LINE_HEIGHT;
            let _ = write!(
                self.out,
                r##"<text x="{MARGIN}" y="{y:.1}" font-size="{BODY_SIZE}" fill="#1d1d1f">{t}</text>"##,
                y = self.y,
                t = escape_xml(&line),
            );
        }
    }

    fn section_title(&mut self, title: &str) {
        self.y += 28.0;
        let _ = write!(
            self.out,
            r##"<rect x="{MARGIN}" y="{y:.1}" width="4" height="26" fill="#007AFF"/>"##,
            y = self.y,
        );
        self.y -= 6.0;
        self.text(MARGIN + 14.0, 20.0, 700, "#1d1d1f", title);
        self.y += 10.0;
    }

    fn gap(&mut self, height: f64) {
        self.y += height;
    }
}

/// Single tall SVG page carrying the whole report, ready for rasterization.
/// Images are referenced by URL in the markup document only and are left out
/// here.
pub fn render_page_svg(view: &ReportView) -> String {
    let record = &view.record;
    let base = &view.base;
    let mut page = PageBuilder::new();

    // Cover band
    let _ = write!(
        page.out,
        r##"<rect x="0" y="0" width="{PAGE_WIDTH}" height="140" fill="url(#coverGrad)"/>"##
    );
    page.gap(30.0);
    page.text(MARGIN, 30.0, 700, "#ffffff", REPORT_TITLE);
    page.text(MARGIN, 18.0, 400, "#ffffff", &format!("{} · {}", record.name, record.date));
    page.y = 140.0;

    page.section_title("一、报告阅读说明");
    for (i, principle) in base.principles.iter().enumerate() {
        page.paragraph(&format!("{}. {}", i + 1, principle));
    }
    page.gap(8.0);
    for def in &base.type_definitions {
        page.paragraph(&format!("{}：{}", def.type_name, def.definition));
    }

    page.section_title("二、总体结果");
    let charts_top = page.y + 10.0;
    let _ = write!(
        page.out,
        r#"<g transform="translate({MARGIN}, {charts_top:.1}) scale(0.8)">{}</g>"#,
        ring_chart_body(&view.rings, view.hub_radius)
    );
    let bar_x = MARGIN + RING_VIEW_BOX * 0.8 + 20.0;
    let bar_width = PAGE_WIDTH - bar_x - MARGIN;
    let _ = write!(
        page.out,
        r#"<g transform="translate({bar_x:.1}, {charts_top:.1})">{}</g>"#,
        type_bar_chart_body(&record.type_scores, bar_width, RING_VIEW_BOX * 0.8)
    );
    page.y = charts_top + RING_VIEW_BOX * 0.8;

    page.section_title("三、详细结果分析");
    match &record.type_detail {
        Some(detail) => {
            page.text(MARGIN, 24.0, 700, "#1d1d1f", &detail.title);
            page.text(MARGIN, 16.0, 400, "#6e6e73", &detail.motto);
            for (title, body) in [
                ("优势初衷", &detail.advantage),
                ("典型行为", &detail.behavior),
                ("潜在风险", &detail.risk),
                ("发展建议", &detail.suggestion),
            ] {
                page.gap(6.0);
                page.text(MARGIN, 17.0, 600, "#007AFF", title);
                page.paragraph(body);
            }
        }
        None => page.text(MARGIN, BODY_SIZE, 400, "#ff3b30", MISSING_DETAIL_NOTICE),
    }

    page.section_title("四、附录");
    page.paragraph(&base.appendix_text);
    page.paragraph(&format!("报告生成时间：{}", record.date));
    page.gap(MARGIN);

    let height = page.y.ceil();
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{PAGE_WIDTH}" height="{height}" viewBox="0 0 {PAGE_WIDTH} {height}"><defs><linearGradient id="coverGrad" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="#4A90E2"/><stop offset="100%" stop-color="#7B68EE"/></linearGradient></defs><rect width="100%" height="100%" fill="#ffffff"/><g font-family="sans-serif">{}</g></svg>"##,
        page.out
    )
}
