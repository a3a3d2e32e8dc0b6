use super::chart::{ring_chart_svg, type_bar_chart_svg};
use super::{ReportView, MISSING_DETAIL_NOTICE};
use crate::report::TypeDetail;
use maud::{html, Markup, PreEscaped, DOCTYPE};

pub const REPORT_TITLE: &str = "管理觉察测评报告";

const STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Helvetica Neue', Helvetica, Arial, sans-serif; line-height: 1.47; color: #1d1d1f; background: linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%); margin: 0; padding: 0; }
.report-container { max-width: 820px; margin: 0 auto; background: #fff; }
.cover { position: relative; text-align: center; }
.cover-logo { position: absolute; top: 16px; left: 16px; height: 36px; }
.cover-banner { width: 100%; display: block; }
.subtitle { font-size: 18px; color: #6e6e73; padding: 12px 0; }
.content { padding: 24px 40px; }
.section-title { font-size: 22px; border-left: 4px solid #007AFF; padding-left: 12px; }
.management-types-table { width: 100%; border-collapse: collapse; }
.management-types-table td, .management-types-table th { border: 1px solid #e5e5e7; padding: 6px 10px; }
.overall-results { display: flex; flex-wrap: wrap; gap: 24px; }
.chart-container { flex: 1 1 360px; }
.primary-type { font-size: 24px; font-weight: 700; }
.type-motto { color: #6e6e73; font-style: italic; }
.avatar-img { width: 120px; border-radius: 60px; }
.section-subtitle { color: #007AFF; }
.data-gap { color: #ff3b30; }
.appendix { text-align: center; }
.appendix-qr { width: 150px; height: 150px; border-radius: 8px; }
"#;

fn paragraphs(text: &str) -> Markup {
    html! {
        @for line in text.split('\n') {
            p class="section-content" { (line) }
        }
    }
}

fn detail_section(detail: Option<&TypeDetail>) -> Markup {
    match detail {
        Some(detail) => html! {
            div class="analysis-header" {
                div class="analysis-content" {
                    div class="primary-type" { (detail.title) }
                    div class="type-motto" { (detail.motto) }
                }
                div class="analysis-image" {
                    img class="avatar-img" src=(detail.avatar) alt="avatar";
                }
            }
            div class="analysis-content-sections" {
                @for (title, body) in [
                    ("优势初衷", &detail.advantage),
                    ("典型行为", &detail.behavior),
                    ("潜在风险", &detail.risk),
                    ("发展建议", &detail.suggestion),
                ] {
                    div class="content-section" {
                        h4 class="section-subtitle" { (title) }
                        (paragraphs(body))
                    }
                }
            }
        },
        None => html! {
            p class="data-gap" { (MISSING_DETAIL_NOTICE) }
        },
    }
}

fn report_body(view: &ReportView) -> Markup {
    let record = &view.record;
    let base = &view.base;
    let qr_code = record
        .type_detail
        .as_ref()
        .and_then(|d| d.qr_code.as_deref())
        .unwrap_or(&base.qr_code);

    html! {
        div class="report-container" {
            div class="cover has-banner" {
                img class="cover-logo" src=(base.logo) alt="Logo";
                img class="cover-banner" src=(base.banner) alt="Banner";
                div class="cover-content" {
                    div class="subtitle" { (record.name) " · " (record.date) }
                }
            }
            div class="content" {
                div class="section" {
                    h2 class="section-title" { "一、报告阅读说明" }
                    h3 class="guide-motto" { "模式无好坏，觉察即改变" }
                    p class="principles-intro" { "在阅读本报告前，请掌握以下原则：" }
                    ol class="principles-list" {
                        @for principle in &base.principles {
                            li { (principle) }
                        }
                    }
                    h4 class="overview-title" { "8种管理类型概述" }
                    table class="management-types-table" {
                        thead { tr { th { "模式" } th { "定义" } } }
                        tbody {
                            @for def in &base.type_definitions {
                                tr { td { (def.type_name) } td { (def.definition) } }
                            }
                        }
                    }
                }
                div class="section" {
                    h2 class="section-title" { "二、总体结果" }
                    div class="overall-results" {
                        div class="chart-container" {
                            h3 class="chart-title" { "胜任力得分" }
                            div class="chart-wrapper" {
                                (PreEscaped(ring_chart_svg(&view.rings, view.hub_radius)))
                            }
                        }
                        div class="chart-container" {
                            h3 class="chart-title" { "八种管理类型得分" }
                            div class="chart-wrapper" {
                                (PreEscaped(type_bar_chart_svg(&record.type_scores)))
                            }
                        }
                    }
                }
                div class="section" {
                    h2 class="section-title" { "三、详细结果分析" }
                    div class="detailed-analysis" {
                        (detail_section(record.type_detail.as_ref()))
                    }
                }
                div class="section" {
                    h2 class="section-title" { "四、附录" }
                    div class="appendix" {
                        img class="appendix-qr" src=(qr_code) alt="QR";
                        div class="appendix-content" { (base.appendix_text) }
                        p { "报告生成时间：" (record.date) }
                    }
                }
            }
        }
    }
}

/// Standalone HTML document for one report, styles inlined.
pub fn render_html(view: &ReportView) -> String {
    let doc = html! {
        (DOCTYPE)
        html lang="zh-CN" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (REPORT_TITLE) " - " (view.record.name) }
                style { (PreEscaped(STYLES)) }
            }
            body {
                (report_body(view))
            }
        }
    };
    doc.into_string()
}
