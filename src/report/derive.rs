use super::{DualRingLayout, MetricItem, RankedItem, ReportRecord, TypeCatalogue, TypeScore, THICKNESS_TIERS};
use crate::ingest::{normalize_date, Clock, RawRow, ScoreCell};
use crate::schema::{ScoreField, CAPABILITY_FIELDS, FOCUS_FIELDS, TYPE_FIELDS};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Ranks a metric group by descending value. Ties keep their input order,
/// and `-0.0` ties with `0.0`.
pub fn rank_items(items: Vec<MetricItem>) -> Vec<RankedItem> {
    let mut sorted = items;
    sorted.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, item)| RankedItem {
            label: item.label,
            value: item.value,
            rank: index as u32 + 1,
            thickness: THICKNESS_TIERS[index.min(THICKNESS_TIERS.len() - 1)],
        })
        .collect()
}

/// Highest score wins; the earliest entry wins a tie.
pub fn primary_type(scores: &[TypeScore]) -> Option<&TypeScore> {
    scores.iter().fold(None, |best: Option<&TypeScore>, score| match best {
        Some(b) if score.value <= b.value => Some(b),
        _ => Some(score),
    })
}

fn metric_group(row: &RawRow, fields: &[ScoreField]) -> Vec<MetricItem> {
    fields
        .iter()
        .map(|f| MetricItem::new(f.label(), row.value(*f)))
        .collect()
}

pub fn derive_record(row: &RawRow, catalogue: &TypeCatalogue, clock: &dyn Clock) -> ReportRecord {
    for (field, cell) in &row.scores {
        if let ScoreCell::Text(text) = cell {
            warn!("'{}': non-numeric {} value '{}' treated as 0", row.name, field, text);
        }
    }

    let outer = rank_items(metric_group(row, &CAPABILITY_FIELDS));
    let inner = rank_items(metric_group(row, &FOCUS_FIELDS));
    let outer_total = outer.iter().map(|i| i.value).sum();
    let inner_total = inner.iter().map(|i| i.value).sum();

    let type_scores = metric_group(row, &TYPE_FIELDS);
    let primary = primary_type(&type_scores)
        .map(|s| s.label.clone())
        .unwrap_or_default();

    let type_detail = catalogue.get(&primary).cloned();
    if type_detail.is_none() {
        warn!("'{}': no type detail configured for '{}'", row.name, primary);
    }

    debug!("Derived report for '{}' (primary type {})", row.name, primary);

    ReportRecord {
        name: row.name.clone(),
        date: normalize_date(&row.date, clock),
        dual_ring: DualRingLayout {
            outer,
            inner,
            outer_total,
            inner_total,
        },
        type_scores,
        primary_type: primary,
        type_detail,
    }
}

/// Derives every row against the current catalogue. Callers rerun this in full
/// whenever the catalogue changes.
pub fn derive_batch(rows: &[RawRow], catalogue: &TypeCatalogue, clock: &dyn Clock) -> Vec<ReportRecord> {
    rows.iter()
        .map(|row| derive_record(row, catalogue, clock))
        .collect()
}
