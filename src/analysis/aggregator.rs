use std::collections::BTreeMap;

use crate::analysis::scorer::round2;
use crate::error::{Error, Result};
use crate::models::{
    AggregateReport, CategoryCount, DebtCategory, DebtItem, Ratings, SeverityBand, SeverityBucket,
    SourceRanking,
};

/// Builds cross-document statistics over a fixed batch of debt items.
///
/// Holds no state between calls; every report is computed fresh from the
/// slice it is given.
#[derive(Debug, Clone, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// `items` must be in discovery order: it is the final tie-break for `top_items`.
    pub fn aggregate(&self, items: &[DebtItem], top_n: usize) -> Result<AggregateReport> {
        if top_n == 0 {
            return Err(Error::InvalidTopN(top_n));
        }

        let total = items.len();
        if total == 0 {
            tracing::warn!("No debt items to aggregate");
        }

        let report = AggregateReport {
            total_items: total,
            total_sources: self.count_sources(items),
            average_severity: self.average(items, |item| item.severity() as f64),
            average_priority: self.average(items, DebtItem::priority_score),
            category_counts: self.count_categories(items),
            severity_distribution: self.distribute_severity(items),
            source_rankings: self.rank_sources(items),
            top_items: self.top_items(items, top_n),
        };

        tracing::info!(
            "Aggregated {} items from {} sources. Avg severity: {:.2}, Avg priority: {:.2}",
            report.total_items,
            report.total_sources,
            report.average_severity,
            report.average_priority
        );

        Ok(report)
    }

    fn count_sources(&self, items: &[DebtItem]) -> usize {
        items
            .iter()
            .map(DebtItem::source_id)
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }

    fn average<F>(&self, items: &[DebtItem], value: F) -> f64
    where
        F: Fn(&DebtItem) -> f64,
    {
        if items.is_empty() {
            return 0.0;
        }
        round2(items.iter().map(value).sum::<f64>() / items.len() as f64)
    }

    fn count_categories(&self, items: &[DebtItem]) -> Vec<CategoryCount> {
        DebtCategory::PRIORITY_ORDER
            .iter()
            .map(|&category| {
                let count = items.iter().filter(|i| i.category() == category).count();
                CategoryCount {
                    category,
                    count,
                    percentage: percentage(count, items.len()),
                }
            })
            .collect()
    }

    fn distribute_severity(&self, items: &[DebtItem]) -> Vec<SeverityBucket> {
        (Ratings::MIN..=Ratings::MAX)
            .map(|severity| {
                let count = items.iter().filter(|i| i.severity() == severity).count();
                SeverityBucket {
                    severity,
                    label: SeverityBand::from_severity(severity),
                    count,
                    percentage: percentage(count, items.len()),
                }
            })
            .collect()
    }

    fn rank_sources(&self, items: &[DebtItem]) -> Vec<SourceRanking> {
        let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

        for item in items {
            let entry = totals.entry(item.source_id()).or_insert((0.0, 0));
            entry.0 += item.priority_score();
            entry.1 += 1;
        }

        let mut rankings: Vec<SourceRanking> = totals
            .into_iter()
            .map(|(source_id, (total, count))| SourceRanking {
                source_id: source_id.to_string(),
                total_priority_score: round2(total),
                item_count: count,
            })
            .collect();

        rankings.sort_by(|a, b| {
            b.total_priority_score
                .total_cmp(&a.total_priority_score)
                .then_with(|| a.source_id.cmp(&b.source_id))
        });

        rankings
    }

    fn top_items(&self, items: &[DebtItem], top_n: usize) -> Vec<DebtItem> {
        let mut ranked: Vec<&DebtItem> = items.iter().collect();

        // Stable sort: equal score and severity keep discovery order.
        ranked.sort_by(|a, b| {
            b.priority_score()
                .total_cmp(&a.priority_score())
                .then_with(|| b.severity().cmp(&a.severity()))
        });

        ranked.into_iter().take(top_n).cloned().collect()
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}
