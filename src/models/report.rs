use serde::Serialize;

use super::debt::{DebtCategory, DebtItem};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateReport {
    pub total_items: usize,
    pub total_sources: usize,
    pub average_severity: f64,
    pub average_priority: f64,
    pub category_counts: Vec<CategoryCount>,
    pub severity_distribution: Vec<SeverityBucket>,
    pub source_rankings: Vec<SourceRanking>,
    pub top_items: Vec<DebtItem>,
}

impl AggregateReport {
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn category_count(&self, category: DebtCategory) -> usize {
        self.category_counts
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn severity_count(&self, severity: u8) -> usize {
        self.severity_distribution
            .iter()
            .find(|b| b.severity == severity)
            .map(|b| b.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryCount {
    pub category: DebtCategory,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeverityBucket {
    pub severity: u8,
    pub label: SeverityBand,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SeverityBand {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityBand {
    pub fn from_severity(severity: u8) -> Self {
        match severity {
            0 | 1 => SeverityBand::Minimal,
            2 => SeverityBand::Low,
            3 => SeverityBand::Medium,
            4 => SeverityBand::High,
            _ => SeverityBand::Critical,
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityBand::Minimal => write!(f, "Minimal"),
            SeverityBand::Low => write!(f, "Low"),
            SeverityBand::Medium => write!(f, "Medium"),
            SeverityBand::High => write!(f, "High"),
            SeverityBand::Critical => write!(f, "Critical"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceRanking {
    pub source_id: String,
    pub total_priority_score: f64,
    pub item_count: usize,
}
