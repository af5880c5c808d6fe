use serde::{Deserialize, Serialize};

use crate::analysis::scorer;
use crate::error::Result;

const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DebtCategory {
    Testing,
    Security,
    Performance,
    Architecture,
    Docs,
    CodeQuality,
    Bugs,
    Tooling,
}

impl DebtCategory {
    /// Tie-break order used whenever two categories score equally.
    pub const PRIORITY_ORDER: [DebtCategory; 8] = [
        DebtCategory::Security,
        DebtCategory::Bugs,
        DebtCategory::Performance,
        DebtCategory::Testing,
        DebtCategory::Architecture,
        DebtCategory::CodeQuality,
        DebtCategory::Docs,
        DebtCategory::Tooling,
    ];

    /// Position in [`Self::PRIORITY_ORDER`]; lower wins ties.
    pub fn priority_rank(self) -> usize {
        match self {
            DebtCategory::Security => 0,
            DebtCategory::Bugs => 1,
            DebtCategory::Performance => 2,
            DebtCategory::Testing => 3,
            DebtCategory::Architecture => 4,
            DebtCategory::CodeQuality => 5,
            DebtCategory::Docs => 6,
            DebtCategory::Tooling => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DebtCategory::Testing => "testing",
            DebtCategory::Security => "security",
            DebtCategory::Performance => "performance",
            DebtCategory::Architecture => "architecture",
            DebtCategory::Docs => "docs",
            DebtCategory::CodeQuality => "code_quality",
            DebtCategory::Bugs => "bugs",
            DebtCategory::Tooling => "tooling",
        }
    }
}

impl std::fmt::Display for DebtCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity, urgency and effort on the 1-5 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ratings {
    pub severity: u8,
    pub urgency: u8,
    pub effort: u8,
}

impl Ratings {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(severity: u8, urgency: u8, effort: u8) -> Self {
        Self {
            severity,
            urgency,
            effort,
        }
    }

    /// Builds ratings from possibly out-of-range values, pinning each to 1..=5.
    pub fn clamped(severity: i16, urgency: i16, effort: i16) -> Self {
        let clamp = |v: i16| v.clamp(Self::MIN as i16, Self::MAX as i16) as u8;
        Self::new(clamp(severity), clamp(urgency), clamp(effort))
    }
}

/// Everything a debt item is built from, except the derived priority score.
#[derive(Debug, Clone)]
pub struct DebtItemDraft {
    pub id: String,
    pub source_id: String,
    pub description: String,
    pub category: DebtCategory,
    pub ratings: Ratings,
    pub root_cause: String,
    pub impact: String,
    pub suggested_actions: Vec<String>,
}

/// One normalized, categorized and scored review finding.
///
/// Immutable once built: the priority score is always derived from the
/// ratings through [`scorer::score_ratings`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DebtItem {
    id: String,
    source_id: String,
    title: String,
    description: String,
    category: DebtCategory,
    severity: u8,
    urgency: u8,
    effort: u8,
    priority_score: f64,
    root_cause: String,
    impact: String,
    suggested_actions: Vec<String>,
}

impl DebtItem {
    pub fn new(draft: DebtItemDraft) -> Result<Self> {
        let priority_score = scorer::score_ratings(draft.ratings)?;
        let title = draft.description.chars().take(TITLE_MAX_CHARS).collect();

        Ok(Self {
            id: draft.id,
            source_id: draft.source_id,
            title,
            description: draft.description,
            category: draft.category,
            severity: draft.ratings.severity,
            urgency: draft.ratings.urgency,
            effort: draft.ratings.effort,
            priority_score,
            root_cause: draft.root_cause,
            impact: draft.impact,
            suggested_actions: draft.suggested_actions,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> DebtCategory {
        self.category
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }

    pub fn urgency(&self) -> u8 {
        self.urgency
    }

    pub fn effort(&self) -> u8 {
        self.effort
    }

    pub fn ratings(&self) -> Ratings {
        Ratings::new(self.severity, self.urgency, self.effort)
    }

    pub fn priority_score(&self) -> f64 {
        self.priority_score
    }

    pub fn root_cause(&self) -> &str {
        &self.root_cause
    }

    pub fn impact(&self) -> &str {
        &self.impact
    }

    pub fn suggested_actions(&self) -> &[String] {
        &self.suggested_actions
    }
}
