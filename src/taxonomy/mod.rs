pub mod templates;

use crate::models::{DebtCategory, Ratings};

pub use templates::DebtTemplate;

/// Keyword rule for one category.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: DebtCategory,
    /// Section heading names that map straight to this category.
    pub aliases: Vec<String>,
    pub keywords: Vec<String>,
    pub baseline: Ratings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingDimension {
    Severity,
    Urgency,
    Effort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintEffect {
    /// Move the rating to this absolute value.
    Pin(u8),
    /// Move the rating by this many steps.
    Shift(i8),
}

impl HintEffect {
    /// Signed distance this effect moves a rating away from `baseline`.
    pub fn delta_from(self, baseline: u8) -> i16 {
        match self {
            HintEffect::Pin(target) => target as i16 - baseline as i16,
            HintEffect::Shift(steps) => steps as i16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RatingHint {
    pub dimension: RatingDimension,
    pub effect: HintEffect,
    pub keywords: Vec<String>,
}

/// Immutable lookup data consumed by the classifier.
///
/// Built once and handed to [`crate::analysis::Classifier::new`]; tests swap
/// in their own tables through [`RuleTables::empty`] and the `with_*` builders.
#[derive(Debug, Clone)]
pub struct RuleTables {
    categories: Vec<CategoryRule>,
    hints: Vec<RatingHint>,
    templates: Vec<(DebtCategory, DebtTemplate)>,
    fallback_template: DebtTemplate,
}

impl RuleTables {
    pub fn new() -> Self {
        let mut tables = Self::empty();

        tables.init_categories();
        tables.init_severity_hints();
        tables.init_urgency_hints();
        tables.init_effort_hints();
        tables.templates = templates::default_templates();

        tables
    }

    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            hints: Vec::new(),
            templates: Vec::new(),
            fallback_template: DebtTemplate::generic(),
        }
    }

    fn init_categories(&mut self) {
        let categories = vec![
            (
                DebtCategory::Security,
                vec!["security", "vulnerability", "vulnerabilities", "appsec"],
                vec![
                    "security", "vulnerability", "vulnerable", "injection", "xss", "csrf",
                    "authentication", "authorization", "auth", "access control",
                    "input validation", "sql injection", "command injection", "data exposure",
                    "sensitive data", "cryptography", "hardcoded", "secret", "encryption",
                    "password", "credential", "token", "rate limiting", "vulnerable libraries",
                ],
                Ratings::new(4, 4, 3),
            ),
            (
                DebtCategory::Bugs,
                vec!["bug", "potential bug", "defect", "correctness"],
                vec![
                    "bug", "logic error", "off-by-one", "null safety", "null pointer",
                    "exception handling", "resource leak", "edge case", "boundary condition",
                    "type safety", "casting", "race condition", "deadlock", "panic",
                    "incorrect", "wrong result", "unhandled",
                ],
                Ratings::new(4, 3, 3),
            ),
            (
                DebtCategory::Performance,
                vec!["performance", "scalability", "efficiency"],
                vec![
                    "performance", "slow", "bottleneck", "inefficient", "optimization", "cache",
                    "memory leak", "n+1", "query", "latency", "timeout", "response time",
                    "load time", "algorithm complexity", "memory usage", "allocation",
                    "blocking", "concurrency", "database", "index", "batch operation",
                    "connection pooling", "buffering",
                ],
                Ratings::new(3, 3, 3),
            ),
            (
                DebtCategory::Testing,
                vec!["testing", "test", "test coverage", "quality assurance"],
                vec![
                    "test", "testing", "unit test", "integration test", "no tests",
                    "missing tests", "test coverage", "untested", "mock", "stub", "test case",
                    "coverage", "flaky",
                ],
                Ratings::new(3, 2, 3),
            ),
            (
                DebtCategory::Architecture,
                vec!["architecture", "design", "structure"],
                vec![
                    "architecture", "design", "coupling", "cohesion", "monolith", "structure",
                    "pattern", "dependency", "layering", "separation of concerns", "solid",
                    "tight coupling", "modularity", "abstraction", "organization",
                ],
                Ratings::new(3, 2, 4),
            ),
            (
                DebtCategory::CodeQuality,
                vec![
                    "code quality", "quality", "maintainability", "best practice", "readability",
                    "style",
                ],
                vec![
                    "code quality", "clean code", "readable", "readability", "maintainability",
                    "technical debt", "code smell", "duplication", "duplicated", "complexity",
                    "spaghetti", "messy", "inconsistent", "style", "linting", "naming",
                    "formatting", "god class", "long method", "best practice", "dead code",
                    "magic number",
                ],
                Ratings::new(2, 2, 2),
            ),
            (
                DebtCategory::Docs,
                vec!["documentation", "docs", "doc", "readme"],
                vec![
                    "documentation", "docs", "comment", "readme", "undocumented",
                    "no documentation", "missing docs", "api docs", "outdated docs", "docstring",
                ],
                Ratings::new(2, 1, 2),
            ),
            (
                DebtCategory::Tooling,
                vec!["tooling", "build", "ci/cd", "devops", "infrastructure", "deployment"],
                vec![
                    "tooling", "build", "ci/cd", "ci", "pipeline", "deployment", "devops",
                    "automation", "script", "configuration", "environment", "docker", "makefile",
                ],
                Ratings::new(2, 2, 3),
            ),
        ];

        for (category, aliases, keywords, baseline) in categories {
            self.add_category(category, &aliases, &keywords, baseline);
        }
    }

    fn init_severity_hints(&mut self) {
        let hints = vec![
            (
                HintEffect::Pin(5),
                vec![
                    "critical", "crash", "data loss", "security breach", "outage", "blocker",
                    "remote code execution", "data corruption",
                ],
            ),
            (
                HintEffect::Shift(1),
                vec!["severe", "major", "serious", "production", "high risk", "significant"],
            ),
            (
                HintEffect::Shift(-1),
                vec!["low impact", "low priority", "optional", "small issue"],
            ),
            (HintEffect::Pin(1), vec!["minor", "cosmetic", "nit", "nitpick", "typo"]),
        ];

        for (effect, keywords) in hints {
            self.add_hint(RatingDimension::Severity, effect, &keywords);
        }
    }

    fn init_urgency_hints(&mut self) {
        let hints = vec![
            (
                HintEffect::Pin(5),
                vec![
                    "urgent", "immediate", "immediately", "asap", "before release", "must fix",
                    "blocker", "actively exploited",
                ],
            ),
            (
                HintEffect::Shift(1),
                vec![
                    "should fix", "soon", "rate limiting", "auth", "authentication", "exploit",
                    "production", "user-facing",
                ],
            ),
            (
                HintEffect::Shift(-1),
                vec!["eventually", "nice to have", "consider", "could", "someday", "long term"],
            ),
        ];

        for (effect, keywords) in hints {
            self.add_hint(RatingDimension::Urgency, effect, &keywords);
        }
    }

    fn init_effort_hints(&mut self) {
        let hints = vec![
            (
                HintEffect::Pin(5),
                vec![
                    "rewrite", "redesign", "major refactor", "massive", "extensive",
                    "time-consuming", "migration",
                ],
            ),
            (
                HintEffect::Shift(1),
                vec!["refactor", "large", "significant effort", "across the codebase"],
            ),
            (HintEffect::Pin(1), vec!["quick fix", "one-line", "typo", "trivial"]),
            (
                HintEffect::Shift(-1),
                vec!["small", "simple", "easy", "straightforward", "quick"],
            ),
        ];

        for (effect, keywords) in hints {
            self.add_hint(RatingDimension::Effort, effect, &keywords);
        }
    }

    fn add_category(
        &mut self,
        category: DebtCategory,
        aliases: &[&str],
        keywords: &[&str],
        baseline: Ratings,
    ) {
        self.categories.push(CategoryRule {
            category,
            aliases: aliases.iter().map(|s| s.to_lowercase()).collect(),
            keywords: keywords.iter().map(|s| s.to_lowercase()).collect(),
            baseline,
        });
    }

    fn add_hint(&mut self, dimension: RatingDimension, effect: HintEffect, keywords: &[&str]) {
        self.hints.push(RatingHint {
            dimension,
            effect,
            keywords: keywords.iter().map(|s| s.to_lowercase()).collect(),
        });
    }

    pub fn with_category(
        mut self,
        category: DebtCategory,
        aliases: &[&str],
        keywords: &[&str],
        baseline: Ratings,
    ) -> Self {
        self.categories.retain(|rule| rule.category != category);
        self.add_category(category, aliases, keywords, baseline);
        self
    }

    pub fn with_hint(mut self, dimension: RatingDimension, effect: HintEffect, keywords: &[&str]) -> Self {
        self.add_hint(dimension, effect, keywords);
        self
    }

    pub fn with_template(mut self, category: DebtCategory, template: DebtTemplate) -> Self {
        self.templates.retain(|(c, _)| *c != category);
        self.templates.push((category, template));
        self
    }

    /// Category rules sorted by the fixed category priority order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryRule> {
        let mut rules: Vec<&CategoryRule> = self.categories.iter().collect();
        rules.sort_by_key(|rule| rule.category.priority_rank());
        rules.into_iter()
    }

    pub fn category(&self, category: DebtCategory) -> Option<&CategoryRule> {
        self.categories.iter().find(|rule| rule.category == category)
    }

    pub fn hints(&self, dimension: RatingDimension) -> impl Iterator<Item = &RatingHint> {
        self.hints.iter().filter(move |hint| hint.dimension == dimension)
    }

    pub fn template(&self, category: DebtCategory) -> &DebtTemplate {
        self.templates
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, template)| template)
            .unwrap_or(&self.fallback_template)
    }

    /// Baseline ratings for a category, or a neutral 3/3/3 when the table has no rule.
    pub fn baseline(&self, category: DebtCategory) -> Ratings {
        self.category(category)
            .map(|rule| rule.baseline)
            .unwrap_or(Ratings::new(3, 3, 3))
    }
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_cover_every_category() {
        let tables = RuleTables::new();
        for category in DebtCategory::PRIORITY_ORDER {
            let rule = tables.category(category).expect("rule for category");
            assert!(!rule.keywords.is_empty());
            assert!(!rule.aliases.is_empty());
        }
    }

    #[test]
    fn test_categories_iterate_in_priority_order() {
        let tables = RuleTables::empty()
            .with_category(DebtCategory::Tooling, &[], &["x"], Ratings::new(1, 1, 1))
            .with_category(DebtCategory::Security, &[], &["x"], Ratings::new(1, 1, 1))
            .with_category(DebtCategory::Docs, &[], &["x"], Ratings::new(1, 1, 1));

        let order: Vec<_> = tables.categories().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![DebtCategory::Security, DebtCategory::Docs, DebtCategory::Tooling]
        );
    }

    #[test]
    fn test_security_baseline_above_docs() {
        let tables = RuleTables::new();
        assert_eq!(tables.baseline(DebtCategory::Security).severity, 4);
        assert_eq!(tables.baseline(DebtCategory::Docs).severity, 2);
    }

    #[test]
    fn test_missing_template_falls_back_to_generic() {
        let tables = RuleTables::empty();
        assert_eq!(tables.template(DebtCategory::Bugs), &DebtTemplate::generic());
    }

    #[test]
    fn test_hint_delta() {
        assert_eq!(HintEffect::Pin(5).delta_from(4), 1);
        assert_eq!(HintEffect::Pin(1).delta_from(4), -3);
        assert_eq!(HintEffect::Shift(-1).delta_from(2), -1);
    }
}
