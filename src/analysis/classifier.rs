use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::models::{DebtCategory, DebtItem, DebtItemDraft, Ratings, RawIssue};
use crate::taxonomy::{CategoryRule, RatingDimension, RuleTables};

const CLAUSE_MAX_CHARS: usize = 200;

static CAUSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:because(?:\s+of)?|due\s+to|caused\s+by)\s+([^.;\n]+)")
        .expect("cause pattern is valid")
});

static IMPACT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:leads?\s+to|leading\s+to|results?\s+in|impacts?:)\s+([^.;\n]+)")
        .expect("impact pattern is valid")
});

/// Category and initial ratings for one raw issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: DebtCategory,
    pub ratings: Ratings,
    /// True when the category came from the section heading rather than keywords.
    pub from_heading: bool,
}

pub struct Classifier {
    tables: RuleTables,
}

impl Classifier {
    pub fn new(tables: RuleTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn classify(&self, raw_text: &str, heading: Option<&str>) -> Classification {
        let text = normalize_description(raw_text).to_lowercase();

        let heading_category = heading.and_then(|h| self.category_from_heading(h));
        let (category, from_heading) = match heading_category {
            Some(category) => (category, true),
            None => (self.category_from_keywords(&text), false),
        };

        let baseline = self.tables.baseline(category);
        let ratings = Ratings::clamped(
            self.adjusted(&text, RatingDimension::Severity, baseline.severity),
            self.adjusted(&text, RatingDimension::Urgency, baseline.urgency),
            self.adjusted(&text, RatingDimension::Effort, baseline.effort),
        );

        Classification {
            category,
            ratings,
            from_heading,
        }
    }

    /// Classifies, scores and annotates one issue.
    pub fn build_item(&self, issue: &RawIssue, id: impl Into<String>) -> Result<DebtItem> {
        let classification = self.classify(&issue.text, issue.heading.as_deref());
        let description = normalize_description(&issue.text);
        let template = self.tables.template(classification.category);

        tracing::debug!(
            "{} classified as {} from {}",
            issue.source_id,
            classification.category,
            if classification.from_heading { "heading" } else { "keywords" }
        );

        let root_cause = extract_clause(&CAUSE_PATTERN, &description)
            .unwrap_or_else(|| template.root_cause.clone());
        let impact = extract_clause(&IMPACT_PATTERN, &description)
            .unwrap_or_else(|| template.impact.clone());

        DebtItem::new(DebtItemDraft {
            id: id.into(),
            source_id: issue.source_id.clone(),
            description,
            category: classification.category,
            ratings: classification.ratings,
            root_cause,
            impact,
            suggested_actions: template.actions.clone(),
        })
    }

    fn category_from_heading(&self, heading: &str) -> Option<DebtCategory> {
        let heading = normalize_heading(heading);
        if heading.is_empty() {
            return None;
        }

        // Exact heading match first, then the heading containing an alias.
        for rule in self.tables.categories() {
            if heading_names(rule).iter().any(|n| *n == heading) {
                return Some(rule.category);
            }
        }

        self.tables
            .categories()
            .find(|rule| {
                heading_names(rule)
                    .iter()
                    .any(|n| count_occurrences(&heading, n) > 0)
            })
            .map(|rule| rule.category)
    }

    fn category_from_keywords(&self, text: &str) -> DebtCategory {
        let mut best: Option<(DebtCategory, usize)> = None;

        for rule in self.tables.categories() {
            let hits: usize = rule
                .keywords
                .iter()
                .map(|keyword| count_occurrences(text, keyword))
                .sum();

            // Rules arrive in priority order, so only a strictly higher count displaces.
            if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
                best = Some((rule.category, hits));
            }
        }

        best.map(|(category, _)| category)
            .unwrap_or(DebtCategory::CodeQuality)
    }

    /// Applies the single strongest matching hint; ties in magnitude favour raising.
    fn adjusted(&self, text: &str, dimension: RatingDimension, baseline: u8) -> i16 {
        let strongest = self
            .tables
            .hints(dimension)
            .filter(|hint| hint.keywords.iter().any(|k| count_occurrences(text, k) > 0))
            .map(|hint| hint.effect.delta_from(baseline))
            .max_by_key(|delta| (delta.abs(), *delta))
            .unwrap_or(0);

        baseline as i16 + strongest
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RuleTables::new())
    }
}

/// Trims whitespace and leading list markers (`-`, `*`, `+`, `1.`, `1)`).
pub fn normalize_description(raw: &str) -> String {
    let mut text = raw.trim();

    loop {
        let stripped = strip_marker(text);
        if stripped.len() == text.len() {
            break;
        }
        text = stripped;
    }

    text.to_string()
}

fn strip_marker(text: &str) -> &str {
    let rest = if let Some(rest) = text.strip_prefix(['-', '*', '+']) {
        rest
    } else {
        let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return text;
        }
        match text[digits..].strip_prefix(['.', ')']) {
            Some(rest) => rest,
            None => return text,
        }
    };

    // A marker needs trailing whitespace (or nothing), otherwise it is content like **bold**.
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        rest.trim_start()
    } else {
        text
    }
}

/// Aliases plus the category's own name, e.g. `code quality`.
fn heading_names(rule: &CategoryRule) -> Vec<String> {
    let mut names = rule.aliases.clone();
    names.push(rule.category.as_str().replace('_', " "));
    names
}

fn normalize_heading(heading: &str) -> String {
    let trimmed = heading
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_end_matches(':')
        .replace(['*', '`', '_'], " ");
    normalize_description(&trimmed)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counts whole-word occurrences of `needle` in `haystack`, allowing a plural `s`/`es`.
///
/// Both inputs are expected to be lowercase already.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }

    haystack
        .match_indices(needle)
        .filter(|(start, _)| {
            let before_ok = haystack[..*start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());

            let after = &haystack[start + needle.len()..];
            let after = after
                .strip_prefix("es")
                .filter(|rest| !rest.starts_with(char::is_alphanumeric))
                .or_else(|| after.strip_prefix('s'))
                .unwrap_or(after);
            let after_ok = after.chars().next().map_or(true, |c| !c.is_alphanumeric());

            before_ok && after_ok
        })
        .count()
}

fn extract_clause(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().chars().take(CLAUSE_MAX_CHARS).collect::<String>())
        .filter(|clause| !clause.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::HintEffect;

    fn classifier() -> Classifier {
        Classifier::default()
    }

    #[test]
    fn test_sql_injection_under_security_heading() {
        let c = classifier();
        let result = c.classify(
            "SQL injection vulnerability in user input handling - critical issue",
            Some("Security"),
        );
        let baseline = c.tables().baseline(DebtCategory::Security);

        assert_eq!(result.category, DebtCategory::Security);
        assert!(result.from_heading);
        assert!(result.ratings.severity > baseline.severity);
        assert_eq!(result.ratings.severity, 5);
    }

    #[test]
    fn test_heading_overrides_keywords() {
        let result = classifier().classify("Missing unit tests for the parser", Some("## Performance:"));
        assert_eq!(result.category, DebtCategory::Performance);
    }

    #[test]
    fn test_heading_alias_inside_longer_heading() {
        let result = classifier().classify("Something odd here", Some("3. Potential Bugs Found"));
        assert_eq!(result.category, DebtCategory::Bugs);
    }

    #[test]
    fn test_unrecognized_heading_falls_back_to_keywords() {
        let result = classifier().classify("Response time is slow on the dashboard query", Some("General"));
        assert_eq!(result.category, DebtCategory::Performance);
        assert!(!result.from_heading);
    }

    #[test]
    fn test_highest_keyword_count_wins() {
        // docs: documentation, readme, comment; security: token
        let result = classifier().classify(
            "Documentation is stale, the README and every comment mention an old token",
            None,
        );
        assert_eq!(result.category, DebtCategory::Docs);
    }

    #[test]
    fn test_ties_follow_priority_order() {
        // one security keyword, one bug keyword
        let result = classifier().classify("The password reset has a race condition", None);
        assert_eq!(result.category, DebtCategory::Security);

        // one performance keyword, one testing keyword
        let result = classifier().classify("The cache module is untested", None);
        assert_eq!(result.category, DebtCategory::Performance);
    }

    #[test]
    fn test_tie_break_ignores_table_order() {
        let tables = RuleTables::empty()
            .with_category(DebtCategory::Tooling, &[], &["widget"], Ratings::new(2, 2, 2))
            .with_category(DebtCategory::Bugs, &[], &["gadget"], Ratings::new(2, 2, 2));
        let c = Classifier::new(tables);

        let result = c.classify("widget and gadget", None);
        assert_eq!(result.category, DebtCategory::Bugs);
    }

    #[test]
    fn test_no_keywords_defaults_to_code_quality() {
        let c = classifier();
        let result = c.classify("Something vague happened here", None);
        assert_eq!(result.category, DebtCategory::CodeQuality);
        assert_eq!(result.ratings, c.tables().baseline(DebtCategory::CodeQuality));
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let c = classifier();
        let result = c.classify("   ", None);
        assert_eq!(result.category, DebtCategory::CodeQuality);
        assert_eq!(result.ratings, c.tables().baseline(DebtCategory::CodeQuality));

        let result = c.classify("- ", None);
        assert_eq!(result.category, DebtCategory::CodeQuality);
    }

    #[test]
    fn test_strongest_single_adjustment_not_cumulative() {
        let tables = RuleTables::empty()
            .with_category(DebtCategory::Bugs, &[], &["bug"], Ratings::new(2, 2, 3))
            .with_hint(RatingDimension::Severity, HintEffect::Shift(1), &["major"])
            .with_hint(RatingDimension::Severity, HintEffect::Shift(1), &["serious"])
            .with_hint(RatingDimension::Severity, HintEffect::Shift(2), &["severe"]);
        let c = Classifier::new(tables);

        let result = c.classify("major serious bug", None);
        assert_eq!(result.ratings.severity, 3);

        let result = c.classify("major serious severe bug", None);
        assert_eq!(result.ratings.severity, 4);
    }

    #[test]
    fn test_larger_magnitude_wins_regardless_of_direction() {
        let c = classifier();
        // security baseline severity 4: "minor" pins to 1 (-3), "major" shifts +1
        let result = c.classify("minor but major auth issue", Some("Security"));
        assert_eq!(result.ratings.severity, 1);
    }

    #[test]
    fn test_equal_magnitude_prefers_raising() {
        let tables = RuleTables::empty()
            .with_category(DebtCategory::Bugs, &[], &["bug"], Ratings::new(3, 3, 3))
            .with_hint(RatingDimension::Severity, HintEffect::Pin(5), &["critical"])
            .with_hint(RatingDimension::Severity, HintEffect::Pin(1), &["cosmetic"]);
        let c = Classifier::new(tables);

        let result = c.classify("cosmetic critical bug", None);
        assert_eq!(result.ratings.severity, 5);
    }

    #[test]
    fn test_ratings_are_clamped() {
        let tables = RuleTables::empty()
            .with_category(DebtCategory::Bugs, &[], &["bug"], Ratings::new(5, 1, 5))
            .with_hint(RatingDimension::Severity, HintEffect::Shift(3), &["bad"])
            .with_hint(RatingDimension::Urgency, HintEffect::Shift(-4), &["later"])
            .with_hint(RatingDimension::Effort, HintEffect::Shift(2), &["huge"]);
        let c = Classifier::new(tables);

        let result = c.classify("bad huge bug, fix later", None);
        assert_eq!(result.ratings, Ratings::new(5, 1, 5));
    }

    #[test]
    fn test_effort_and_urgency_hints() {
        let result = classifier().classify("Trivial typo fix needed before release in the README", None);
        assert_eq!(result.category, DebtCategory::Docs);
        assert_eq!(result.ratings.effort, 1);
        assert_eq!(result.ratings.urgency, 5);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let c = classifier();
        let text = "Slow query with hardcoded password and missing tests";
        let first = c.classify(text, Some("Findings"));
        for _ in 0..20 {
            assert_eq!(c.classify(text, Some("Findings")), first);
        }
    }

    #[test]
    fn test_build_item_normalizes_and_scores() {
        let c = classifier();
        let issue = RawIssue::new(
            "  - Hardcoded credentials in config loader because secrets were never rotated. ",
            Some("Security"),
            "billing",
        );
        let item = c.build_item(&issue, "DEBT-001").unwrap();

        assert_eq!(
            item.description(),
            "Hardcoded credentials in config loader because secrets were never rotated."
        );
        assert_eq!(item.category(), DebtCategory::Security);
        assert_eq!(item.source_id(), "billing");
        assert_eq!(item.root_cause(), "secrets were never rotated");
        assert_eq!(
            item.impact(),
            c.tables().template(DebtCategory::Security).impact
        );
        assert_eq!(item.suggested_actions().len(), 3);
        assert_eq!(
            item.priority_score(),
            crate::analysis::scorer::score_ratings(item.ratings()).unwrap()
        );
    }

    #[test]
    fn test_build_item_extracts_impact_clause() {
        let issue = RawIssue::new(
            "N+1 query in order listing leads to timeouts under load",
            None,
            "shop",
        );
        let item = classifier().build_item(&issue, "DEBT-002").unwrap();
        assert_eq!(item.category(), DebtCategory::Performance);
        assert_eq!(item.impact(), "timeouts under load");
    }

    #[test]
    fn test_normalize_description_strips_markers() {
        assert_eq!(normalize_description("- item"), "item");
        assert_eq!(normalize_description("  12. item "), "item");
        assert_eq!(normalize_description("* - item"), "item");
        assert_eq!(normalize_description("**Bold** item"), "**Bold** item");
        assert_eq!(normalize_description("2024 plan"), "2024 plan");
        assert_eq!(normalize_description("-"), "");
    }

    #[test]
    fn test_count_occurrences_respects_word_boundaries() {
        assert_eq!(count_occurrences("latest test results", "test"), 1);
        assert_eq!(count_occurrences("tests and more tests", "test"), 2);
        assert_eq!(count_occurrences("add indexes", "index"), 1);
        assert_eq!(count_occurrences("authentication", "auth"), 0);
        assert_eq!(count_occurrences("ci/cd pipeline", "ci/cd"), 1);
        assert_eq!(count_occurrences("anything", ""), 0);
    }
}
