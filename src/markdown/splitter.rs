use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::RawIssue;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,3}#+\s+(.+?)\s*#*\s*$").expect("heading pattern is valid"));
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(.+)$").expect("list pattern is valid"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern is valid"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").expect("code pattern is valid"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.+?)\]\(.+?\)").expect("link pattern is valid"));

/// Splits a review document into raw issues with their heading context.
#[derive(Debug, Clone)]
pub struct DocumentSplitter {
    pub min_issue_len: usize,
    pub max_issues_per_section: usize,
    pub max_paragraphs_per_section: usize,
}

impl DocumentSplitter {
    pub fn new() -> Self {
        Self {
            min_issue_len: 20,
            max_issues_per_section: 15,
            max_paragraphs_per_section: 10,
        }
    }

    /// Items must be longer than `len` characters to be kept.
    pub fn with_min_issue_len(mut self, len: usize) -> Self {
        self.min_issue_len = len;
        self
    }

    pub fn split(&self, text: &str, source_id: &str) -> Vec<RawIssue> {
        let mut issues = Vec::new();

        for section in sections(text) {
            let heading = section.heading.as_deref();
            let items = list_items(&section.lines);

            let texts: Vec<String> = if items.is_empty() {
                paragraphs(&section.lines)
                    .into_iter()
                    .map(|p| clean_text(&p))
                    .filter(|p| {
                        let len = p.chars().count();
                        len > 30 && len < 500
                    })
                    .take(self.max_paragraphs_per_section)
                    .collect()
            } else {
                items
                    .into_iter()
                    .map(|item| clean_text(&item))
                    .filter(|item| item.chars().count() > self.min_issue_len)
                    .take(self.max_issues_per_section)
                    .collect()
            };

            tracing::debug!(
                "Section {:?} in {}: {} issues",
                heading.unwrap_or("<none>"),
                source_id,
                texts.len()
            );

            issues.extend(texts.into_iter().map(|t| RawIssue::new(t, heading, source_id)));
        }

        issues
    }
}

impl Default for DocumentSplitter {
    fn default() -> Self {
        Self::new()
    }
}

struct Section<'a> {
    heading: Option<String>,
    lines: Vec<&'a str>,
}

fn sections(text: &str) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    let mut current = Section {
        heading: None,
        lines: Vec::new(),
    };
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let heading = caps[1].trim().to_string();
            let previous = std::mem::replace(
                &mut current,
                Section {
                    heading: Some(heading),
                    lines: Vec::new(),
                },
            );
            if !previous.lines.is_empty() {
                sections.push(previous);
            }
        } else {
            current.lines.push(line);
        }
    }

    if !current.lines.is_empty() {
        sections.push(current);
    }

    sections
}

/// List items in document order; continuation lines are folded into the item above.
fn list_items(lines: &[&str]) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut open = false;

    for line in lines {
        if line.trim().is_empty() {
            open = false;
            continue;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            items.push(caps[1].trim().to_string());
            open = true;
        } else if open {
            if let Some(last) = items.last_mut() {
                last.push(' ');
                last.push_str(line.trim());
            }
        }
    }

    items
}

fn paragraphs(lines: &[&str]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

/// Strips inline markdown and collapses whitespace.
pub fn clean_text(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
