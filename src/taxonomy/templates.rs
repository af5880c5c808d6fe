use crate::models::DebtCategory;

/// Advisory text attached to every item of a category. Never used for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtTemplate {
    pub root_cause: String,
    pub impact: String,
    pub actions: Vec<String>,
}

impl DebtTemplate {
    pub fn new(root_cause: &str, impact: &str, actions: &[&str]) -> Self {
        Self {
            root_cause: root_cause.to_string(),
            impact: impact.to_string(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn generic() -> Self {
        Self::new(
            "Technical shortcuts taken or requirements evolved over time",
            "Increases maintenance cost and slows development velocity",
            &[
                "Prioritize and schedule time to address this issue",
                "Create detailed tickets for tracking",
            ],
        )
    }
}

pub fn default_templates() -> Vec<(DebtCategory, DebtTemplate)> {
    vec![
        (
            DebtCategory::Security,
            DebtTemplate::new(
                "Security best practices not followed during implementation",
                "Potential security breach or data compromise",
                &[
                    "Conduct security audit of affected components",
                    "Implement security best practices and validation",
                    "Add security scanning to CI/CD pipeline",
                ],
            ),
        ),
        (
            DebtCategory::Bugs,
            DebtTemplate::new(
                "Edge cases and failure paths not covered during implementation",
                "Incorrect behavior or crashes reaching users",
                &[
                    "Reproduce the defect with a failing test",
                    "Fix the root cause and cover the edge case",
                    "Review similar code paths for the same mistake",
                ],
            ),
        ),
        (
            DebtCategory::Performance,
            DebtTemplate::new(
                "Performance not considered in initial implementation",
                "Poor user experience, increased infrastructure costs",
                &[
                    "Profile and identify performance bottlenecks",
                    "Implement caching where appropriate",
                    "Optimize database queries and indexes",
                ],
            ),
        ),
        (
            DebtCategory::Testing,
            DebtTemplate::new(
                "Tests were not written or maintained alongside code development",
                "Increases risk of bugs in production, makes refactoring difficult",
                &[
                    "Write comprehensive unit tests for core functionality",
                    "Set up CI/CD to enforce minimum test coverage",
                    "Add integration tests for critical paths",
                ],
            ),
        ),
        (
            DebtCategory::Architecture,
            DebtTemplate::new(
                "Design decisions did not keep pace with growing requirements",
                "Reduces code maintainability and extensibility",
                &[
                    "Create refactoring plan with clear milestones",
                    "Introduce abstraction layers to reduce coupling",
                    "Document architectural decisions (ADRs)",
                ],
            ),
        ),
        (
            DebtCategory::CodeQuality,
            DebtTemplate::new(
                "Coding standards not enforced consistently",
                "Slows down changes and hides defects in hard-to-read code",
                &[
                    "Run linter and fix code style issues",
                    "Refactor large functions into smaller units",
                    "Remove dead code and unused dependencies",
                ],
            ),
        ),
        (
            DebtCategory::Docs,
            DebtTemplate::new(
                "Documentation not prioritized or maintained",
                "Slows down onboarding, increases maintenance difficulty",
                &[
                    "Update documentation to match current implementation",
                    "Add inline code comments for complex logic",
                    "Create/update README with setup instructions",
                ],
            ),
        ),
        (
            DebtCategory::Tooling,
            DebtTemplate::new(
                "Build and delivery processes grew without automation",
                "Manual steps slow releases and invite configuration drift",
                &[
                    "Automate manual processes",
                    "Update build and deployment scripts",
                    "Document tooling setup and usage",
                ],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_three_actions() {
        let templates = default_templates();
        for category in DebtCategory::PRIORITY_ORDER {
            let (_, template) = templates
                .iter()
                .find(|(c, _)| *c == category)
                .expect("template for category");
            assert_eq!(template.actions.len(), 3, "{}", category);
        }
    }
}
