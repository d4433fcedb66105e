#![forbid(unsafe_code)]

//! Selector matching and prefix classification
//!
//! Every rule of a [`RuleSet`] is evaluated against every import. A selected
//! import is checked against each forbidden prefix and, independently, against
//! the allowed prefixes, so one import can yield several violations.

use crate::rules::rule::{RULE_FILE_NAME, Rule};
use crate::rules::violation::{RuleRef, Violation};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Outcome of checking one import against one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<'r> {
    /// The selector does not match; the rule does not apply
    NotSelected,
    /// Selected and compliant
    Allowed,
    /// Selected and in violation
    Violated {
        /// Every forbidden prefix the import starts with, in rule order
        forbidden: Vec<&'r str>,
        /// The import starts with none of the allowed prefixes
        unmatched: bool,
    },
}

/// Classify `import` against a rule whose selector is already compiled
pub fn classify<'r>(rule: &'r Rule, selector: &Regex, import: &str) -> Verdict<'r> {
    if !selector.is_match(import) {
        return Verdict::NotSelected;
    }

    let forbidden: Vec<&str> = rule
        .forbidden_prefixes
        .iter()
        .map(String::as_str)
        .filter(|prefix| import.starts_with(*prefix))
        .collect();

    let unmatched = !rule
        .allowed_prefixes
        .iter()
        .any(|prefix| import.starts_with(prefix.as_str()));

    if forbidden.is_empty() && !unmatched {
        Verdict::Allowed
    } else {
        Verdict::Violated {
            forbidden,
            unmatched,
        }
    }
}

/// A rule with its selector compiled once
///
/// Compile failures are kept as rendered messages and reported per package.
pub struct CompiledRule {
    index: usize,
    rule: Rule,
    selector: Result<Regex, String>,
}

impl std::fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledRule")
            .field("index", &self.index)
            .field("rule", &self.rule)
            .field("compiled", &self.selector.is_ok())
            .finish()
    }
}

impl CompiledRule {
    /// Compile the selector of the rule at `index`
    pub fn new(index: usize, rule: Rule) -> Self {
        let selector = Regex::new(&rule.selector_regexp).map_err(|e| single_line(&e.to_string()));
        CompiledRule {
            index,
            rule,
            selector,
        }
    }

    /// The underlying rule record
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Whether the selector compiled
    pub fn is_valid(&self) -> bool {
        self.selector.is_ok()
    }

    fn rule_ref(&self) -> RuleRef {
        RuleRef {
            index: self.index,
            selector: self.rule.selector_regexp.clone(),
        }
    }

    /// Check every import against this rule
    ///
    /// A rule whose selector failed to compile yields exactly one
    /// `bad-selector` violation regardless of the imports.
    pub fn check<'a, I>(&self, imports: I, rule_file: &str) -> Vec<Violation>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let selector = match &self.selector {
            Ok(selector) => selector,
            Err(error) => {
                return vec![Violation::bad_selector(
                    self.rule_ref(),
                    rule_file,
                    error.clone(),
                )];
            }
        };

        let mut violations = Vec::new();
        for import in imports {
            if let Verdict::Violated {
                forbidden,
                unmatched,
            } = classify(&self.rule, selector, import)
            {
                for prefix in forbidden {
                    violations.push(Violation::forbidden_prefix(import, self.rule_ref(), prefix));
                }
                if unmatched {
                    violations.push(Violation::no_allowed_prefix_match(import, self.rule_ref()));
                }
            }
        }
        violations
    }
}

/// The ordered rules of one rule file
#[derive(Debug)]
pub struct RuleSet {
    package: String,
    file: PathBuf,
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Build a rule set for the rule file of `package`, compiling selectors
    pub fn new(package: impl Into<String>, file: impl Into<PathBuf>, rules: Vec<Rule>) -> Self {
        RuleSet {
            package: package.into(),
            file: file.into(),
            rules: rules
                .into_iter()
                .enumerate()
                .map(|(index, rule)| CompiledRule::new(index, rule))
                .collect(),
        }
    }

    /// Package path whose directory holds the rule file
    pub fn package(&self) -> &str {
        &self.package
    }

    /// On-disk location of the rule file
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The rule file named by its package path (`<pkg>/.import-restrictions`)
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.package, RULE_FILE_NAME)
    }

    /// Rules in file order
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check a package's imports against every rule, in file order
    pub fn check(&self, imports: &BTreeSet<String>) -> Vec<Violation> {
        let rule_file = self.display_name();
        self.rules
            .iter()
            .flat_map(|rule| rule.check(imports, &rule_file))
            .collect()
    }
}

/// Collapse a multi-line message onto one line
fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_rule() -> Rule {
        Rule::new("a/b", ["a/b/ok"], ["a/b/ok/bad"])
    }

    fn verdict<'r>(rule: &'r Rule, import: &str) -> Verdict<'r> {
        let selector = Regex::new(&rule.selector_regexp).unwrap();
        classify(rule, &selector, import)
    }

    fn violated<'r>(forbidden: &[&'r str], unmatched: bool) -> Verdict<'r> {
        Verdict::Violated {
            forbidden: forbidden.to_vec(),
            unmatched,
        }
    }

    #[test]
    fn test_forbidden_prefix_only() {
        assert_eq!(
            verdict(&example_rule(), "a/b/ok/bad/x"),
            violated(&["a/b/ok/bad"], false)
        );
    }

    #[test]
    fn test_no_allowed_prefix_only() {
        assert_eq!(
            verdict(&example_rule(), "a/b/other"),
            violated(&[], true)
        );
    }

    #[test]
    fn test_allowed() {
        assert_eq!(verdict(&example_rule(), "a/b/ok/y"), Verdict::Allowed);
    }

    #[test]
    fn test_not_selected() {
        assert_eq!(verdict(&example_rule(), "z/q"), Verdict::NotSelected);
    }

    #[test]
    fn test_selector_is_unanchored() {
        let rule = Rule::new("b/c", ["x"], Vec::<String>::new());
        assert_eq!(
            verdict(&rule, "a/b/c/d"),
            violated(&[], true)
        );
    }

    #[test]
    fn test_forbidden_and_not_allowed_both_reported() {
        let rule = Rule::new("", ["k8s.io/api"], ["k8s.io/kubernetes"]);
        assert_eq!(
            verdict(&rule, "k8s.io/kubernetes/pkg"),
            violated(&["k8s.io/kubernetes"], true)
        );
    }

    #[test]
    fn test_every_matching_forbidden_prefix_reported() {
        let rule = Rule::new("", ["a"], ["a/b", "a/b/c", "a/x"]);
        assert_eq!(verdict(&rule, "a/b/c/d"), violated(&["a/b", "a/b/c"], false));

        let compiled = CompiledRule::new(0, rule);
        let imports: BTreeSet<String> = ["a/b/c/d".to_string()].into_iter().collect();
        let messages: Vec<String> = compiled
            .check(&imports, "p/.import-restrictions")
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                r#"import "a/b/c/d" has forbidden prefix a/b"#,
                r#"import "a/b/c/d" has forbidden prefix a/b/c"#,
            ]
        );
    }

    #[test]
    fn test_empty_allowed_list_rejects_selected_imports() {
        let rule = Rule::new("^a/", Vec::<String>::new(), Vec::<String>::new());
        assert_eq!(
            verdict(&rule, "a/b"),
            violated(&[], true)
        );
    }

    #[test]
    fn test_prefixes_are_literal_not_patterns() {
        let rule = Rule::new("", ["a.b"], Vec::<String>::new());
        assert_eq!(
            verdict(&rule, "axb/c"),
            violated(&[], true)
        );
        assert_eq!(verdict(&rule, "a.b/c"), Verdict::Allowed);
    }

    #[test]
    fn test_bad_selector_reported_once_per_rule() {
        let rule = CompiledRule::new(0, Rule::new("a(", ["a"], Vec::<String>::new()));
        assert!(!rule.is_valid());

        let imports: BTreeSet<String> =
            ["a/1", "a/2", "a/3"].iter().map(|s| s.to_string()).collect();
        let violations = rule.check(&imports, "p/.import-restrictions");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].reason.tag(), "bad-selector");
        assert!(!violations[0].to_string().contains('\n'));
    }

    #[test]
    fn test_rule_set_evaluates_rules_in_order_after_bad_selector() {
        let set = RuleSet::new(
            "example.com/proj",
            "/src/proj/.import-restrictions",
            vec![
                Rule::new("[", ["x"], Vec::<String>::new()),
                Rule::new("a/b", ["a/b/ok"], ["a/b/ok/bad"]),
            ],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.display_name(), "example.com/proj/.import-restrictions");

        let imports: BTreeSet<String> = ["a/b/other", "a/b/ok/y"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let violations = set.check(&imports);
        let tags: Vec<&str> = violations.iter().map(|v| v.reason.tag()).collect();
        assert_eq!(tags, vec!["bad-selector", "no-allowed-prefix-match"]);
        assert_eq!(violations[1].rule.as_ref().unwrap().index, 1);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("regex parse error:\n    a(\n     ^"), "regex parse error: a( ^");
    }
}
