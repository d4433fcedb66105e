#![forbid(unsafe_code)]

//! Rule records and rule-file parsing
//!
//! A rule file is a JSON document named [`RULE_FILE_NAME`] placed in a package
//! directory. It governs that package and every descendant package that has no
//! rule file of its own.

use serde::de::{DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Well-known name of the per-directory rule file
pub const RULE_FILE_NAME: &str = ".import-restrictions";

/// The members of one JSON object, in document order
///
/// Rule files are written for Go's `encoding/json`, so member names match
/// case-insensitively and a repeated name resolves to its last occurrence.
/// Unknown members are ignored.
#[derive(Debug, Default)]
struct Fields(Vec<(String, Value)>);

impl Fields {
    fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Decode member `name`; missing or `null` reads as the default
    fn decode<T>(&self, name: &str) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned + Default,
    {
        match self.get(name) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::deserialize(value),
        }
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Fields, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut members = Vec::new();
                while let Some(member) = map.next_entry::<String, serde_json::Value>()? {
                    members.push(member);
                }
                Ok(Fields(members))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// One policy clause of a rule file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Regular expression selecting the imports this rule examines
    #[serde(rename = "SelectorRegexp")]
    pub selector_regexp: String,

    /// A selected import must start with at least one of these
    #[serde(rename = "AllowedPrefixes")]
    pub allowed_prefixes: Vec<String>,

    /// A selected import starting with any of these is a violation
    #[serde(rename = "ForbiddenPrefixes")]
    pub forbidden_prefixes: Vec<String>,
}

impl Rule {
    /// Creates a rule from its selector and prefix lists
    pub fn new<A, F>(selector: impl Into<String>, allowed: A, forbidden: F) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Rule {
            selector_regexp: selector.into(),
            allowed_prefixes: allowed.into_iter().map(Into::into).collect(),
            forbidden_prefixes: forbidden.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parse the rules of a rule file, preserving file order
///
/// A `null` document or rule list reads as no rules, and a `null` rule as a
/// rule with every member empty.
pub fn parse_rules(content: &str) -> Result<Vec<Rule>, serde_json::Error> {
    let document: Option<Fields> = serde_json::from_str(content)?;
    let definitions: Vec<Option<Fields>> = document.unwrap_or_default().decode("Rules")?;

    definitions
        .into_iter()
        .map(|definition| {
            let definition = definition.unwrap_or_default();
            Ok(Rule {
                selector_regexp: definition.decode("SelectorRegexp")?,
                allowed_prefixes: prefixes(&definition, "AllowedPrefixes")?,
                forbidden_prefixes: prefixes(&definition, "ForbiddenPrefixes")?,
            })
        })
        .collect()
}

/// A prefix list; `null` entries read as empty prefixes
fn prefixes(definition: &Fields, name: &str) -> Result<Vec<String>, serde_json::Error> {
    let entries: Vec<Option<String>> = definition.decode(name)?;
    Ok(entries.into_iter().map(Option::unwrap_or_default).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_rule_file() {
        let content = r#"{
            "Rules": [
                {
                    "SelectorRegexp": "example[.]com/proj",
                    "AllowedPrefixes": ["example.com/proj/pkg/api"],
                    "ForbiddenPrefixes": ["example.com/proj/internal"]
                },
                {
                    "SelectorRegexp": "k8s[.]io",
                    "AllowedPrefixes": ["k8s.io/utils"]
                }
            ]
        }"#;

        let rules = parse_rules(content).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector_regexp, "example[.]com/proj");
        assert_eq!(rules[0].allowed_prefixes, vec!["example.com/proj/pkg/api"]);
        assert_eq!(rules[0].forbidden_prefixes, vec!["example.com/proj/internal"]);
        assert_eq!(rules[1].selector_regexp, "k8s[.]io");
        assert!(rules[1].forbidden_prefixes.is_empty());
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let content = r#"{"Comment": "x", "Rules": [{"SelectorRegexp": "a", "Note": 1}]}"#;
        let rules = parse_rules(content).unwrap();
        assert_eq!(rules, vec![Rule::new("a", Vec::<String>::new(), Vec::<String>::new())]);
    }

    #[test]
    fn test_parse_null_lists() {
        let content = r#"{"Rules": [{"SelectorRegexp": "a", "AllowedPrefixes": null}]}"#;
        let rules = parse_rules(content).unwrap();
        assert!(rules[0].allowed_prefixes.is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_rules("{}").unwrap().is_empty());
        assert!(parse_rules(r#"{"Rules": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        let content = r#"{"rules": [{"selectorRegexp": "a", "allowedPrefixes": ["a/b"]}]}"#;
        let rules = parse_rules(content).unwrap();
        assert_eq!(rules[0].allowed_prefixes, vec!["a/b"]);
    }

    #[test]
    fn test_member_names_match_case_insensitively() {
        let content = r#"{"RULES": [{
            "SelectorRegExp": "^a/",
            "allowedprefixes": ["a/ok"],
            "FORBIDDENPREFIXES": ["a/ok/bad"]
        }]}"#;
        let rules = parse_rules(content).unwrap();
        assert_eq!(rules, vec![Rule::new("^a/", ["a/ok"], ["a/ok/bad"])]);
    }

    #[test]
    fn test_repeated_member_last_occurrence_wins() {
        let content = r#"{"Rules": [], "rules": [{"SelectorRegexp": "a"}]}"#;
        let rules = parse_rules(content).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector_regexp, "a");

        let content = r#"{"Rules": [{"SelectorRegexp": "first", "selectorRegexp": "second"}]}"#;
        assert_eq!(parse_rules(content).unwrap()[0].selector_regexp, "second");
    }

    #[test]
    fn test_null_document_and_entries() {
        assert!(parse_rules("null").unwrap().is_empty());

        let content = r#"{"Rules": [null, {"SelectorRegexp": "a", "AllowedPrefixes": [null, "b"]}]}"#;
        let rules = parse_rules(content).unwrap();
        assert_eq!(rules[0], Rule::default());
        assert_eq!(rules[1].allowed_prefixes, vec!["", "b"]);
    }

    #[test]
    fn test_parse_rejects_non_object_document() {
        assert!(parse_rules("[]").is_err());
        assert!(parse_rules(r#"{"Rules": [{"SelectorRegexp": 3}]}"#).is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_rules("{ not json").is_err());
        assert!(parse_rules(r#"{"Rules": "nope"}"#).is_err());
    }
}
