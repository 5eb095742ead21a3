//! Integration tests for rule validation

use shroud::anonymization::validate_rules;
use shroud::domain::Rule;
use shroud::rules::{BuiltinRules, Rulesheet};

#[test]
fn test_conflicting_replacements_rejected() {
    let result = validate_rules(&[Rule::new("foo", "A"), Rule::new("foo", "B")]);

    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("\"foo\""));
}

#[test]
fn test_redundant_duplicate_is_warning() {
    let result = validate_rules(&[Rule::new("foo", "A"), Rule::new("foo", "A")]);

    assert!(result.valid);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Duplicate rules"));
}

#[test]
fn test_disabled_and_blank_rules_ignored() {
    let result = validate_rules(&[
        Rule::new("(broken", "A").disabled(),
        Rule::new("  ", " "),
        Rule::new(r"db\d+", "dbHost"),
    ]);

    assert!(result.valid);
    assert!(result.errors.is_empty());
}

#[test]
fn test_errors_for_bad_pattern_and_label() {
    let result = validate_rules(&[
        Rule::new("(broken", "A"),
        Rule::new(r"host-\d+", "1bad label"),
        Rule::new(r"\w+", ""),
    ]);

    assert!(!result.valid);
    assert_eq!(result.errors.len(), 3);
    assert!(result.errors.iter().any(|e| e.starts_with("Rule 1: invalid regex")));
    assert!(result.errors.iter().any(|e| e.starts_with("Rule 2: replacement")));
    assert!(result.errors.iter().any(|e| e == "Rule 3: replacement is required."));
}

#[test]
fn test_cidr_and_ip_overlap_warns() {
    let result = validate_rules(&[
        Rule::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b", "ip"),
        Rule::new(r"\b10\.20\.\d{1,3}\.\d{1,3}\b", "LAB_{index}"),
    ]);

    assert!(result.valid);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Potential overlap: Rule 1"));
}

#[test]
fn test_builtin_library_is_valid() {
    let builtin = BuiltinRules::load().unwrap();
    let result = validate_rules(builtin.rules());
    assert!(result.valid, "errors: {:?}", result.errors);
}

#[test]
fn test_rulesheet_rules_validate() {
    let sheet = Rulesheet::parse(
        r#"{
            "version": "1",
            "rules": [
                { "pattern": "lxc-\\d+", "replacement": "lxcHost" },
                { "pattern": "prod-db\\d+", "replacement": "DB_{index}" }
            ]
        }"#,
    )
    .unwrap();

    let result = validate_rules(&sheet.active_rules());
    assert!(result.valid);
    assert!(result.warnings.is_empty());
}
