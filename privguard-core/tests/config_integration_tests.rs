// privguard-core/tests/config_integration_tests.rs
use anyhow::Result;
use tempfile::NamedTempFile;
use std::io::Write;

// Import the specific types and functions needed from the main crate's config module
use privguard_core::config::{self, DetectionConfig, PatternRule};

#[test]
fn test_load_default_patterns() {
    let config = DetectionConfig::load_default_patterns().unwrap();
    assert!(!config.patterns.is_empty());
    assert!(config.patterns.iter().any(|r| r.name == "email"));

    let email = config.patterns.iter().find(|r| r.name == "email").unwrap();
    assert_eq!(email.label, "EMAIL");
    assert!(!email.programmatic_validation);

    // The IBAN pattern opts into checksum validation.
    let iban = config.patterns.iter().find(|r| r.name == "iban").unwrap();
    assert!(iban.programmatic_validation);
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
patterns:
  - name: test_rule
    label: TEST
    pattern: "test"
    description: "A test pattern"
    multiline: false
    dot_matches_new_line: false
    programmatic_validation: true # Explicitly set
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = DetectionConfig::load_from_file(file.path())?;
    assert_eq!(config.patterns.len(), 1);
    assert_eq!(config.patterns[0].name, "test_rule");
    assert_eq!(config.patterns[0].label, "TEST");
    assert!(config.patterns[0].programmatic_validation); // Assert true for explicit
    assert_eq!(config.patterns[0].pattern, Some("test".to_string()));
    Ok(())
}

#[test]
fn test_load_from_file_defaults_omitted_fields() -> Result<()> {
    let yaml_content = r#"
patterns:
  - name: minimal
    label: MIN
    pattern: "minimal"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = DetectionConfig::load_from_file(file.path())?;
    assert_eq!(config.patterns.len(), 1);
    let rule = &config.patterns[0];
    assert!(!rule.multiline);
    assert!(!rule.programmatic_validation);
    assert!(!rule.opt_in);
    assert_eq!(rule.enabled, None);
    Ok(())
}

#[test]
fn test_load_from_file_rejects_invalid_regex() -> Result<()> {
    let yaml_content = r#"
patterns:
  - name: broken
    label: BROKEN
    pattern: "([unclosed"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let result = DetectionConfig::load_from_file(file.path());
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_load_from_file_rejects_duplicate_names() -> Result<()> {
    let yaml_content = r#"
patterns:
  - name: dup
    label: A
    pattern: "a"
  - name: dup
    label: B
    pattern: "b"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let result = DetectionConfig::load_from_file(file.path());
    assert!(result.is_err());
    Ok(())
}

fn simple_rule(name: &str, label: &str, pattern: &str) -> PatternRule {
    PatternRule {
        name: name.to_string(),
        label: label.to_string(),
        pattern: Some(pattern.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_merge_patterns_no_user_config() {
    let default_config = DetectionConfig {
        patterns: vec![simple_rule("email", "EMAIL", "default-pattern")],
    };
    let merged = config::merge_patterns(default_config.clone(), None);
    assert_eq!(merged.patterns.len(), 1);
    assert_eq!(merged.patterns[0].name, "email");
    assert_eq!(merged.patterns[0].pattern, Some("default-pattern".to_string()));
}

#[test]
fn test_merge_patterns_user_overrides_by_name() {
    let default_config = DetectionConfig {
        patterns: vec![simple_rule("email", "EMAIL", "default-pattern")],
    };
    let user_config = DetectionConfig {
        patterns: vec![simple_rule("email", "MAIL", "user-pattern")],
    };
    let merged = config::merge_patterns(default_config, Some(user_config));
    assert_eq!(merged.patterns.len(), 1);
    assert_eq!(merged.patterns[0].label, "MAIL");
    assert_eq!(merged.patterns[0].pattern, Some("user-pattern".to_string()));
}

#[test]
fn test_merge_patterns_user_adds_new_rule() {
    let default_config = DetectionConfig {
        patterns: vec![simple_rule("email", "EMAIL", "default-pattern")],
    };
    let user_config = DetectionConfig {
        patterns: vec![simple_rule("badge_id", "BADGE", "B-\\d{6}")],
    };
    let merged = config::merge_patterns(default_config, Some(user_config));
    assert_eq!(merged.patterns.len(), 2);
    assert!(merged.patterns.iter().any(|r| r.name == "badge_id"));
}

#[test]
fn test_custom_config_drives_detection() -> Result<()> {
    let config = DetectionConfig {
        patterns: vec![simple_rule("badge_id", "BADGE", r"\bB-\d{6}\b")],
    };
    let (sanitized, table) =
        privguard_core::anonymize_string(config, "badge B-123456 checked", "en")?;
    assert_eq!(sanitized, "badge <BADGE_1> checked");
    assert_eq!(privguard_core::restore_string(&sanitized, &table), "badge B-123456 checked");
    Ok(())
}
