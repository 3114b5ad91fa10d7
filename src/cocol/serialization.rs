//! Serialization of language definitions
//!
//! A [LanguageDefinition] can be written as JSON or YAML for editor
//! tooling, or rendered as a plain-text overview for terminals.

use crate::cocol::definition::LanguageDefinition;
use std::fmt;

/// Errors that can occur while serializing a definition
#[derive(Debug)]
pub enum SerializeError {
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::Json(e) => write!(f, "JSON serialization error: {}", e),
            SerializeError::Yaml(e) => write!(f, "YAML serialization error: {}", e),
        }
    }
}

impl std::error::Error for SerializeError {}

impl From<serde_json::Error> for SerializeError {
    fn from(err: serde_json::Error) -> Self {
        SerializeError::Json(err)
    }
}

impl From<serde_yaml::Error> for SerializeError {
    fn from(err: serde_yaml::Error) -> Self {
        SerializeError::Yaml(err)
    }
}

pub fn to_json(definition: &LanguageDefinition) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(definition)?)
}

pub fn to_yaml(definition: &LanguageDefinition) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(definition)?)
}

/// Renders a human-readable summary of a definition
pub fn render_overview(definition: &LanguageDefinition) -> String {
    let mut output = String::new();
    output.push_str(&format!("Language: {}\n", definition.language_id));
    output.push_str(&format!("File pattern: {}\n", definition.file_pattern));
    output.push('\n');

    output.push_str("Comment rules:\n");
    let comment_rules = &definition.comment_rules;
    if comment_rules.normal.is_empty() && comment_rules.documentation.is_empty() {
        output.push_str("  (none)\n");
    } else {
        for rule in &comment_rules.normal {
            output.push_str(&format!(
                "  \"{}\" .. \"{}\"\n",
                rule.start.escape_debug(),
                rule.end.escape_debug()
            ));
        }
        for rule in &comment_rules.documentation {
            output.push_str(&format!(
                "  \"{}\" .. \"{}\" (documentation)\n",
                rule.start.escape_debug(),
                rule.end.escape_debug()
            ));
        }
    }

    output.push_str("Start rules:\n");
    for name in &definition.start_rules {
        output.push_str(&format!("  {}\n", name));
    }

    output.push_str("Rules:\n");
    for rule in definition.rules.values() {
        output.push_str(&format!("  {}\n", rule));
    }
    output
}

/// Whether a character may appear in a serialized definition file
///
/// Tracks the XML 1.0 character production: tab, line feed, carriage
/// return and everything from space upward except the surrogate block
/// and the two final noncharacters of the basic plane.
pub fn is_definition_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || (' '..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cocol::definition::{CommentRule, CommentRules, Rule};
    use crate::cocol::symbol::Symbol;
    use std::collections::BTreeMap;

    fn sample_definition() -> LanguageDefinition {
        let mut rules = BTreeMap::new();
        rules.insert(
            "program".to_string(),
            Rule::new("program", vec![Symbol::AnyDigit]),
        );
        LanguageDefinition {
            language_id: "demo".to_string(),
            file_pattern: "*.demo".to_string(),
            comment_rules: CommentRules::default(),
            start_rules: vec!["program".to_string()],
            rules,
        }
    }

    #[test]
    fn test_definition_char_accepts_document_characters() {
        assert!(is_definition_char('\t'));
        assert!(is_definition_char('\n'));
        assert!(is_definition_char('\r'));
        assert!(is_definition_char(' '));
        assert!(is_definition_char('a'));
        assert!(is_definition_char('\u{D7FF}'));
        assert!(is_definition_char('\u{E000}'));
        assert!(is_definition_char('\u{FFFD}'));
        assert!(is_definition_char('\u{10000}'));
        assert!(is_definition_char('\u{10FFFF}'));
    }

    #[test]
    fn test_definition_char_rejects_control_and_noncharacters() {
        assert!(!is_definition_char('\u{0}'));
        assert!(!is_definition_char('\u{8}'));
        assert!(!is_definition_char('\u{B}'));
        assert!(!is_definition_char('\u{1F}'));
        assert!(!is_definition_char('\u{FFFE}'));
        assert!(!is_definition_char('\u{FFFF}'));
    }

    #[test]
    fn test_json_round_trip_preserves_definition() {
        let definition = sample_definition();
        let json = to_json(&definition).unwrap();
        let restored: LanguageDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, definition);
    }

    #[test]
    fn test_json_uses_stable_field_names() {
        let json = to_json(&sample_definition()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["language_id"], "demo");
        assert_eq!(value["file_pattern"], "*.demo");
        assert!(value["rules"]["program"]["symbols"].is_array());
        assert_eq!(value["start_rules"][0], "program");
    }

    #[test]
    fn test_yaml_round_trip_preserves_definition() {
        let definition = sample_definition();
        let yaml = to_yaml(&definition).unwrap();
        let restored: LanguageDefinition = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored, definition);
    }

    #[test]
    fn test_overview_lists_every_section() {
        let overview = render_overview(&sample_definition());
        let expected = "Language: demo\nFile pattern: *.demo\n\nComment rules:\n  (none)\nStart rules:\n  program\nRules:\n  program = <digit>\n";
        assert_eq!(overview, expected);
    }

    #[test]
    fn test_overview_marks_documentation_comments() {
        let mut definition = sample_definition();
        definition.comment_rules = CommentRules {
            normal: vec![CommentRule::new("//", "\n")],
            documentation: vec![CommentRule::new("/**", "*/")],
        };
        let overview = render_overview(&definition);
        assert!(overview.contains("  \"//\" .. \"\\n\"\n"));
        assert!(overview.contains("  \"/**\" .. \"*/\" (documentation)\n"));
    }
}
