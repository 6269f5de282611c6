//! YAML error diagnostics for catalog files

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// YAML syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid catalog YAML: {message}")]
#[diagnostic(code(cabprice::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Suggested fix, if the message matched a known problem
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Deserialize YAML, reporting failures as a located diagnostic
pub fn parse_yaml<T: DeserializeOwned + 'static>(source: &str, filename: &str) -> Result<T, YamlSyntaxError> {
    serde_yml::from_str(source).map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename))
}

/// Convert 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        match source.match_indices('\n').nth(line - 2) {
            Some((idx, _)) => idx + 1,
            None => return source.len().saturating_sub(1),
        }
    };

    let line_text = source[line_start..].split('\n').next().unwrap_or("");
    let col_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);

    line_start + col_offset
}

/// Suggest a fix based on the error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("unknown field") {
        return Some(
            "Catalog sections are: settings, materials, door_styles, colors, finishes, hardware_sets, cabinets, parts".to_string(),
        );
    }

    if msg_lower.contains("unknown variant") {
        return Some(
            "Hardware categories are 'hinge' or 'runner'; part roles are side, back, bottom, door, hardware or other".to_string(),
        );
    }

    if msg_lower.contains("missing field") {
        return Some("Add the missing field to the record; ids and names are always required".to_string());
    }

    if msg_lower.contains("invalid type") {
        return Some("Dimensions, rates and weights are plain numbers; formulas are strings".to_string());
    }

    if msg_lower.contains("expected block end") {
        return Some("Check your indentation - it may be inconsistent.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 1), source.len() - 1);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("duplicate key").is_some());
        assert!(generate_help("cabinets[0]: missing field `name`").is_some());
        assert!(generate_help("unknown variant `hinges`").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_parse_yaml_error_is_located() {
        let source = "id: hmr\nweight_per_sqm: [heavy\n";
        let err = parse_yaml::<serde_yml::Value>(source, "materials.yaml").unwrap_err();
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_unknown_section_has_help() {
        #[derive(Debug, serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        #[allow(dead_code)]
        struct Sections {
            cabinets: Vec<String>,
        }

        let err = parse_yaml::<Sections>("cabinets: []
doors: []
", "catalog.yaml").unwrap_err();
        assert!(err.help_text().is_some_and(|h| h.contains("door_styles")));
        assert!(Diagnostic::help(&err).is_some());
    }

    #[test]
    fn test_parse_yaml_ok() {
        let value: serde_yml::Value = parse_yaml("a: 1", "x.yaml").unwrap();
        assert!(value.get("a").is_some());
    }
}
