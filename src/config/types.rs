use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::codec::ExportOptions;

/// Default model id passed to the translation provider.
pub const DEFAULT_TRANSLATION_MODEL: &str = "anthropic/claude-3.5-haiku-20241022:beta";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "includePatterns[0]")
    pub field_path: String,
    /// Human readable reason
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list, one error per line
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of `.xcstrings-editor.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Globs selecting catalog files, relative to the workspace root
    pub include_patterns: Vec<String>,
    /// Globs removed from the include set
    pub exclude_patterns: Vec<String>,

    /// Last selected target language. Used when a command is given no `--lang`.
    pub target_language: Option<String>,

    /// Output layout
    pub export: ExportConfig,
    /// Translation provider settings
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Write `"key" :` instead of `"key":`, matching Xcode.
    pub space_before_colon: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { space_before_colon: true }
    }
}

impl From<ExportConfig> for ExportOptions {
    fn from(config: ExportConfig) -> Self {
        Self { space_before_colon: config.space_before_colon }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationConfig {
    /// Model id sent to the provider
    pub model: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self { model: DEFAULT_TRANSLATION_MODEL.to_string() }
    }
}

impl EditorSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "includePatterns",
                "At least one pattern is required. Example: [\"**/*.xcstrings\"]",
            ));
        }

        for (index, pattern) in self.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if let Some(language) = &self.target_language
            && language.trim().is_empty()
        {
            errors.push(ValidationError::new(
                "targetLanguage",
                "The language cannot be empty. Please specify a language code (e.g., \"fr\"), or remove this field",
            ));
        }

        if self.translation.model.trim().is_empty() {
            errors.push(ValidationError::new(
                "translation.model",
                format!("The model cannot be empty. Example: \"{DEFAULT_TRANSLATION_MODEL}\""),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.xcstrings".to_string()],
            exclude_patterns: vec!["**/build/**".to_string(), "**/DerivedData/**".to_string()],
            target_language: None,
            export: ExportConfig::default(),
            translation: TranslationConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = EditorSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"targetLanguage": "fr", "export": {"spaceBeforeColon": false}}"#;

        let settings: EditorSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.target_language, some(eq("fr")));
        assert_that!(settings.export.space_before_colon, eq(false));
        assert_that!(settings.include_patterns, len(eq(1)));
        assert_that!(settings.translation.model, eq(DEFAULT_TRANSLATION_MODEL));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: EditorSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.include_patterns, elements_are![eq("**/*.xcstrings")]);
        assert_that!(
            settings.exclude_patterns,
            elements_are![eq("**/build/**"), eq("**/DerivedData/**")]
        );
        assert_that!(settings.target_language, none());
        assert_that!(settings.export.space_before_colon, eq(true));
    }

    #[rstest]
    fn export_config_converts_to_options() {
        let options = ExportOptions::from(ExportConfig { space_before_colon: false });

        assert_that!(options.space_before_colon, eq(false));
    }

    #[rstest]
    fn validate_invalid_include_patterns_empty() {
        let settings = EditorSettings { include_patterns: vec![], ..EditorSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("includePatterns")),
                field!(ValidationError.message, contains_substring("At least one pattern"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_include_pattern_invalid_glob() {
        let settings = EditorSettings {
            include_patterns: vec!["**/*.{xcstrings".to_string()],
            ..EditorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("includePatterns[0]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("**/*.{xcstrings"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_exclude_pattern_invalid_glob() {
        let settings = EditorSettings {
            exclude_patterns: vec![
                "**/build/**".to_string(),
                "Pods/**".to_string(),
                "invalid[pattern".to_string(),
            ],
            ..EditorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("excludePatterns[2]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("invalid[pattern"))
            ]])
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("  ")]
    fn validate_invalid_target_language_empty(#[case] language: &str) {
        let settings =
            EditorSettings { target_language: Some(language.to_string()), ..EditorSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("targetLanguage")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_translation_model_empty() {
        let settings = EditorSettings {
            translation: TranslationConfig { model: String::new() },
            ..EditorSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translation.model")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = EditorSettings {
            include_patterns: vec![],
            target_language: Some(String::new()),
            ..EditorSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. includePatterns"));
        assert_that!(error_message, contains_substring("At least one pattern"));
        assert_that!(error_message, contains_substring("2. targetLanguage"));
        assert_that!(error_message, contains_substring("cannot be empty"));
    }
}
