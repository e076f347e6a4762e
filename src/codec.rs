//! Catalog import / export.
//!
//! Export reproduces the layout Xcode's toolchain expects from this editor:
//! two-space pretty JSON where every `"key":` becomes `"key" :`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::error::Category;
use thiserror::Error;

use crate::catalog::Catalog;

/// Import failures. No catalog is installed when one is returned.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The bytes are not valid JSON.
    #[error("Failed to parse the imported file. Please ensure it's a valid JSON file: {0}")]
    Malformed(#[source] serde_json::Error),
    /// Valid JSON that does not have the catalog shape.
    #[error("Invalid data structure in Localizable.xcstrings: {0}")]
    InvalidStructure(String),
}

/// Output formatting switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Rewrite `"key":` as `"key" :`
    pub space_before_colon: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { space_before_colon: true }
    }
}

/// `"key":` occurrences. Matched over the whole text, string contents included.
#[allow(clippy::unwrap_used)]
static KEY_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)":"#).unwrap());

/// Parses and validates catalog bytes.
///
/// # Errors
/// - [`ParseError::Malformed`] for syntax errors or truncated input
/// - [`ParseError::InvalidStructure`] when `sourceLanguage`, `strings` or
///   `version` is missing or empty, or a value has the wrong shape
pub fn import(bytes: &[u8]) -> Result<Catalog, ParseError> {
    let catalog: Catalog = serde_json::from_slice(bytes).map_err(|e| match e.classify() {
        Category::Data => ParseError::InvalidStructure(e.to_string()),
        Category::Io | Category::Syntax | Category::Eof => ParseError::Malformed(e),
    })?;

    if catalog.source_language.is_empty() {
        return Err(ParseError::InvalidStructure("sourceLanguage is empty".to_string()));
    }
    if catalog.version.is_empty() {
        return Err(ParseError::InvalidStructure("version is empty".to_string()));
    }

    for key in catalog.entries_missing_source() {
        tracing::warn!(key, source_language = %catalog.source_language, "Entry has no source localization");
    }

    tracing::debug!(
        source_language = %catalog.source_language,
        entries = catalog.strings.len(),
        "Imported catalog"
    );
    Ok(catalog)
}

/// Serializes with the default options.
///
/// # Errors
/// Returns error if serialization fails.
pub fn export(catalog: &Catalog) -> Result<Vec<u8>, serde_json::Error> {
    export_with(catalog, ExportOptions::default())
}

/// Serializes a catalog to file bytes.
///
/// # Errors
/// Returns error if serialization fails.
pub fn export_with(catalog: &Catalog, options: ExportOptions) -> Result<Vec<u8>, serde_json::Error> {
    let json = serde_json::to_string_pretty(catalog)?;
    if !options.space_before_colon {
        return Ok(json.into_bytes());
    }
    Ok(KEY_COLON.replace_all(&json, "\"${1}\" :").into_owned().into_bytes())
}
