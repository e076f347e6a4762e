//! Translation provider boundary.
//!
//! Builds the request prompt sent to a model and pulls the translated text
//! back out of its reply. Transport is left to the caller.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{
    Catalog,
    VariationPath,
};

/// Body of the first `<translation>` element, across line breaks.
#[allow(clippy::unwrap_used)]
static TRANSLATION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<translation>(.*?)</translation>").unwrap());

/// Everything a model needs to translate one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_language: String,
    pub target_language: String,
    pub translation_key: String,
    /// Developer comment; empty when the entry has none
    pub comment: String,
    pub source_text: String,
}

impl TranslationRequest {
    /// Request for one entry, or `None` when the key is absent.
    ///
    /// With a `path` the source text is the source leaf at that path,
    /// otherwise the flat value. Either falls back to the key when the
    /// source language has no value there.
    #[must_use]
    pub fn for_entry(
        catalog: &Catalog,
        key: &str,
        target_language: &str,
        path: Option<&VariationPath>,
    ) -> Option<Self> {
        let entry = catalog.entry(key)?;
        let source = entry.localization(&catalog.source_language);
        let source_text = match path {
            Some(path) => source
                .and_then(|localization| localization.variations())
                .and_then(|variations| variations.value_at(path)),
            None => source.and_then(|localization| localization.string_unit()).map(|unit| unit.value.as_str()),
        }
        .unwrap_or(key);

        Some(Self {
            source_language: catalog.source_language.clone(),
            target_language: target_language.to_string(),
            translation_key: key.to_string(),
            comment: entry.comment.clone().unwrap_or_default(),
            source_text: source_text.to_string(),
        })
    }
}

/// Renders the instruction prompt for `request`.
#[must_use]
pub fn build_prompt(request: &TranslationRequest) -> String {
    let mut prompt = String::from(
        "You are a translator specializing in UI string localization for software applications. \
         Translate the text accurately while preserving its meaning and formatting, keeping in mind \
         that it is shown in a user interface.\n\n\
         You will receive the following inputs:\n",
    );

    let inputs = [
        ("Source language", "source_language", request.source_language.as_str()),
        ("Target language", "target_language", request.target_language.as_str()),
        (
            "Translation key (a unique identifier for this text)",
            "translation_key",
            request.translation_key.as_str(),
        ),
        ("Context (optional information about how the text is used)", "context", request.comment.as_str()),
        ("Source text (the original text to be translated)", "source_text", request.source_text.as_str()),
    ];
    for (number, (label, tag, value)) in inputs.iter().enumerate() {
        let _ = write!(prompt, "\n{}. {label}:\n<{tag}>\n{value}\n</{tag}>\n", number + 1);
    }

    prompt.push_str(
        "\nInstructions:\n\
         1. Read the source text and any provided context.\n\
         2. Analyze the translation inside <translation_analysis> tags: tone and style, UI terminology \
         and formatting, cultural nuances of the target language, and the namespace nesting of \
         translation_key.\n\
         3. Keep the original meaning and any formatting such as line breaks, punctuation and format \
         specifiers. Do not add metadata, tags or extra text that the source does not contain.\n\
         4. Write the translation from the source language to the target language inside \
         <translation></translation> tags.\n",
    );
    prompt
}

/// Trimmed body of the first `<translation>…</translation>`, or an empty
/// string when the reply has none.
#[must_use]
pub fn extract_translation(response: &str) -> String {
    TRANSLATION_TAG
        .captures(response)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use serde_json::json;

    use super::*;
    use crate::test_utils::{
        catalog_from,
        sample_catalog,
    };

    #[rstest]
    #[case::single_line("<translation>Bonjour</translation>", "Bonjour")]
    #[case::trimmed("<translation>\n  Bonjour  \n</translation>", "Bonjour")]
    #[case::multiline("<translation>Ligne 1\nLigne 2</translation>", "Ligne 1\nLigne 2")]
    #[case::after_analysis(
        "<translation_analysis>Greeting.</translation_analysis>\n<translation>Salut</translation>",
        "Salut"
    )]
    #[case::first_wins("<translation>A</translation><translation>B</translation>", "A")]
    #[case::no_tag("Bonjour", "")]
    #[case::unclosed("<translation>Bonjour", "")]
    fn test_extract_translation(#[case] response: &str, #[case] expected: &str) {
        assert_eq!(extract_translation(response), expected);
    }

    #[googletest::test]
    fn test_build_prompt_embeds_request() {
        let request = TranslationRequest {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            translation_key: "settings.title".to_string(),
            comment: "Settings screen header".to_string(),
            source_text: "Settings".to_string(),
        };

        let prompt = build_prompt(&request);

        expect_that!(prompt, contains_substring("<target_language>\nfr\n</target_language>"));
        expect_that!(prompt, contains_substring("<context>\nSettings screen header\n</context>"));
        expect_that!(prompt, contains_substring("5. Source text"));
        expect_that!(prompt, contains_substring("<translation></translation>"));
    }

    #[rstest]
    fn test_request_for_entry() {
        let catalog = sample_catalog();

        let greeting = TranslationRequest::for_entry(&catalog, "greeting", "de", None).unwrap();
        let done = TranslationRequest::for_entry(&catalog, "Done", "de", None).unwrap();

        assert_eq!(greeting.source_text, "Hello");
        assert_eq!(greeting.comment, "Home screen title");
        assert_eq!(done.source_text, "Done");
        assert_eq!(done.comment, "");
        assert_eq!(TranslationRequest::for_entry(&catalog, "nonexistent", "de", None), None);
    }

    #[rstest]
    #[case::nested_leaf("device:iphone.plural:one", "%d photo")]
    #[case::top_level_leaf("device:mac", "Photos")]
    #[case::container("device:iphone", "photos")]
    #[case::absent("device:ipad", "photos")]
    fn test_request_for_variation(#[case] text: &str, #[case] expected: &str) {
        let catalog = catalog_from(json!({
            "photos": { "localizations": { "en": { "variations": { "device": {
                "iphone": { "variations": { "plural": {
                    "one": { "stringUnit": { "state": "translated", "value": "%d photo" } },
                    "other": { "stringUnit": { "state": "translated", "value": "%d photos" } }
                } } },
                "mac": { "stringUnit": { "state": "translated", "value": "Photos" } }
            } } } } }
        }));
        let path: VariationPath = text.parse().unwrap();

        let request = TranslationRequest::for_entry(&catalog, "photos", "de", Some(&path)).unwrap();

        assert_eq!(request.source_text, expected);
        assert_eq!(request.translation_key, "photos");
    }
}
