// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean?" suggestions.
//!
//! Deserialization failures become [`ConfigError`] diagnostics carrying the
//! offending TOML source span when it can be located, and semantic range
//! checks from [`crate::validation`] share the same error type so the binary
//! renders both through one path.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(lore::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key by Jaro-Winkler similarity, if any.
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(lore::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value is not one of the accepted variants
    /// (for example `retrieval.strategy = "fuzzy"`).
    #[error("unknown value `{value}` for key `{key}`")]
    #[diagnostic(
        code(lore::config::unknown_variant),
        help("{}", format_unknown_key_help(suggestion.as_deref(), expected))
    )]
    UnknownVariant {
        key: String,
        value: String,
        suggestion: Option<String>,
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(lore::config::missing_key),
        help("add `{key} = <value>` to your lore.toml")
    )]
    MissingKey { key: String },

    /// A numeric value lies outside its accepted range.
    #[error("`{key}` is out of range: {message}")]
    #[diagnostic(code(lore::config::out_of_range))]
    OutOfRange { key: String, message: String },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(lore::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(lore::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid values: {valid_keys}"),
        None => format!("valid values: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A figment error may chain several failures; every one is reported.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let dotted_path = error
            .path
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".");

        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let (span, src) = find_source_span(&error, field, toml_sources);

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid_keys),
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::UnknownVariant(value, expected) => {
                let variants: Vec<&str> = expected.to_vec();
                ConfigError::UnknownVariant {
                    key: dotted_path,
                    value: value.clone(),
                    suggestion: suggest_key(value, &variants),
                    expected: variants.join(", "),
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => {
                let field = error.path.last().cloned().unwrap_or_default();
                let section: Vec<String> = error
                    .path
                    .iter()
                    .take(error.path.len().saturating_sub(1))
                    .cloned()
                    .collect();
                let (span, src) =
                    find_source_span_in_section(&error, &section, &field, toml_sources);

                ConfigError::InvalidType {
                    key: dotted_path,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
    find_source_span_in_section(error, &section, field, toml_sources)
}

fn find_source_span_in_section(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline strings carry no file metadata; fall back to the only source.
    let source = match source_path {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };

    if let Some((path, content)) = source
        && let Some(offset) = find_key_offset(content, section, field)
    {
        let span = SourceSpan::new(offset.into(), field.len());
        return (Some(span), Some(NamedSource::new(path, content.clone())));
    }

    (None, None)
}

/// Find the byte offset of `field` inside the `[path[0]]` table of a TOML
/// document. Top-level fields are searched from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
    };

    let mut byte_offset = 0;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        // Stop at the next table header.
        if !path.is_empty() && trimmed.starts_with('[') && byte_offset > 0 {
            return None;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t'))
        {
            let field_start_in_line = line.len() - trimmed.len();
            return Some(search_start + byte_offset + field_start_in_line);
        }
        byte_offset += line.len();
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
///
/// Returns the best match above the similarity threshold, or `None`.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
