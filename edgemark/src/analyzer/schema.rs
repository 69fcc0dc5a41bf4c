//! Schema.org JSON-LD document wrapper.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AnalyzerError;

/// A validated Schema.org JSON-LD document.
///
/// The wrapper guarantees the two fields every consumer keys on: a non-empty
/// string `@context` and a non-empty string `@type`. Construct through
/// [`JsonLd::new`] for untrusted input; deserialization does not re-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonLd(Value);

impl JsonLd {
    /// Wraps a JSON value after validating the document shape.
    pub fn new(value: Value) -> Result<Self, AnalyzerError> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Checks that `value` is an object carrying string `@context` and
    /// `@type` fields.
    pub fn validate(value: &Value) -> Result<(), AnalyzerError> {
        let object = value.as_object().ok_or_else(|| {
            AnalyzerError::InvalidSchema("document is not a JSON object".to_string())
        })?;

        for key in ["@context", "@type"] {
            match object.get(key) {
                Some(Value::String(s)) if !s.is_empty() => {}
                Some(_) => {
                    return Err(AnalyzerError::InvalidSchema(format!(
                        "{key} must be a non-empty string"
                    )))
                }
                None => return Err(AnalyzerError::InvalidSchema(format!("missing {key}"))),
            }
        }

        Ok(())
    }

    /// The `@context` value.
    #[must_use]
    pub fn context(&self) -> &str {
        self.0["@context"].as_str().unwrap_or_default()
    }

    /// The `@type` value.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.0["@type"].as_str().unwrap_or_default()
    }

    /// Borrows the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Serializes to the compact form embedded into pages.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        self.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document() {
        let document = JsonLd::new(json!({
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": "Hello",
        }))
        .unwrap();

        assert_eq!(document.context(), "https://schema.org");
        assert_eq!(document.type_name(), "Article");
    }

    #[test]
    fn test_missing_context_rejected() {
        let err = JsonLd::new(json!({"@type": "Article"})).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidSchema(_)));
        assert!(err.to_string().contains("@context"));
    }

    #[test]
    fn test_missing_type_rejected() {
        let err = JsonLd::new(json!({"@context": "https://schema.org"})).unwrap_err();
        assert!(err.to_string().contains("@type"));
    }

    #[test]
    fn test_non_string_fields_rejected() {
        let err = JsonLd::new(json!({"@context": 42, "@type": "Article"})).unwrap_err();
        assert!(err.to_string().contains("@context"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(JsonLd::new(json!("just a string")).is_err());
        assert!(JsonLd::new(json!(["@context", "@type"])).is_err());
    }

    #[test]
    fn test_compact_serialization() {
        let document = JsonLd::new(json!({
            "@context": "https://schema.org",
            "@type": "WebPage",
        }))
        .unwrap();

        let compact = document.to_compact_string();
        assert!(!compact.contains('\n'));
        assert!(compact.contains(r#""@type":"WebPage""#));
    }

    #[test]
    fn test_serde_roundtrip() {
        let document = JsonLd::new(json!({
            "@context": "https://schema.org",
            "@type": "WebPage",
        }))
        .unwrap();

        let encoded = serde_json::to_string(&document).unwrap();
        let decoded: JsonLd = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, document);
    }
}
