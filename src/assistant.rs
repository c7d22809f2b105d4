//! Search assistant — free text → schema-constrained extraction → criteria.
//!
//! DESIGN
//! ======
//! Two halves with a validated struct between them:
//!
//! 1. `extract` sends the user's query to the model with a fixed response
//!    schema and parses the reply at the boundary into [`AiExtraction`].
//!    The payload is untrusted: anything that is not an object of the
//!    expected field types is rejected with an [`AssistantError`].
//! 2. `to_criteria` maps a valid extraction onto a [`CriteriaPatch`] with
//!    merge semantics. Absent fields leave the criteria alone.
//!
//! A failed extraction never produces a patch, so criteria are either fully
//! updated from one reply or not touched at all.

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::error::ErrorCode;
use crate::filter::{BedroomThreshold, CriteriaPatch, FilterCriteria, PriceRange, PropertyTypeFilter};
use crate::listing::PropertyType;
use crate::llm::{LlmError, LlmJson};

pub const DEFAULT_MAX_QUERY_CHARS: usize = 500;

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Longest accepted chat query, in characters.
    pub max_query_chars: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self { max_query_chars: DEFAULT_MAX_QUERY_CHARS }
    }
}

impl AssistantConfig {
    /// Reads `ASSISTANT_MAX_QUERY_CHARS`; unset or unparseable values use
    /// the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_query_chars = lookup("ASSISTANT_MAX_QUERY_CHARS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_QUERY_CHARS);
        Self { max_query_chars }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant not configured")]
    NotConfigured,
    #[error("query longer than {max} characters")]
    QueryTooLong { max: usize },
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("model returned an empty reply")]
    EmptyResponse,
    #[error("model reply is not JSON: {0}")]
    InvalidJson(String),
    #[error("model reply is not a JSON object")]
    NotAnObject,
    #[error("field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ErrorCode for AssistantError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_ASSISTANT_NOT_CONFIGURED",
            Self::QueryTooLong { .. } => "E_QUERY_TOO_LONG",
            Self::Llm(_) => "E_LLM_ERROR",
            Self::EmptyResponse => "E_EMPTY_RESPONSE",
            Self::InvalidJson(_) => "E_INVALID_JSON",
            Self::NotAnObject => "E_NOT_AN_OBJECT",
            Self::InvalidField { .. } => "E_INVALID_FIELD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm(e) if e.retryable()) || matches!(self, Self::EmptyResponse)
    }
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Validated model output. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiExtraction {
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<u64>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

/// Response schema sent with every extraction request.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "location": {
                "type": "STRING",
                "description": "The city and/or state mentioned. e.g. 'San Francisco', 'CA'"
            },
            "propertyType": {
                "type": "STRING",
                "description": "The type of property.",
                "enum": PropertyType::ALL.map(PropertyType::label)
            },
            "bedrooms": {
                "type": "INTEGER",
                "description": "The minimum number of bedrooms."
            },
            "minPrice": {
                "type": "INTEGER",
                "description": "The minimum price, if mentioned."
            },
            "maxPrice": {
                "type": "INTEGER",
                "description": "The maximum price, if mentioned. For queries like 'under $500k', this would be 500000."
            }
        }
    })
}

#[must_use]
pub fn build_prompt(query: &str) -> String {
    format!("Extract real estate search filters from this user query: \"{query}\". Respond with only the JSON object.")
}

/// Ask the model to turn `query` into an [`AiExtraction`].
///
/// # Errors
///
/// Returns an [`AssistantError`] for an over-long query, a failed call, or
/// a reply that is empty, not JSON, or of the wrong shape.
pub async fn extract(llm: &dyn LlmJson, query: &str, config: AssistantConfig) -> Result<AiExtraction, AssistantError> {
    if query.chars().count() > config.max_query_chars {
        return Err(AssistantError::QueryTooLong { max: config.max_query_chars });
    }

    info!(query_len = query.len(), "assistant: extraction requested");
    let response = llm
        .generate_json(&build_prompt(query), &response_schema())
        .await?;
    info!(
        model = %response.model,
        finish_reason = %response.finish_reason,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "assistant: LLM response"
    );

    let extraction = parse_extraction(&response.text)?;
    debug!(?extraction, "assistant: extraction parsed");
    Ok(extraction)
}

/// Validate a raw model reply.
///
/// # Errors
///
/// See [`AssistantError`]; `null` fields count as absent and unknown fields
/// are ignored.
pub fn parse_extraction(text: &str) -> Result<AiExtraction, AssistantError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(AssistantError::EmptyResponse);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| AssistantError::InvalidJson(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(AssistantError::NotAnObject);
    };

    Ok(AiExtraction {
        location: string_field(&map, "location")?,
        property_type: string_field(&map, "propertyType")?
            .map(|raw| {
                PropertyType::from_label(&raw).ok_or_else(|| AssistantError::InvalidField {
                    field: "propertyType",
                    reason: format!("unknown property type '{raw}'"),
                })
            })
            .transpose()?,
        bedrooms: count_field(&map, "bedrooms")?,
        min_price: count_field(&map, "minPrice")?,
        max_price: count_field(&map, "maxPrice")?,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn present<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    map.get(field).filter(|v| !v.is_null())
}

fn string_field(map: &Map<String, Value>, field: &'static str) -> Result<Option<String>, AssistantError> {
    match present(map, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(AssistantError::InvalidField { field, reason: format!("expected string, got {other}") }),
    }
}

/// Non-negative whole number. Integral floats (`3.0`) are accepted.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_field(map: &Map<String, Value>, field: &'static str) -> Result<Option<u64>, AssistantError> {
    let Some(value) = present(map, field) else {
        return Ok(None);
    };
    let invalid = |reason: String| AssistantError::InvalidField { field, reason };
    if let Some(n) = value.as_u64() {
        return Ok(Some(n));
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= 9.0e15 => Ok(Some(f as u64)),
        Some(f) => Err(invalid(format!("expected non-negative integer, got {f}"))),
        None => Err(invalid(format!("expected number, got {value}"))),
    }
}

// =============================================================================
// ADAPTER
// =============================================================================

/// Map an extraction onto a criteria patch.
///
/// - location: non-blank text replaces the location query.
/// - propertyType: becomes the matching type filter.
/// - bedrooms: 5 or more → `5+`; 1..=4 → that threshold; 0 → untouched.
/// - price: with a ceiling, the range becomes `[minPrice or 0, maxPrice]`;
///   with only a floor, `[minPrice, current ceiling]`. Zero bounds count as
///   absent.
#[must_use]
pub fn to_criteria(extraction: &AiExtraction, current: &FilterCriteria) -> CriteriaPatch {
    let mut patch = CriteriaPatch::default();

    if let Some(location) = extraction
        .location
        .as_deref()
        .filter(|l| !l.trim().is_empty())
    {
        patch.location = Some(location.to_string());
    }

    if let Some(property_type) = extraction.property_type {
        patch.property_type = Some(PropertyTypeFilter::Only(property_type));
    }

    match extraction.bedrooms {
        Some(n) if n >= u64::from(BedroomThreshold::TOP) => {
            patch.bedrooms = Some(BedroomThreshold::AtLeast(BedroomThreshold::TOP));
        }
        Some(n) if n > 0 => {
            // n < TOP here, so the narrowing is lossless.
            patch.bedrooms = u32::try_from(n).ok().map(BedroomThreshold::AtLeast);
        }
        _ => {}
    }

    let min_price = extraction.min_price.filter(|p| *p > 0);
    match (min_price, extraction.max_price.filter(|p| *p > 0)) {
        (min, Some(max)) => patch.price_range = Some(PriceRange::new(min.unwrap_or(0), max)),
        (Some(min), None) => patch.price_range = Some(PriceRange::new(min, current.price_range.max)),
        (None, None) => {}
    }

    patch
}

#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;
