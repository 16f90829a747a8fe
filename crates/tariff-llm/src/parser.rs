//! Parse LLM output into a ruling record

use crate::error::LlmError;
use serde_json::Value;
use tariff_domain::Record;
use tracing::warn;

/// Parse an LLM reply into a [`Record`] for `ruling_id`
///
/// Replies are handled defensively: markdown fences are stripped and, when
/// the model wraps the object in prose, the outermost `{...}` is taken. The
/// record always carries the requested identifier, whatever the model said.
pub fn parse_llm_response(response: &str, ruling_id: &str) -> Result<Record, LlmError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str).map_err(|e| {
        LlmError::InvalidResponse(format!("JSON parse error: {}. Head: {}", e, head(json_str)))
    })?;

    let obj = json
        .as_object()
        .ok_or_else(|| LlmError::InvalidResponse("Expected JSON object".to_string()))?;

    let mut record = Record::from_json_object(obj);
    if !record.id.is_empty() && record.id != ruling_id {
        warn!(
            "LLM reported ruling id '{}' for '{}'; keeping the requested id",
            record.id, ruling_id
        );
    }
    record.id = ruling_id.to_string();
    Ok(record)
}

/// Extract the JSON object text from a reply, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, LlmError> {
    let mut content = response.trim();
    if content.is_empty() {
        return Err(LlmError::InvalidResponse("LLM returned empty content".to_string()));
    }

    if let Some(rest) = content.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(lang) if lang.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        content = rest.trim();
        content = content.strip_suffix("```").unwrap_or(content).trim();
    }

    if content.starts_with('{') {
        return Ok(content);
    }

    // Wrapped in prose: take the outermost braces
    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&content[start..=end]),
        _ => Err(LlmError::InvalidResponse(format!(
            "LLM content is not JSON. Head: {}",
            head(content)
        ))),
    }
}

fn head(s: &str) -> String {
    s.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{
            "ruling_id": "N340865",
            "hts_decision": "1902.19.2090",
            "duty_rate": "6.4 percent ad valorem",
            "submitter": null
        }"#;

        let record = parse_llm_response(response, "N340865").unwrap();
        assert_eq!(record.id, "N340865");
        assert_eq!(record.hts_decision.as_deref(), Some("1902.19.2090"));
        assert_eq!(record.duty_rate.as_deref(), Some("6.4 percent ad valorem"));
        assert_eq!(record.submitter, None);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"duty_rate\": \"free\"}\n```";
        let record = parse_llm_response(response, "N1").unwrap();
        assert_eq!(record.duty_rate.as_deref(), Some("free"));
    }

    #[test]
    fn test_parse_json_with_bare_fence() {
        let response = "```\n{\"duty_rate\": \"free\"}\n```";
        assert!(parse_llm_response(response, "N1").is_ok());

        let response = "```JSON {\"duty_rate\": \"free\"}```";
        assert!(parse_llm_response(response, "N1").is_ok());
    }

    #[test]
    fn test_parse_json_in_prose() {
        let response = "Here are the fields:\n{\"case_handler\": \"Kim Wachtel\"}\nLet me know!";
        let record = parse_llm_response(response, "N1").unwrap();
        assert_eq!(record.case_handler.as_deref(), Some("Kim Wachtel"));
    }

    #[test]
    fn test_requested_id_wins() {
        let record = parse_llm_response(r#"{"ruling_id": "N999999"}"#, "N340183").unwrap();
        assert_eq!(record.id, "N340183");
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(matches!(
            parse_llm_response("   ", "N1"),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_llm_response("This is not JSON", "N1").is_err());
        assert!(parse_llm_response("{not: valid}", "N1").is_err());
    }

    #[test]
    fn test_parse_array_is_unwrapped_to_its_object() {
        let record = parse_llm_response(r#"[{"duty_rate": "free"}]"#, "N1").unwrap();
        assert_eq!(record.duty_rate.as_deref(), Some("free"));
    }

    #[test]
    fn test_parse_two_objects_is_rejected() {
        let result = parse_llm_response(r#"First {"a": 1} then {"b": 2}"#, "N1");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }
}
