//! Wire types for the Jira REST API v3 responses we consume.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::adf::RichText;
use crate::models::{Story, StoryFields};

/// An issue as returned by `/issue/{key}` or inside a search response.
///
/// `fields` stays untyped because the acceptance-criteria field id is only
/// known at runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawIssue {
    /// Project the issue onto a [`Story`], reading acceptance criteria from
    /// `acceptance_field`.
    pub fn into_story(mut self, acceptance_field: &str) -> Story {
        let summary = match self.fields.remove("summary") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        let description = self
            .fields
            .remove("description")
            .map(RichText::from)
            .unwrap_or_default();
        let acceptance_criteria = self
            .fields
            .remove(acceptance_field)
            .map(RichText::from)
            .filter(|text| *text != RichText::Empty);

        Story {
            id: self.id,
            key: self.key,
            fields: StoryFields {
                summary,
                description,
                acceptance_criteria,
            },
        }
    }
}

/// Response of `/search/jql`. `issues` is optional so a missing list can be
/// reported instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Option<Vec<RawIssue>>,
}

/// Response of `/myself`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Error body Jira sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Best human-readable message in an error response body: `errorMessages`,
/// then `message`, then the raw body.
pub(crate) fn upstream_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error_messages.is_empty() {
            return Some(parsed.error_messages.join(", "));
        }
        if let Some(message) = parsed.message.filter(|m| !m.trim().is_empty()) {
            return Some(message);
        }
    }

    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(fields: Value) -> RawIssue {
        serde_json::from_value(json!({ "id": "10001", "key": "PROJ-1", "fields": fields }))
            .unwrap()
    }

    #[test]
    fn maps_issue_fields_onto_story() {
        let story = issue(json!({
            "summary": "Login page",
            "description": { "type": "doc", "content": [] },
            "customfield_10001": "Given a user",
            "labels": ["ignored"]
        }))
        .into_story("customfield_10001");

        assert_eq!(story.id, "10001");
        assert_eq!(story.key, "PROJ-1");
        assert_eq!(story.fields.summary, "Login page");
        assert_eq!(
            story.fields.acceptance_criteria,
            Some(RichText::Plain("Given a user".into()))
        );
    }

    #[test]
    fn null_acceptance_field_is_absent() {
        let story = issue(json!({ "summary": "S", "customfield_10001": null }))
            .into_story("customfield_10001");
        assert!(story.fields.acceptance_criteria.is_none());
        assert_eq!(story.fields.description, RichText::Empty);
    }

    #[test]
    fn reads_the_configured_acceptance_field() {
        let story = issue(json!({ "summary": "S", "customfield_20000": "AC" }))
            .into_story("customfield_20000");
        assert_eq!(
            story.fields.acceptance_criteria,
            Some(RichText::Plain("AC".into()))
        );
    }

    #[test]
    fn upstream_message_prefers_error_messages() {
        let body = r#"{"errorMessages":["Issue does not exist","No permission"],"errors":{}}"#;
        assert_eq!(
            upstream_message(body).as_deref(),
            Some("Issue does not exist, No permission")
        );
    }

    #[test]
    fn upstream_message_falls_back_to_message_then_body() {
        assert_eq!(
            upstream_message(r#"{"message":"Client must be authenticated"}"#).as_deref(),
            Some("Client must be authenticated")
        );
        assert_eq!(
            upstream_message(r#"{"errorMessages":[],"errors":{"jql":"bad"}}"#).as_deref(),
            Some(r#"{"errorMessages":[],"errors":{"jql":"bad"}}"#)
        );
        assert_eq!(upstream_message("Unauthorized").as_deref(), Some("Unauthorized"));
        assert_eq!(upstream_message("  "), None);
    }
}
