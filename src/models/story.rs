use serde::{Deserialize, Serialize};

use crate::adf::{self, RichText};

/// Heading that introduces the acceptance criteria inside a description.
pub const ACCEPTANCE_CRITERIA_HEADING: &str = "Acceptance Criteria";

/// A Jira issue of type Story, projected down to what the story panel shows.
///
/// Stories are read-only snapshots built from a tracker response. They are
/// never stored; each request fetches fresh ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    /// Human key, e.g. `PROJ-123`.
    pub key: String,
    pub fields: StoryFields,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: RichText,
    /// Contents of the acceptance-criteria custom field, when the tracker
    /// has one configured and populated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<RichText>,
}

impl Story {
    /// The description flattened to plain text.
    pub fn description_text(&self) -> String {
        self.fields.description.to_plain_text()
    }

    /// Acceptance criteria as plain text.
    ///
    /// The custom field wins when it holds anything; otherwise the
    /// "Acceptance Criteria" section of the description is used. Returns
    /// `None` when neither yields text.
    pub fn acceptance_criteria_text(&self) -> Option<String> {
        match &self.fields.acceptance_criteria {
            Some(field) if !field.is_empty() => Some(field.to_plain_text()),
            _ => {
                let section =
                    adf::extract_section(&self.fields.description, ACCEPTANCE_CRITERIA_HEADING);
                (!section.is_empty()).then_some(section)
            }
        }
    }
}
