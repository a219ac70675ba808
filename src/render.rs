//! Plain-text rendering of stories for terminal panels.

use crate::models::Story;

const NO_DESCRIPTION: &str = "No description provided";

/// Render the story details panel.
///
/// Example output:
/// ```text
/// Story Details
/// PROJ-12
///
/// Summary
///   Password reset
///
/// Description
///   Users can reset their password by email.
///
/// Acceptance Criteria
///   Given a registered user
///   When they request a reset
///   Then an email is sent
/// ```
///
/// The acceptance criteria section is omitted when the story has none.
pub fn render_story_details(story: &Story) -> String {
    let mut output = String::new();
    output.push_str("Story Details\n");
    output.push_str(&story.key);
    output.push('\n');

    push_section(&mut output, "Summary", &story.fields.summary);

    let description = story.description_text();
    let description = if description.is_empty() {
        NO_DESCRIPTION
    } else {
        description.as_str()
    };
    push_section(&mut output, "Description", description);

    if let Some(criteria) = story.acceptance_criteria_text() {
        push_section(&mut output, "Acceptance Criteria", &criteria);
    }

    output
}

/// One line per story: key padded to the longest key, then the summary.
pub fn render_story_list(stories: &[Story]) -> String {
    let width = stories.iter().map(|s| s.key.len()).max().unwrap_or(0);
    let mut output = String::new();
    for story in stories {
        output.push_str(&format!(
            "{:<width$}  {}\n",
            story.key,
            story.fields.summary,
            width = width
        ));
    }
    output
}

fn push_section(output: &mut String, title: &str, body: &str) {
    output.push('\n');
    output.push_str(title);
    output.push('\n');
    for line in body.lines() {
        if line.is_empty() {
            output.push('\n');
        } else {
            output.push_str("  ");
            output.push_str(line);
            output.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::{AdfNode, RichText};
    use crate::models::StoryFields;

    fn make_story(description: RichText, acceptance_criteria: Option<RichText>) -> Story {
        Story {
            id: "10001".to_string(),
            key: "PROJ-12".to_string(),
            fields: StoryFields {
                summary: "Password reset".to_string(),
                description,
                acceptance_criteria,
            },
        }
    }

    fn text_para(text: &str) -> AdfNode {
        AdfNode::paragraph(vec![AdfNode::text(text)])
    }

    #[test]
    fn test_missing_description() {
        let output = render_story_details(&make_story(RichText::Empty, None));
        assert_eq!(
            output,
            "Story Details\nPROJ-12\n\nSummary\n  Password reset\n\nDescription\n  No description provided\n"
        );
    }

    #[test]
    fn test_criteria_from_description_section() {
        let description = AdfNode::doc(vec![
            text_para("Users can reset their password."),
            AdfNode::heading(vec![AdfNode::text("Acceptance Criteria")]),
            text_para("Given a user"),
            text_para("Then an email is sent"),
        ]);
        let output = render_story_details(&make_story(description.into(), None));
        assert!(output.ends_with(
            "Acceptance Criteria\n  Given a user\n\n  Then an email is sent\n"
        ));
    }

    #[test]
    fn test_custom_field_wins_over_section() {
        let description = AdfNode::doc(vec![
            AdfNode::heading(vec![AdfNode::text("Acceptance Criteria")]),
            text_para("from description"),
        ]);
        let story = make_story(description.into(), Some(RichText::from("from field")));
        let output = render_story_details(&story);
        assert!(output.ends_with("Acceptance Criteria\n  from field\n"));
    }

    #[test]
    fn test_story_list_alignment() {
        let mut first = make_story(RichText::Empty, None);
        first.key = "A-1".to_string();
        first.fields.summary = "Short key".to_string();
        let second = make_story(RichText::Empty, None);

        let output = render_story_list(&[first, second]);
        assert_eq!(output, "A-1      Short key\nPROJ-12  Password reset\n");
    }
}
