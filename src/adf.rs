//! Plain-text extraction for Atlassian Document Format (ADF) rich text.
//!
//! Jira returns descriptions and rich custom fields as a tree of typed nodes
//! rather than flat markup. This module models that tree as a closed sum type
//! and provides the two read operations the story panel needs:
//!
//! - [`RichText::to_plain_text`]: flatten a field value to a single string.
//! - [`extract_section`]: pull the text under a named heading, up to the next
//!   heading.
//!
//! Field values arrive as arbitrary JSON. Anything that is not recognisably a
//! node degrades to a string instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node in an ADF document tree.
///
/// `Text` nodes never carry children. Headings are kept apart from the other
/// block kinds because section extraction keys off them.
#[derive(Debug, Clone, PartialEq)]
pub enum AdfNode {
    Text {
        text: Option<String>,
        marks: Option<Value>,
    },
    Heading {
        attrs: Option<Value>,
        content: Vec<AdfNode>,
    },
    /// Any other node kind (`doc`, `paragraph`, `bulletList`, ...).
    Container {
        kind: String,
        attrs: Option<Value>,
        content: Vec<AdfNode>,
    },
}

impl AdfNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: Some(text.into()),
            marks: None,
        }
    }

    pub fn heading(content: Vec<AdfNode>) -> Self {
        Self::Heading {
            attrs: None,
            content,
        }
    }

    pub fn container(kind: impl Into<String>, content: Vec<AdfNode>) -> Self {
        Self::Container {
            kind: kind.into(),
            attrs: None,
            content,
        }
    }

    pub fn paragraph(content: Vec<AdfNode>) -> Self {
        Self::container("paragraph", content)
    }

    pub fn doc(content: Vec<AdfNode>) -> Self {
        Self::container("doc", content)
    }

    /// The ADF `type` of this node.
    pub fn kind(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Heading { .. } => "heading",
            Self::Container { kind, .. } => kind,
        }
    }

    /// Direct children; always empty for text runs.
    pub fn children(&self) -> &[AdfNode] {
        match self {
            Self::Text { .. } => &[],
            Self::Heading { content, .. } | Self::Container { content, .. } => content,
        }
    }

    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::container("", Vec::new());
        };

        let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default();
        let attrs = obj.get("attrs").cloned();
        let content = obj
            .get("content")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default();

        match kind {
            "text" => Self::Text {
                text: obj.get("text").and_then(Value::as_str).map(str::to_owned),
                marks: obj.get("marks").cloned(),
            },
            "heading" => Self::Heading { attrs, content },
            _ => Self::Container {
                kind: kind.to_owned(),
                attrs,
                content,
            },
        }
    }

    fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::String(self.kind().to_owned()));

        match self {
            Self::Text { text, marks } => {
                if let Some(text) = text {
                    obj.insert("text".into(), Value::String(text.clone()));
                }
                if let Some(marks) = marks {
                    obj.insert("marks".into(), marks.clone());
                }
            }
            Self::Heading { attrs, content } | Self::Container { attrs, content, .. } => {
                if let Some(attrs) = attrs {
                    obj.insert("attrs".into(), attrs.clone());
                }
                obj.insert(
                    "content".into(),
                    Value::Array(content.iter().map(Self::to_value).collect()),
                );
            }
        }

        Value::Object(obj)
    }
}

/// A rich-text field value as Jira hands it back.
///
/// Serializes to and from plain JSON. Node trees come back normalized:
/// `type`, `text`, `marks`, `attrs` and `content` survive, other keys such as
/// the document `version` are dropped, and a child that is not an object
/// becomes an empty node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RichText {
    /// `null`, absent, or a falsy scalar.
    #[default]
    Empty,
    Plain(String),
    Node(AdfNode),
    List(Vec<RichText>),
    /// Any other value that is not a node; rendered as its JSON text.
    Scalar(Value),
}

impl RichText {
    /// Whether the value would render as nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Plain(s) => s.is_empty(),
            Self::Node(_) | Self::List(_) | Self::Scalar(_) => false,
        }
    }

    /// Flatten the value to plain text.
    ///
    /// Only a node that has children is trimmed; bare strings and scalars are
    /// returned as-is.
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Plain(s) => s.clone(),
            Self::List(items) => items
                .iter()
                .map(Self::to_plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Node(node) if node.children().is_empty() => flatten(node),
            Self::Node(node) => flatten(node).trim().to_owned(),
            Self::Scalar(value) => value.to_string(),
        }
    }
}

impl From<Value> for RichText {
    fn from(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::Empty,
            Value::Number(ref n) if n.as_f64() == Some(0.0) => Self::Empty,
            Value::String(s) => Self::Plain(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(ref obj)
                if obj.get("type").is_some_and(Value::is_string)
                    || obj.get("content").is_some_and(Value::is_array) =>
            {
                Self::Node(AdfNode::from_value(&value))
            }
            other => Self::Scalar(other),
        }
    }
}

impl From<RichText> for Value {
    fn from(text: RichText) -> Self {
        match text {
            RichText::Empty => Value::Null,
            RichText::Plain(s) => Value::String(s),
            RichText::Node(node) => node.to_value(),
            RichText::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            RichText::Scalar(value) => value,
        }
    }
}

impl From<AdfNode> for RichText {
    fn from(node: AdfNode) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for RichText {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_owned())
    }
}

/// Concatenate every text run under `node`, with no separator between
/// siblings.
pub fn flatten(node: &AdfNode) -> String {
    match node {
        AdfNode::Text { text, .. } => text.clone().unwrap_or_default(),
        AdfNode::Heading { content, .. } | AdfNode::Container { content, .. } => {
            content.iter().map(flatten).collect()
        }
    }
}

/// Extract the plain text of the section introduced by a heading whose text
/// contains `heading_title` (case-insensitive).
///
/// Only the root's direct children are scanned. The section runs until the
/// next heading of any title; fragments are trimmed, empty ones dropped, and
/// the rest joined with a blank line.
pub fn extract_section(root: &RichText, heading_title: &str) -> String {
    let RichText::Node(root) = root else {
        return String::new();
    };

    let target = heading_title.to_lowercase();
    let mut collecting = false;
    let mut fragments = Vec::new();

    for node in root.children() {
        if let AdfNode::Heading { .. } = node {
            if collecting {
                break;
            }
            let title = flatten(node).trim().to_lowercase();
            if title.contains(&target) {
                collecting = true;
                continue;
            }
        }
        if collecting {
            fragments.push(flatten(node));
        }
    }

    fragments
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_document() {
        let value = json!({
            "type": "doc",
            "version": 1,
            "content": [
                { "type": "heading", "attrs": { "level": 2 }, "content": [{ "type": "text", "text": "Goal" }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "Ship it" }] }
            ]
        });

        let RichText::Node(root) = RichText::from(value) else {
            panic!("expected a node");
        };
        assert_eq!(root.kind(), "doc");
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].kind(), "heading");
        assert_eq!(flatten(&root.children()[1]), "Ship it");
    }

    #[test]
    fn text_node_ignores_stray_content() {
        let node = AdfNode::from_value(&json!({
            "type": "text",
            "text": "run",
            "content": [{ "type": "text", "text": "nested" }]
        }));
        assert!(node.children().is_empty());
        assert_eq!(flatten(&node), "run");
    }

    #[test]
    fn non_object_child_degrades_to_empty() {
        let root = RichText::from(json!({ "type": "doc", "content": [42, "x", null] }));
        assert_eq!(root.to_plain_text(), "");
    }

    #[test]
    fn serializes_back_to_adf_shape() {
        let value = json!({
            "type": "paragraph",
            "content": [{ "type": "text", "text": "bold", "marks": [{ "type": "strong" }] }]
        });
        let text = RichText::from(value.clone());
        assert_eq!(serde_json::to_value(&text).unwrap(), value);
    }

    #[test]
    fn serialization_normalizes_unknown_keys_and_children() {
        let text = RichText::from(json!({
            "type": "doc",
            "version": 1,
            "content": [42, { "type": "text", "text": "kept", "localId": "x" }]
        }));
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({
                "type": "doc",
                "content": [
                    { "type": "", "content": [] },
                    { "type": "text", "text": "kept" }
                ]
            })
        );
    }

    #[test]
    fn falsy_scalars_are_empty() {
        assert!(RichText::from(json!(false)).is_empty());
        assert!(RichText::from(json!(0)).is_empty());
        assert!(RichText::from(json!("")).is_empty());
        assert!(!RichText::from(json!(7)).is_empty());
    }
}
