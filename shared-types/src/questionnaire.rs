use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum QuestionKind {
    Text,
    Number,
    Select,
    MultipleChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Label for an option value, if the value is one of this question's options
    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireSection {
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireDefinition {
    pub sections: Vec<QuestionnaireSection>,
}

/// An answer: one value for text/number/select, several for multiple choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Single(value) => value.trim().is_empty(),
            Answer::Multiple(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }
}

/// Answers keyed by question id
pub type Answers = BTreeMap<String, Answer>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_deserializes_single_or_multiple() {
        let answers: Answers = serde_json::from_value(serde_json::json!({
            "roomType": "huddle",
            "connectivity": ["hdmi", "wireless"]
        }))
        .unwrap();

        assert_eq!(answers["roomType"], Answer::Single("huddle".to_string()));
        assert_eq!(
            answers["connectivity"],
            Answer::Multiple(vec!["hdmi".to_string(), "wireless".to_string()])
        );
    }

    #[test]
    fn test_answer_emptiness() {
        assert!(Answer::Single("   ".to_string()).is_empty());
        assert!(Answer::Multiple(vec![]).is_empty());
        assert!(!Answer::Multiple(vec!["hdmi".to_string()]).is_empty());
    }

    #[test]
    fn test_question_kind_wire_names() {
        assert_eq!(
            serde_json::to_value(QuestionKind::MultipleChoice).unwrap(),
            "multiple-choice"
        );
    }
}
