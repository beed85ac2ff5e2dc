use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-text answers keyed by question id.
///
/// Lookup is by id only. The map is ordered so that the payload sent to the
/// model is stable for the same answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, String>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the answer for `question_id`, replacing any earlier answer.
    /// Returns the replaced answer.
    pub fn record(
        &mut self,
        question_id: impl Into<String>,
        answer: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(question_id.into(), answer.into())
    }

    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, answer)| (id.as_str(), answer.as_str()))
    }

    /// The JSON object sent to the model, e.g. `{"q1":"a mug"}`.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, answer)| (id.into(), answer.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_overwrites_per_id() {
        let mut answers = AnswerMap::new();
        assert_eq!(answers.record("q1", "a mug"), None);
        assert_eq!(answers.record("q1", "a lamp"), Some("a mug".to_string()));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get("q1"), Some("a lamp"));
    }

    #[test]
    fn serializes_as_a_flat_object() {
        let answers: AnswerMap = [("q2", "窗边"), ("q1", "a mug")].into_iter().collect();
        assert_eq!(answers.to_json(), r#"{"q1":"a mug","q2":"窗边"}"#);
    }

    #[test]
    fn clear_empties_the_map() {
        let mut answers: AnswerMap = [("q1", "x")].into_iter().collect();
        answers.clear();
        assert!(answers.is_empty());
        assert_eq!(answers.get("q1"), None);
    }
}
