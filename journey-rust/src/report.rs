use crate::{AnalysisResult, AnswerMap, Keyword, Portrait, QuestionSequence, Theme};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub question_id: String,
    pub category: String,
    pub prompt: String,
    pub answer: String,
}

/// Everything the exported results card shows, ready to be rasterised by
/// the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    pub theme_id: Option<String>,
    pub theme_name: Option<String>,
    pub letter_title: String,
    pub paragraphs: Vec<String>,
    pub keywords: Vec<Keyword>,
    pub portrait: Portrait,
    /// Answered questions, in sequence order.
    pub entries: Vec<ReportEntry>,
}

impl ResultsReport {
    #[must_use]
    pub fn build(
        questions: &QuestionSequence,
        answers: &AnswerMap,
        analysis: &AnalysisResult,
        theme: Option<&Theme>,
    ) -> Self {
        let entries = questions
            .iter()
            .filter_map(|question| {
                answers.get(&question.id).map(|answer| ReportEntry {
                    question_id: question.id.clone(),
                    category: question.category.clone(),
                    prompt: question.prompt_primary.clone(),
                    answer: answer.to_string(),
                })
            })
            .collect();

        Self {
            theme_id: theme.map(|theme| theme.id.clone()),
            theme_name: theme.map(|theme| theme.name.clone()),
            letter_title: analysis.letter_title.clone(),
            paragraphs: analysis.paragraphs(),
            keywords: analysis.keywords.clone(),
            portrait: analysis.portrait.clone(),
            entries,
        }
    }

    /// Export file name for a report taken at `millis` since the Unix epoch.
    #[must_use]
    pub fn file_name(millis: u128) -> String {
        format!("2025_Memory_Capsule_{millis}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_follow_sequence_order_and_skip_unanswered() {
        let questions = QuestionSequence::year_in_review();
        let answers: AnswerMap = [("q3", "rain"), ("q1", "a mug")].into_iter().collect();
        let analysis = AnalysisResult::offline("Neutral");

        let report = ResultsReport::build(&questions, &answers, &analysis, Theme::find("maple").as_ref());

        let ids: Vec<_> = report.entries.iter().map(|e| e.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q3"]);
        assert_eq!(report.theme_id.as_deref(), Some("maple"));
        assert_eq!(report.paragraphs, analysis.paragraphs());
    }

    #[test]
    fn file_name_embeds_timestamp() {
        assert_eq!(
            ResultsReport::file_name(1_767_225_600_000),
            "2025_Memory_Capsule_1767225600000.png"
        );
    }
}
