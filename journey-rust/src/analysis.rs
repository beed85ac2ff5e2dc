use crate::AnalysisError;
use serde::{Deserialize, Serialize};

/// A word that sums up part of the year, with a short reading of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portrait {
    pub mental_core: String,
    pub action_pattern: String,
    pub emotional_tone: String,
}

/// The synthesized year in review. Field names on the wire are exactly the
/// keys the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub keywords: Vec<Keyword>,
    pub portrait: Portrait,
    pub letter_title: String,
    pub letter_body: String,
}

impl AnalysisResult {
    /// Parses a model response, tolerating a surrounding markdown code fence.
    pub fn parse(text: &str) -> Result<Self, AnalysisError> {
        let result: Self = serde_json::from_str(strip_code_fences(text))?;
        result.validate()?;
        Ok(result)
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if self.keywords.is_empty() {
            return Err(AnalysisError::Shape("keywords must not be empty"));
        }
        if self.letter_title.trim().is_empty() {
            return Err(AnalysisError::Shape("letterTitle must not be empty"));
        }
        if letter_paragraphs(&self.letter_body).is_empty() {
            return Err(AnalysisError::Shape("letterBody has no paragraphs"));
        }
        Ok(())
    }

    /// The letter body as display paragraphs.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<String> {
        letter_paragraphs(&self.letter_body)
    }

    /// Placeholder review used whenever the model cannot be reached or
    /// answers with something unusable. Depends only on `theme_context`.
    #[must_use]
    pub fn offline(theme_context: &str) -> Self {
        let lowered = theme_context.to_lowercase();
        let warm = lowered.contains("warm") || lowered.contains("nature");

        let pool: &[(&str, &str)] = if warm {
            &[
                ("炽热", "像你选定的底色一样，你的这一年在燃烧中完成了某种蜕变。"),
                ("丰盈", "无论得到还是失去，生命体验在这一年变得前所未有的饱满。"),
                ("回响", "那些坚持过的事，此刻正以另一种方式回到你身边。"),
            ]
        } else {
            &[
                ("沉淀", "像一颗石子落入深海，你在喧嚣里找到了属于自己的重力。"),
                ("如常", "在无常的世界里守住如常的节奏，本身就是一种勇气。"),
                ("自洽", "不再向外寻求认可，而是向内寻找逻辑，你完成了一次闭环。"),
            ]
        };

        Self {
            keywords: pool
                .iter()
                .map(|(word, explanation)| Keyword {
                    word: (*word).to_string(),
                    explanation: (*explanation).to_string(),
                })
                .collect(),
            portrait: Portrait {
                mental_core: "你正在经历一段向内探索的时期，比起外界的喧嚣，你更在意内心的秩序与安宁。"
                    .to_string(),
                action_pattern: "看似按部就班，实则在每一个微小的选择里都埋下了伏笔。".to_string(),
                emotional_tone: format!(
                    "正如你选择的底色，这一年你的基调是{}的。",
                    if warm { "温暖而坚定" } else { "冷静而深邃" }
                ),
            },
            letter_title: "致 2025 的漫步者".to_string(),
            letter_body: OFFLINE_LETTER.to_string(),
        }
    }
}

const OFFLINE_LETTER: &str = "亲爱的，见信如晤。

此刻记忆库的信号有些微弱，我没能把你写下的每一个字都读完，但从这些只言片语里，依然能感受到你这一年心跳的频率。

这一年或许并不波澜壮阔，却一定是在细节处见真章的一年。一个发呆的午后，一次勇敢的拒绝，一首循环播放的老歌，你在这些不起眼的瞬间里悄悄完成了自我的重塑。

最深刻的答案往往不需要谁来替你生成，它就藏在你敲下每一个字时的犹豫与坚定里。

在 2026 的入口处，请带上这份勇气。";

/// Removes a surrounding markdown code fence (```` ``` ```` or
/// ```` ```json ````) and trims the result.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            // drop the info string on the opening fence line
            Some(newline) if !rest[..newline].contains('{') => &rest[newline + 1..],
            _ => rest.trim_start_matches("json"),
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Splits a letter body into display paragraphs: one per line, trimmed,
/// with blank lines dropped.
#[must_use]
pub fn letter_paragraphs(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
