use crate::JourneyError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shown in the answer box when a question carries no placeholder of its own.
pub const DEFAULT_PLACEHOLDER: &str = "别担心字数，哪怕只是一个名字，我也能读懂。";

/// A single reflective prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within a sequence. Answers are keyed by it.
    pub id: String,
    pub category: String,
    /// The prompt as it is typed out on the card.
    pub prompt_primary: String,
    /// A translation shown beneath the primary prompt.
    pub prompt_secondary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        prompt_primary: impl Into<String>,
        prompt_secondary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            prompt_primary: prompt_primary.into(),
            prompt_secondary: prompt_secondary.into(),
            placeholder: None,
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn placeholder_or_default(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER)
    }
}

/// The ordered, immutable list of prompts a journey walks through. Position
/// in the sequence is the progression index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSequence {
    questions: Vec<Question>,
}

impl QuestionSequence {
    pub fn new(questions: Vec<Question>) -> Result<Self, JourneyError> {
        if questions.is_empty() {
            return Err(JourneyError::EmptySequence);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(JourneyError::DuplicateQuestion(question.id.clone()));
            }
        }

        Ok(Self { questions })
    }

    /// The twenty built-in prompts, grouped into five categories.
    #[must_use]
    pub fn year_in_review() -> Self {
        let questions = YEAR_IN_REVIEW
            .iter()
            .map(|(id, category, primary, secondary, placeholder)| {
                Question::new(*id, *category, *primary, *secondary).with_placeholder(*placeholder)
            })
            .collect();
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    pub(crate) fn at(&self, index: usize) -> &Question {
        &self.questions[index.min(self.last_index())]
    }
}

impl Default for QuestionSequence {
    fn default() -> Self {
        Self::year_in_review()
    }
}

const LIFE: &str = "生活实录 (Life Records)";
const ACTION: &str = "行动痕迹 (Action Traces)";
const CONNECTION: &str = "人际连接 (Connections)";
const EMOTION: &str = "情绪碎片 (Emotional Fragments)";
const FAREWELL: &str = "告别与交棒 (Farewell)";

// (id, category, primary, secondary, placeholder)
const YEAR_IN_REVIEW: [(&str, &str, &str, &str, &str); 20] = [
    (
        "q1",
        LIFE,
        "年度私藏：2025 年，哪一件被你带回家的物件，最真切地抚平了你的生活？",
        "Which object you brought home this year most truly soothed your life?",
        "哪怕是一个普通的杯子，只要它曾温暖你...",
    ),
    (
        "q2",
        LIFE,
        "栖息之地：除了床和工位，这一年哪个角落承载了你最多的发呆或思考时刻？",
        "Besides your bed and desk, which corner held most of your daydreams this year?",
        "那个让你感到安全的角落是哪里？",
    ),
    (
        "q3",
        LIFE,
        "耳边回响：哪一段旋律响起时，能让你瞬间辨认出 2025 年的味道？",
        "Which melody instantly brings back the flavour of 2025?",
        "或许是一句歌词，或许是雨声...",
    ),
    (
        "q4",
        LIFE,
        "生命韵律：这一年，你的身体是在规律的节奏中自洽，还是在疲惫的缝隙里喘息？",
        "Did your body keep a steady rhythm this year, or catch its breath between bouts of fatigue?",
        "诚实地面对身体的感受，它会告诉你答案。",
    ),
    (
        "q5",
        LIFE,
        "视觉切片：翻开手机相册，哪张照片或截图是你 2025 年最不舍得删去的记忆锚点？",
        "Which photo or screenshot in your album would you least want to delete?",
        "描述那个画面，不用在意构图，只在意回忆。",
    ),
    (
        "q6",
        ACTION,
        "微光技能：今年你点亮了哪项以前从未尝试过的小技能，让生活多了一点底气？",
        "Which small skill, new to you this year, gave life a little more confidence?",
        "哪怕只是学会了做一道菜...",
    ),
    (
        "q7",
        ACTION,
        "长情刻度：这一年，你最执着、甚至有些“笨拙”地坚持下来的一件事是什么？",
        "What did you keep doing this year, stubbornly or even clumsily?",
        "那些看似无用的坚持，往往最珍贵。",
    ),
    (
        "q8",
        ACTION,
        "远方投生：2025 年，哪次抵达让你觉得短暂地逃离了平庸，见到了不一样的风景？",
        "Which arrival this year let you briefly escape the ordinary?",
        "不一定是旅行，也可以是心灵的抵达。",
    ),
    (
        "q9",
        ACTION,
        "清空仪式：今年你从生命中彻底丢弃或告别的最沉重的一样东西（实物或旧物）是什么？",
        "What was the heaviest thing you let go of this year?",
        "放手的那一刻，你的感受是？",
    ),
    (
        "q10",
        ACTION,
        "职业剪影：在工作或学业的奔波中，哪一个瞬间让你感受到“终于熬过来了”的如释重负？",
        "Which moment at work or school felt like finally making it through?",
        "哪怕只有几秒钟的轻松...",
    ),
    (
        "q11",
        CONNECTION,
        "频繁坐标：谁是你 2025 年通讯录里那个最常亮起、也最让你安心的名字？",
        "Whose name lit up your phone most often this year, and calmed you the most?",
        "写下那个名字，或者那个称呼。",
    ),
    (
        "q12",
        CONNECTION,
        "意外相逢：今年哪一位新相识的人，像一束光一样照亮了你某个认知盲区？",
        "Which new acquaintance lit up one of your blind spots?",
        "他/她说的一句话，让你记到了现在...",
    ),
    (
        "q13",
        CONNECTION,
        "无名暖意：记录一个来自陌生人或世界的微小善意，它曾在哪个寒冷的时刻治愈过你？",
        "Record a small kindness from a stranger that healed you in a cold moment.",
        "那个瞬间，世界变得温柔了吗？",
    ),
    (
        "q14",
        CONNECTION,
        "关系的减法：这一年，你淡出了哪一段不再产生共振的关系，找回了多少自在？",
        "Which relationship did you quietly step away from, and how much ease did you regain?",
        "离开也是一种成长。",
    ),
    (
        "q15",
        EMOTION,
        "精神避难所：当世界喧嚣或压力来袭时，你习惯躲进哪种习惯或爱好中悄悄“回血”？",
        "When the world gets loud, which habit or hobby do you hide in to recharge?",
        "那里只有你和安宁。",
    ),
    (
        "q16",
        EMOTION,
        "年度旁白：如果给你的 2025 配上一个高频出现的口头禅，那个词会是什么？",
        "If 2025 had a catchphrase, what would it be?",
        "是你对自己说得最多的一句话。",
    ),
    (
        "q17",
        EMOTION,
        "泪水出口：今年哪一次被文艺作品（书影音）击中的瞬间，让你借由他人的故事流了自己的泪？",
        "Which book, film or song let you cry your own tears through someone else's story?",
        "是感动，还是释怀？",
    ),
    (
        "q18",
        EMOTION,
        "破壳瞬间：2025 年，你做过最勇敢、最不顾后果的一次“自我主张”是什么？",
        "What was your bravest act of standing up for yourself this year?",
        "那一刻，你只听从了自己。",
    ),
    (
        "q19",
        FAREWELL,
        "生命色彩：如果 2025 年是一块画布，你会为它涂抹上怎样的底色和评分？",
        "If 2025 were a canvas, what colour and score would you give it?",
        "颜色代表心情，分数代表无悔。",
    ),
    (
        "q20",
        FAREWELL,
        "通关密语：跨过 2025 的门槛，你想对那个在未来守候的自己，预留一个什么词作为接头暗号？",
        "What single word would you leave as a password for your future self?",
        "一个词，连接现在与未来。",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_sequence_has_twenty_unique_questions() {
        let sequence = QuestionSequence::year_in_review();
        assert_eq!(sequence.len(), 20);

        let rebuilt = QuestionSequence::new(sequence.iter().cloned().collect())
            .expect("built-in ids are unique");
        assert_eq!(rebuilt, sequence);

        assert_eq!(sequence.get(0).map(|q| q.id.as_str()), Some("q1"));
        assert_eq!(sequence.get(19).map(|q| q.id.as_str()), Some("q20"));
        assert_eq!(sequence.position("q11"), Some(10));
    }

    #[test]
    fn rejects_empty_and_duplicate_sequences() {
        assert!(matches!(
            QuestionSequence::new(vec![]),
            Err(JourneyError::EmptySequence)
        ));

        let duplicated = vec![
            Question::new("a", "c", "p", "s"),
            Question::new("a", "c", "p2", "s2"),
        ];
        assert!(matches!(
            QuestionSequence::new(duplicated),
            Err(JourneyError::DuplicateQuestion(id)) if id == "a"
        ));
    }

    #[test]
    fn placeholder_falls_back_to_default() {
        let question = Question::new("a", "c", "p", "s");
        assert_eq!(question.placeholder_or_default(), DEFAULT_PLACEHOLDER);
        let question = question.with_placeholder("hint");
        assert_eq!(question.placeholder_or_default(), "hint");
    }
}
