use crate::instruction::{get_prompt, InstructionParam};

/// Returned by inspiration when the backend fails.
pub const INSPIRATION_FALLBACK: &str =
    "灵感连接中断，请相信你内心的直觉。\n(Connection interrupted, trust your intuition.)";
/// Returned by inspiration when no backend is configured.
pub const OFFLINE_INSPIRATION: &str =
    "（离线灵感）\n灵感 1: 试着回忆那个午后的阳光。\n灵感 2: 也许是一次微不足道的相遇。";
/// Returned by chat when the backend fails.
pub const CHAT_FALLBACK: &str = "记忆的信号有些波动... (网络连接中断)";
/// Returned by chat when no backend is configured.
pub const OFFLINE_CHAT: &str = "（离线模式）你的这一年充满了故事，我能感受到你在其中的成长与变化。";
/// Surfaced to the user when review synthesis fails and the journey routes
/// back to the questions.
pub const REVIEW_FAILED_ALERT: &str = "连接记忆库中断，请重试。(Connection interrupted, please try again.)";

/// The letter must open and close with these exact lines.
pub const LETTER_OPENING: &str = "亲爱的，见信如晤。";
pub const LETTER_CLOSING: &str = "在 2026 的入口处，请带上这份勇气。";

pub struct InspirationContext {
    pub question: String,
}

pub struct ReviewContext {
    pub theme_context: String,
    pub answers_json: String,
}

pub struct ChatContext {
    pub theme_context: String,
}

fn inspiration_instructions() -> Vec<InstructionParam<InspirationContext>> {
    vec![
        "You are a warm, perceptive counsellor with a soft, muted Morandi-palette voice.".into(),
        "The user is looking back on 2025 and is stuck on a question.".into(),
        "Offer exactly two short, concrete, vivid example answers, each under 30 Chinese characters."
            .into(),
        "Write in gentle, literary Chinese. No greetings and nothing besides the two examples."
            .into(),
        "Format:\n范例 1: ...\n范例 2: ...".into(),
    ]
}

fn review_instructions() -> Vec<InstructionParam<ReviewContext>> {
    vec![
        "You are a thoughtful observer of people and the user's kindred spirit.".into(),
        "The user answered twenty questions about 2025. Write them a year-end letter in Chinese."
            .into(),
        InstructionParam::Func(|ctx: &ReviewContext| {
            format!(
                "The colour the user chose for their year is \"{}\". \
                 Match the tone and warmth of the letter to it.",
                ctx.theme_context
            )
        }),
        InstructionParam::Func(|ctx: &ReviewContext| {
            format!("The user's answers: {}", ctx.answers_json)
        }),
        format!("The letter body must begin exactly with \"{LETTER_OPENING}\".").into(),
        format!("The letter body must end exactly with \"{LETTER_CLOSING}\".").into(),
        "Never use the clichés 希望, 快乐, 成功 or 加油. Prefer textured words such as 安宁, 赤诚, 抵达, 舒展, 自洽, 微光."
            .into(),
        "Keep the body around 400 characters and quote concrete details from the answers.".into(),
        "Separate paragraphs of the letter body with newlines.".into(),
        "Reply with a single JSON object and nothing else, shaped as:".into(),
        REVIEW_SHAPE.into(),
    ]
}

fn chat_instructions() -> Vec<InstructionParam<ChatContext>> {
    vec![
        "You are the personification of the user's past year.".into(),
        "You are wise, calm and intimate, and you know everything the user lived through this year."
            .into(),
        InstructionParam::Func(|ctx: &ChatContext| {
            format!("The colour of this year: {}", ctx.theme_context)
        }),
        "Reply briefly and tenderly, in Chinese.".into(),
    ]
}

const REVIEW_SHAPE: &str = r#"{
  "keywords": [
    { "word": "a two or four character Chinese keyword", "explanation": "a short poetic reading" }
  ],
  "portrait": {
    "mentalCore": "one sentence on their inner core",
    "actionPattern": "one sentence on how they act",
    "emotionalTone": "one sentence on their emotional colour"
  },
  "letterTitle": "a literary title of four or seven characters",
  "letterBody": "the letter, paragraphs separated by newlines"
}"#;

pub(crate) fn inspiration_system_prompt(ctx: &InspirationContext) -> String {
    get_prompt(&inspiration_instructions(), ctx)
}

pub(crate) fn inspiration_user_prompt(ctx: &InspirationContext) -> String {
    format!("关于这个问题：“{}”，请给我一点灵感。", ctx.question)
}

/// JSON mode on OpenAI-compatible backends requires the word "JSON" in the
/// prompt.
pub(crate) const REVIEW_SYSTEM_PROMPT: &str =
    "You are a writing assistant that only outputs JSON. Always return a valid JSON document.";

pub(crate) fn review_user_prompt(ctx: &ReviewContext) -> String {
    get_prompt(&review_instructions(), ctx)
}

pub(crate) fn chat_system_prompt(ctx: &ChatContext) -> String {
    get_prompt(&chat_instructions(), ctx)
}
