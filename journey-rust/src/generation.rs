use crate::{
    opentelemetry::{trace_generation, GenerationOperation, GenerationSpan},
    prompts::{
        self, ChatContext, InspirationContext, ReviewContext, CHAT_FALLBACK,
        INSPIRATION_FALLBACK, OFFLINE_CHAT, OFFLINE_INSPIRATION, REVIEW_SYSTEM_PROMPT,
    },
    theme::NEUTRAL_CONTEXT,
    AnalysisResult, AnswerMap, ChatTranscript, GenerationConfig, GenerationError,
};
use capsule_sdk::{
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput, Message, ResponseFormatJson, ResponseFormatOption,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Thin client over the completion backend. Every public operation either
/// returns model output or a fixed fallback; only
/// [`GenerationClient::try_synthesize_review`] surfaces errors.
///
/// A client without a model is offline: it never touches the network and
/// answers with canned content.
#[derive(Clone)]
pub struct GenerationClient {
    model: Option<Arc<dyn LanguageModel>>,
    config: GenerationConfig,
}

impl GenerationClient {
    pub fn new(model: Arc<dyn LanguageModel>, config: GenerationConfig) -> Self {
        Self {
            model: Some(model),
            config,
        }
    }

    #[must_use]
    pub fn offline(config: GenerationConfig) -> Self {
        Self {
            model: None,
            config,
        }
    }

    /// Builds an OpenAI-compatible model when the config carries a usable
    /// key, and an offline client otherwise.
    #[must_use]
    pub fn from_config(config: GenerationConfig) -> Self {
        let Some(api_key) = config.usable_api_key().map(ToString::to_string) else {
            info!("Generation client starting in offline mode");
            return Self::offline(config);
        };

        let model = OpenAIChatModel::new(
            config.model_id.clone(),
            OpenAIChatModelOptions {
                base_url: Some(config.base_url.clone()),
                api_key,
                ..Default::default()
            },
        );
        info!(
            model = %config.model_id,
            base_url = %config.base_url,
            "Generation client ready"
        );
        Self::new(Arc::new(model), config)
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.model.is_none()
    }

    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Two short example answers for a question the user is stuck on.
    pub async fn fetch_inspiration(&self, prompt: &str) -> String {
        let Some(model) = &self.model else {
            let _span = GenerationSpan::new(GenerationOperation::Inspiration, true);
            return OFFLINE_INSPIRATION.to_string();
        };

        let ctx = InspirationContext {
            question: prompt.to_string(),
        };
        let input = LanguageModelInput {
            system_prompt: Some(prompts::inspiration_system_prompt(&ctx)),
            messages: vec![Message::user_text(prompts::inspiration_user_prompt(&ctx))],
            temperature: Some(self.config.inspiration_temperature),
            ..Default::default()
        };

        let (result, mut span) = trace_generation(
            GenerationOperation::Inspiration,
            false,
            complete(model.as_ref(), input),
        )
        .await;

        match result {
            Ok(text) => text.trim().to_string(),
            Err(error) => {
                warn!("Inspiration failed, using fallback: {error}");
                span.on_fallback();
                INSPIRATION_FALLBACK.to_string()
            }
        }
    }

    /// The structured review, or the offline review when anything goes
    /// wrong.
    pub async fn synthesize_review(
        &self,
        answers: &AnswerMap,
        theme_context: &str,
    ) -> AnalysisResult {
        let (result, mut span) = self.review(answers, theme_context).await;
        result.unwrap_or_else(|error| {
            warn!("Review synthesis failed, using offline review: {error}");
            span.on_fallback();
            AnalysisResult::offline(theme_context)
        })
    }

    /// Like [`Self::synthesize_review`] but reports backend and parse
    /// failures instead of recovering from them. Offline clients still
    /// succeed with the offline review.
    pub async fn try_synthesize_review(
        &self,
        answers: &AnswerMap,
        theme_context: &str,
    ) -> Result<AnalysisResult, GenerationError> {
        self.review(answers, theme_context).await.0
    }

    async fn review(
        &self,
        answers: &AnswerMap,
        theme_context: &str,
    ) -> (Result<AnalysisResult, GenerationError>, GenerationSpan) {
        let Some(model) = &self.model else {
            let span = GenerationSpan::new(GenerationOperation::Review, true);
            return (Ok(AnalysisResult::offline(theme_context)), span);
        };

        let ctx = ReviewContext {
            theme_context: theme_context.to_string(),
            answers_json: answers.to_json(),
        };
        let input = LanguageModelInput {
            system_prompt: Some(REVIEW_SYSTEM_PROMPT.to_string()),
            messages: vec![Message::user_text(prompts::review_user_prompt(&ctx))],
            response_format: Some(ResponseFormatOption::Json(ResponseFormatJson {
                name: "year_review".to_string(),
                description: None,
                schema: None,
            })),
            temperature: Some(self.config.review_temperature),
            ..Default::default()
        };
        debug!(answers = answers.len(), "Requesting year review");

        trace_generation(GenerationOperation::Review, false, async {
            let text = complete(model.as_ref(), input).await?;
            let result = AnalysisResult::parse(&text)?;
            Ok::<_, GenerationError>(result)
        })
        .await
    }

    /// The past year's reply to `message`, given the conversation so far.
    /// `transcript` must not already contain `message`.
    pub async fn continue_chat(&self, transcript: &ChatTranscript, message: &str) -> String {
        let Some(model) = &self.model else {
            let _span = GenerationSpan::new(GenerationOperation::Chat, true);
            return OFFLINE_CHAT.to_string();
        };

        let ctx = ChatContext {
            theme_context: transcript
                .memory()
                .map_or(NEUTRAL_CONTEXT, |memory| memory.theme_context.as_str())
                .to_string(),
        };
        let mut messages = transcript.to_messages();
        messages.push(Message::user_text(message));

        let input = LanguageModelInput {
            system_prompt: Some(prompts::chat_system_prompt(&ctx)),
            messages,
            temperature: Some(self.config.chat_temperature),
            ..Default::default()
        };

        let (result, mut span) = trace_generation(
            GenerationOperation::Chat,
            false,
            complete(model.as_ref(), input),
        )
        .await;

        result.unwrap_or_else(|error| {
            warn!("Chat reply failed, using fallback: {error}");
            span.on_fallback();
            CHAT_FALLBACK.to_string()
        })
    }
}

async fn complete(
    model: &dyn LanguageModel,
    input: LanguageModelInput,
) -> Result<String, GenerationError> {
    let response = model.generate(input).await?;
    let text = response.text();
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}
