use super::chat_api::{
    ChatCompletionRequestMessage, ChatCompletionRole, CompletionUsage,
    CreateChatCompletionRequest, CreateChatCompletionResponse, JsonSchemaConfig, ResponseFormat,
};
use crate::{
    client_utils, LanguageModel, LanguageModelError, LanguageModelInput, LanguageModelResult,
    Message, ModelResponse, ModelUsage, Part, ResponseFormatJson, ResponseFormatOption,
};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "openai";

/// A model served through the chat completions API. Any OpenAI-compatible
/// provider works by pointing `base_url` at it.
pub struct OpenAIChatModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct OpenAIChatModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl OpenAIChatModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: OpenAIChatModelOptions) -> Self {
        let OpenAIChatModelOptions {
            base_url,
            api_key,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key,
            base_url,
            client,
            headers,
        }
    }

    /// The full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_headers(&self) -> LanguageModelResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth_header =
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid API key header value: {error}"
                ))
            })?;
        headers.insert(header::AUTHORIZATION, auth_header);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                LanguageModelError::InvalidInput(format!("Invalid header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAIChatModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        crate::opentelemetry::trace_generate(
            self.provider(),
            &self.model_id(),
            input,
            |input| async move {
                let request = convert_to_openai_create_params(input, &self.model_id);
                let headers = self.request_headers()?;

                let response: CreateChatCompletionResponse =
                    client_utils::send_json(&self.client, &self.endpoint(), &request, headers)
                        .await?;

                map_openai_response(response)
            },
        )
        .await
    }
}

fn convert_to_openai_create_params(
    input: LanguageModelInput,
    model_id: &str,
) -> CreateChatCompletionRequest {
    CreateChatCompletionRequest {
        model: model_id.to_string(),
        messages: convert_to_openai_messages(input.messages, input.system_prompt),
        max_tokens: input.max_tokens,
        temperature: input.temperature,
        top_p: input.top_p,
        presence_penalty: input.presence_penalty,
        frequency_penalty: input.frequency_penalty,
        seed: input.seed,
        response_format: input.response_format.map(convert_to_openai_response_format),
        stream: false,
    }
}

fn convert_to_openai_messages(
    messages: Vec<Message>,
    system_prompt: Option<String>,
) -> Vec<ChatCompletionRequestMessage> {
    let mut openai_messages = Vec::with_capacity(messages.len() + 1);

    if let Some(prompt) = system_prompt {
        openai_messages.push(ChatCompletionRequestMessage {
            role: ChatCompletionRole::System,
            content: prompt,
        });
    }

    for message in messages {
        let (role, content) = match message {
            Message::User(user_message) => (ChatCompletionRole::User, user_message.content),
            Message::Assistant(assistant_message) => {
                (ChatCompletionRole::Assistant, assistant_message.content)
            }
        };
        openai_messages.push(ChatCompletionRequestMessage {
            role,
            content: join_text(&content),
        });
    }

    openai_messages
}

fn join_text(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(Part::as_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn convert_to_openai_response_format(response_format: ResponseFormatOption) -> ResponseFormat {
    match response_format {
        ResponseFormatOption::Text => ResponseFormat::Text,
        ResponseFormatOption::Json(ResponseFormatJson {
            name,
            description,
            schema,
        }) => match schema {
            Some(schema) => ResponseFormat::JsonSchema {
                json_schema: JsonSchemaConfig {
                    name,
                    description,
                    schema,
                    strict: true,
                },
            },
            None => ResponseFormat::JsonObject,
        },
    }
}

fn map_openai_response(response: CreateChatCompletionResponse) -> LanguageModelResult<ModelResponse> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        LanguageModelError::Invariant(PROVIDER, "No choices in response".to_string())
    })?;

    let message = choice.message;

    if let Some(refusal) = &message.refusal {
        if !refusal.is_empty() {
            return Err(LanguageModelError::Refusal(refusal.clone()));
        }
    }

    let content = message
        .content
        .filter(|content| !content.is_empty())
        .map(|content| vec![Part::text(content)])
        .unwrap_or_default();

    let usage = response.usage.map(map_openai_usage).transpose()?;

    Ok(ModelResponse { content, usage })
}

fn map_openai_usage(usage: CompletionUsage) -> LanguageModelResult<ModelUsage> {
    let input_tokens = u32::try_from(usage.prompt_tokens).map_err(|_| {
        LanguageModelError::Invariant(PROVIDER, "prompt_tokens exceeded u32 range".to_string())
    })?;
    let output_tokens = u32::try_from(usage.completion_tokens).map_err(|_| {
        LanguageModelError::Invariant(
            PROVIDER,
            "completion_tokens exceeded u32 range".to_string(),
        )
    })?;

    Ok(ModelUsage {
        input_tokens,
        output_tokens,
    })
}
