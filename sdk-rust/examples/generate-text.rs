use capsule_sdk::{
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput, Message,
};
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let model = OpenAIChatModel::new(
        std::env::var("CAPSULE_MODEL").unwrap_or_else(|_| "deepseek-chat".to_string()),
        OpenAIChatModelOptions {
            base_url: Some(
                std::env::var("CAPSULE_BASE_URL")
                    .unwrap_or_else(|_| "https://api.deepseek.com".to_string()),
            ),
            api_key: std::env::var("CAPSULE_API_KEY")
                .expect("CAPSULE_API_KEY environment variable must be set"),
            ..Default::default()
        },
    );

    let response = model
        .generate(LanguageModelInput {
            system_prompt: Some("Answer in one short sentence.".to_string()),
            messages: vec![
                Message::user_text("What is a time capsule?"),
                Message::assistant_text("A sealed container of memories for the future."),
                Message::user_text("Why would someone write one at the end of a year?"),
            ],
            temperature: Some(1.0),
            ..Default::default()
        })
        .await
        .unwrap();

    println!("{}", response.text());
}
