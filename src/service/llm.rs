//! Thin wrapper around async-openai for OpenAI LLM calls.

use std::{ops::Deref, sync::Arc, time::Duration};

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{ChatMessage, ChatRole, Res},
};

// Traits.

/// Generic LLM client trait that clients must implement.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Run one chat completion over a composed message sequence, returning the raw text output.
    async fn complete(&self, messages: &[ChatMessage]) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }

    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            model: config.openai_model.clone(),
            temperature: config.openai_temperature,
            max_tokens: config.openai_max_tokens,
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(skip_all)]
    async fn complete(&self, messages: &[ChatMessage]) -> Res<String> {
        debug!("Requesting chat completion with {} messages.", messages.len());

        let request_messages = messages.iter().map(to_openai_message).collect::<Res<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()?;

        let response = timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| anyhow::anyhow!("Chat completion timed out after {}s.", self.timeout.as_secs()))??;

        let content = response.choices.first().and_then(|choice| choice.message.content.clone()).unwrap_or_default();

        Ok(content)
    }
}

/// Map a transcript turn onto the async-openai request message type.
fn to_openai_message(message: &ChatMessage) -> Res<ChatCompletionRequestMessage> {
    let message = match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default().content(message.text.clone()).build()?.into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default().content(message.text.clone()).build()?.into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default().content(message.text.clone()).build()?.into(),
    };

    Ok(message)
}
