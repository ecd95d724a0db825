//! Runtime services and shared state for velfie.

use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::{
    base::{config::Config, types::Void},
    service::{http, llm::LlmClient, store::SessionStore},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the session store, LLM client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The session store instance.
    pub store: SessionStore,
    /// The LLM client instance.
    pub llm: LlmClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Self {
        // Initialize the session store.
        let store = SessionStore::new(&config);

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        Self { config, store, llm }
    }

    /// Bind and serve the HTTP surface until shutdown.
    pub async fn start(&self) -> Void {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;

        info!("Listening on {}.", self.config.bind_addr);

        axum::serve(listener, http::router(self.clone())).await?;

        Ok(())
    }
}
