//! Service integrations and infrastructure for velfie.
//!
//! This module contains the collaborators the dialogue core talks to:
//! - The HTTP serving surface (axum).
//! - LLM services (e.g., OpenAI).
//! - In-memory session storage.
//!
//! The LLM module defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod http;
pub mod llm;
pub mod store;
