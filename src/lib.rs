//! Library root for `velfie`.
//!
//! Velfie is an OpenAI-backed conversational intake assistant for municipal
//! welfare technology ("velferdsteknologi") designed to:
//! - Collect clinical/functional indications about a patient through a
//!   multi-turn Norwegian dialogue
//! - Match the collected indications against a catalog of six
//!   assistive-technology services
//! - Render structured recommendations with links and embeddable media
//!
//! The dialogue state machine is deterministic, code-driven state; the LLM
//! only interprets each free-text answer into structured indication updates.
//! The architecture is built around extensible traits that allow for
//! different implementations of the LLM service.

#[warn(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the velfie runtime:
/// - Creates the runtime context with session store and LLM client
/// - Binds the HTTP server and serves intake requests
pub async fn start(config: Config) -> Void {
    info!("Starting velfie ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config);

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
