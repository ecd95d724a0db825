//! The dialogue core of velfie.
//!
//! This module drives indication collection and recommendation synthesis:
//! - The orchestrator runs one intake turn per request.
//! - The renderer turns matched services into recommendation cards and
//!   substitutes media placeholders.

pub mod dialogue;
pub mod render;
