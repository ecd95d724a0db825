//! Core components, types, and utilities for velfie.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The static service/indication catalog.
//! - System prompts and fixed dialogue texts.
//! - Common types and result handling.

pub mod catalog;
pub mod config;
pub mod prompts;
pub mod types;
