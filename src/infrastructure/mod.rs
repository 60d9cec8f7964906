//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Ollama: OpenAI-compatible LLM client for the assistant and narrator
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod ollama;
pub mod state;
