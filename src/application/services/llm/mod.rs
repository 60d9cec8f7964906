//! LLM prompt construction

pub mod prompt_builder;

pub use prompt_builder::{
    build_assistant_message, build_assistant_system_prompt, build_narrator_message,
    build_narrator_system_prompt, NarrationRequest,
};
