//! Application layer - Use cases and ports
//!
//! Orchestrates the domain services: routing, the assistant and narrator
//! hand-off, result caching and the host-facing settings.

pub mod dto;
pub mod ports;
pub mod services;
