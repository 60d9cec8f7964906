//! Domain layer - Core game logic with no external I/O
//!
//! This layer contains:
//! - Entities: player snapshot and situational context
//! - Value Objects: scenarios, luck, influence factors, results, configuration
//! - Rules: pattern rule sets and their loaders
//! - Domain Services: classifier, calculation engine, luck-biased sampling

pub mod entities;
pub mod rules;
pub mod services;
pub mod value_objects;
