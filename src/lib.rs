//! Scenario Engine - free-text player actions to structured outcomes
//!
//! Classifies a player's action into a scenario, routes it through the
//! configured recognition strategy, computes luck-biased numbers where the
//! scenario allows it, and hands the result to a narrator.

pub mod application;
pub mod domain;
pub mod infrastructure;
