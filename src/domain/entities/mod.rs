//! Domain entities - The state a player action is resolved against

mod context;
mod player;

pub use context::SituationalContext;
pub use player::{Attributes, PlayerSnapshot, BASELINE_ATTRIBUTE};
pub use crate::domain::value_objects::RealmStage;
