//! Situational context - where the action happens and what is around

use serde::{Deserialize, Serialize};

/// Game context accompanying a player action
///
/// Every field is optional so hosts can pass only what they know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SituationalContext {
    pub location: Option<String>,
    pub recent_actions: Vec<String>,
    pub nearby_objects: Vec<String>,
    pub player_state: Option<String>,
    pub time_of_day: Option<String>,
}

impl SituationalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_objects<I, S>(mut self, objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nearby_objects.extend(objects.into_iter().map(Into::into));
        self
    }

    pub fn with_player_state(mut self, state: impl Into<String>) -> Self {
        self.player_state = Some(state.into());
        self
    }

    pub fn location_contains(&self, tag: &str) -> bool {
        contains_ci(self.location.as_deref(), tag)
    }

    pub fn has_object(&self, tag: &str) -> bool {
        self.nearby_objects
            .iter()
            .any(|object| contains_ci(Some(object), tag))
    }

    pub fn player_state_contains(&self, tag: &str) -> bool {
        contains_ci(self.player_state.as_deref(), tag)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    match haystack {
        Some(haystack) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => false,
    }
}
