use std::fmt;

use super::value::Value;

/// Lifecycle stage of a [`Tag`].
///
/// The store only compares states for equality; it never moves a tag from one
/// state to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagState {
    /// Produced but not yet picked up by a further evaluation round.
    Parked,
    /// No rule consumes this tag; it is a final diagnosis result.
    Leaf,
    /// Already consumed as input by a later rule.
    Processed,
}

impl fmt::Display for TagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagState::Parked => "parked",
            TagState::Leaf => "leaf",
            TagState::Processed => "processed",
        };
        f.write_str(name)
    }
}

/// A typed, stateful unit produced by a successful rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    tag_type: String,
    value: Value,
    state: TagState,
}

impl Tag {
    pub fn new(tag_type: impl Into<String>, value: impl Into<Value>, state: TagState) -> Self {
        Self {
            tag_type: tag_type.into(),
            value: value.into(),
            state,
        }
    }

    #[must_use]
    pub fn tag_type(&self) -> &str {
        &self.tag_type
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn state(&self) -> TagState {
        self.state
    }

    /// A copy of this tag in another lifecycle state.
    #[must_use]
    pub fn with_state(&self, state: TagState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})[{}]", self.tag_type, self.value, self.state)
    }
}
