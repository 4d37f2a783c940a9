use tether_types::StateValue;
use tether_update::StateTransform;

/// Reserved type of actions that carry a [`StateTransform`].
pub const SYNC_ACTION_TYPE: &str = "@@tether/SYNC";

/// Type of the action dispatched when a store is created or its reducer is
/// replaced, so reducers can supply their initial state.
pub const INIT_ACTION_TYPE: &str = "@@tether/INIT";

/// Data attached to an [`Action`].
#[derive(Clone, Debug, Default)]
pub enum Payload {
    #[default]
    None,
    Value(StateValue),
    Transform(StateTransform),
}

/// A tagged record describing a state change.
#[derive(Clone, Debug)]
pub struct Action {
    kind: String,
    payload: Payload,
}

impl Action {
    /// An action without payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Payload::None,
        }
    }

    /// An action carrying a plain data payload.
    pub fn with_payload(kind: impl Into<String>, payload: impl Into<StateValue>) -> Self {
        Self {
            kind: kind.into(),
            payload: Payload::Value(payload.into()),
        }
    }

    /// A sync action carrying a state transform.
    pub fn sync(transform: StateTransform) -> Self {
        Self {
            kind: SYNC_ACTION_TYPE.to_string(),
            payload: Payload::Transform(transform),
        }
    }

    pub(crate) fn init() -> Self {
        Self::new(INIT_ACTION_TYPE)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The data payload, if any.
    pub fn value(&self) -> Option<&StateValue> {
        match &self.payload {
            Payload::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The transform payload, if any.
    pub fn transform(&self) -> Option<&StateTransform> {
        match &self.payload {
            Payload::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn is_sync(&self) -> bool {
        self.kind == SYNC_ACTION_TYPE
    }
}
