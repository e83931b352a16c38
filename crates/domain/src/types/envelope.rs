//! Uniform-POST action envelope
//!
//! Some backend deployments expose a single POST endpoint per resource
//! instead of verb-per-resource REST. Requests to those backends wrap the
//! operation in an envelope carrying the acting user's identity and an
//! action discriminator. The envelope is a wire shape, so fields serialize
//! in camelCase exactly as the backend expects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of the user performing the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorContext {
    pub actor_id: String,
    pub email: String,
    pub role: String,
}

/// Operation discriminator for enveloped requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// A complete enveloped request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEnvelope {
    pub actor: ActorContext,
    pub action: ActionKind,
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ActionEnvelope {
    /// Builds an envelope with no target id or payload (list-style actions).
    pub fn new(actor: ActorContext, action: ActionKind, resource: impl Into<String>) -> Self {
        Self { actor, action, resource: resource.into(), resource_id: None, payload: None }
    }

    /// Sets the target resource id.
    #[must_use]
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Attaches an operation payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}
