//! Lifecycle hooks an entity type may opt into.
//!
//! Every method defaults to a no-op, so a type implements only the hooks it
//! needs. Hooks may mutate the vertex; sessions re-marshal after the
//! `before_*` hooks so those changes reach the store.

use async_trait::async_trait;
use ogm_core::{Payload, Vertex};
use thiserror::Error;

/// A hook refused or failed the operation.
#[derive(Debug, Error)]
#[error("hook {hook} failed: {message}")]
pub struct HookError {
    pub hook: &'static str,
    pub message: String,
}

impl HookError {
    pub fn new(hook: &'static str, message: impl Into<String>) -> Self {
        Self {
            hook,
            message: message.into(),
        }
    }
}

/// Result type for hooks.
pub type HookResult<T> = Result<T, HookError>;

/// Optional create/update/delete callbacks for an entity type.
#[async_trait]
pub trait VertexHooks: Send + Sync {
    /// Called with the marshaled payload before the create write.
    async fn before_create(&self, _vertex: &mut Vertex, _payload: &Payload) -> HookResult<()> {
        Ok(())
    }

    /// Called with the final payload after the store assigned an id.
    async fn after_create(&self, _vertex: &mut Vertex, _payload: &Payload) -> HookResult<()> {
        Ok(())
    }

    /// Called with the stored snapshot (if any) before the update write.
    async fn before_update(
        &self,
        _vertex: &mut Vertex,
        _before: Option<&Vertex>,
        _payload: &Payload,
    ) -> HookResult<()> {
        Ok(())
    }

    /// Called after an update the store acknowledged with an id.
    async fn after_update(&self, _vertex: &mut Vertex, _payload: &Payload) -> HookResult<()> {
        Ok(())
    }

    async fn before_delete(&self, _vertex: &mut Vertex) -> HookResult<()> {
        Ok(())
    }

    async fn after_delete(&self, _vertex: &mut Vertex) -> HookResult<()> {
        Ok(())
    }
}
