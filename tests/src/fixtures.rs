//! Pet/Owner fixtures.

use async_trait::async_trait;
use ogm_connection::Connection;
use ogm_core::{Payload, Vertex};
use ogm_registry::{Cardinality, HookError, HookResult, Registry, RegistryBuilder, RegistryError, VertexHooks};
use ogm_session::{GraphSession, SessionResult};
use ogm_transaction::OgmConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::memory::MemoryStore;

/// One hook invocation: which hook, and the vertex id it saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub hook: &'static str,
    pub id: Option<String>,
}

/// Hooks that log every call and fill in a default nickname on create.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    calls: Mutex<Vec<Recorded>>,
    refuse: Option<&'static str>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hooks that fail whenever `hook` runs.
    pub fn refusing(hook: &'static str) -> Self {
        Self {
            refuse: Some(hook),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> MutexGuard<'_, Vec<Recorded>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Names of the hooks called so far, in order.
    pub fn hooks_called(&self) -> Vec<&'static str> {
        self.calls().iter().map(|r| r.hook).collect()
    }

    fn record(&self, hook: &'static str, vertex: &Vertex) -> HookResult<()> {
        self.calls().push(Recorded {
            hook,
            id: vertex.id().map(str::to_string),
        });
        if self.refuse == Some(hook) {
            return Err(HookError::new(hook, "refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl VertexHooks for RecordingHooks {
    async fn before_create(&self, vertex: &mut Vertex, _payload: &Payload) -> HookResult<()> {
        self.record("before_create", vertex)?;
        if vertex.str_attr("nickname").unwrap_or_default().is_empty() {
            let name = vertex.str_attr("name").unwrap_or_default().to_string();
            vertex.set_attr("nickname", format!("little {}", name));
        }
        Ok(())
    }

    async fn after_create(&self, vertex: &mut Vertex, _payload: &Payload) -> HookResult<()> {
        self.record("after_create", vertex)
    }

    async fn before_update(
        &self,
        vertex: &mut Vertex,
        before: Option<&Vertex>,
        _payload: &Payload,
    ) -> HookResult<()> {
        self.record("before_update", vertex)?;
        if let Some(name) = before.and_then(|b| b.str_attr("name")) {
            vertex.set_attr("previous_name", name);
        }
        Ok(())
    }

    async fn after_update(&self, vertex: &mut Vertex, _payload: &Payload) -> HookResult<()> {
        self.record("after_update", vertex)
    }

    async fn before_delete(&self, vertex: &mut Vertex) -> HookResult<()> {
        self.record("before_delete", vertex)
    }

    async fn after_delete(&self, vertex: &mut Vertex) -> HookResult<()> {
        self.record("after_delete", vertex)
    }
}

/// Pet and Owner types. Pets carry `hooks` when given.
///
/// Pet: name (exact index), breed, nickname, previous_name, age, owner -> Owner.
/// Owner: name, pets (reverse of owner), friends -> Owner.
pub fn pet_registry(hooks: Option<Arc<RecordingHooks>>) -> Result<Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    let mut pet = builder
        .add_type("Pet")
        .indexed_field("name", "", "exact")
        .field("breed", "")
        .field("nickname", "")
        .field("previous_name", "")
        .field("age", 0i64)
        .edge("owner", "Owner", Cardinality::Single);
    if let Some(hooks) = hooks {
        pet = pet.hooks(hooks);
    }
    pet.done()?;
    builder
        .add_type("Owner")
        .field("name", "")
        .reverse_edge("pets", "Pet", Cardinality::Multiple, "owner")
        .edge("friends", "Owner", Cardinality::Multiple)
        .done()?;
    builder.build()
}

/// A connected session over `store` that retries without backoff.
pub async fn memory_session<'r>(
    registry: &'r Registry,
    store: &MemoryStore,
) -> SessionResult<GraphSession<'r>> {
    let config = OgmConfig::default().with_retry_backoff_ms(0);
    let connection = Connection::new(Arc::new(store.clone()), config);
    let mut session = GraphSession::new(registry, connection);
    session.connect(false).await?;
    Ok(session)
}
