//! The graph session.

use ogm_connection::Connection;
use ogm_core::predicate::{is_private, ID_PREDICATE};
use ogm_core::{Payload, Vertex};
use ogm_marshal::Marshaler;
use ogm_registry::{Registry, SchemaFragments};
use ogm_transaction::{NquadObject, Transaction, Vars};
use serde_json::{json, Value as Json};
use tracing::{debug, info};

use crate::error::{SessionError, SessionResult};
use crate::expansion::expansion;
use crate::query::{self, QueryOptions, EXPAND_TOKEN};

/// The transaction a verb runs in: the caller's, or one opened for the call.
enum TxnSlot<'t> {
    Caller(&'t mut Transaction),
    Owned(Transaction),
}

impl TxnSlot<'_> {
    fn txn(&mut self) -> &mut Transaction {
        match self {
            TxnSlot::Caller(txn) => &mut **txn,
            TxnSlot::Owned(txn) => txn,
        }
    }
}

/// Entity-aware facade over one connection.
///
/// The accumulated schema is applied on `connect` and after a full `clear`.
/// It is plain session state with a single writer.
pub struct GraphSession<'r> {
    registry: &'r Registry,
    connection: Connection,
    schema: SchemaFragments,
}

impl<'r> GraphSession<'r> {
    /// Bind a session to a connection, seeded with the registry's schema.
    pub fn new(registry: &'r Registry, connection: Connection) -> Self {
        Self {
            registry,
            connection,
            schema: registry.schema_fragments(),
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Open a transaction on the bound connection.
    pub fn transaction(&self, auto_commit: bool, read_only: bool) -> Transaction {
        self.connection.new_transaction(auto_commit, read_only)
    }

    fn marshaler(&self) -> Marshaler<'r> {
        Marshaler::new(self.registry)
    }

    fn slot<'t>(&self, tx: Option<&'t mut Transaction>, read_only: bool) -> TxnSlot<'t> {
        match tx {
            Some(txn) => TxnSlot::Caller(txn),
            None => TxnSlot::Owned(self.connection.new_transaction(true, read_only)),
        }
    }

    fn clause(&self, depth: Option<u32>) -> SessionResult<&'static str> {
        expansion(depth.unwrap_or(self.connection.config().default_depth))
    }

    fn instantiate(&self, type_name: &str) -> SessionResult<Vertex> {
        self.registry
            .instantiate(type_name)
            .ok_or_else(|| SessionError::unknown_type(type_name))
    }

    fn build(&self, type_name: &str, items: Vec<Payload>) -> SessionResult<Vec<Vertex>> {
        let marshaler = self.marshaler();
        items
            .into_iter()
            .map(|payload| {
                let mut vertex = self.instantiate(type_name)?;
                marshaler.unmarshal(&mut vertex, payload)?;
                Ok(vertex)
            })
            .collect()
    }

    // ==================== Schema ====================

    /// The accumulated schema text.
    pub fn schema(&self) -> String {
        self.schema.to_schema_string()
    }

    /// Add a predicate declaration (`name: string @index(exact) .`).
    pub fn add_index(&mut self, declaration: impl Into<String>) {
        let declaration = declaration.into();
        if !self.schema.predicates.contains(&declaration) {
            self.schema.predicates.push(declaration);
        }
    }

    /// Add a type declaration (`type Pet { name }`).
    pub fn add_type(&mut self, declaration: impl Into<String>) {
        let declaration = declaration.into();
        if !self.schema.types.contains(&declaration) {
            self.schema.types.push(declaration);
        }
    }

    /// Merge another registry's schema fragments.
    pub fn register(&mut self, registry: &Registry) {
        let fragments = registry.schema_fragments();
        for declaration in fragments.predicates {
            self.add_index(declaration);
        }
        for declaration in fragments.types {
            self.add_type(declaration);
        }
    }

    // ==================== Connection ====================

    /// Ping the store and, once verified, apply the accumulated schema.
    pub async fn connect(&mut self, announce: bool) -> SessionResult<bool> {
        if !self.connection.connect(announce).await {
            return Ok(false);
        }
        let schema = self.schema();
        if !schema.is_empty() {
            self.connection.apply_schema(&schema).await?;
        }
        Ok(true)
    }

    /// Bind to another connection, returning the previous one.
    pub fn rebind(&mut self, connection: Connection) -> Connection {
        std::mem::replace(&mut self.connection, connection)
    }

    /// Release the bound connection.
    pub async fn disconnect(self) -> SessionResult<()> {
        self.connection.disconnect().await?;
        Ok(())
    }

    /// Delete every vertex of a type, or wipe the store and re-apply the schema.
    pub async fn clear(&self, type_name: Option<&str>) -> SessionResult<()> {
        self.connection.clear(type_name).await?;
        if type_name.is_none() {
            let schema = self.schema();
            if !schema.is_empty() {
                self.connection.apply_schema(&schema).await?;
            }
        }
        Ok(())
    }

    // ==================== Reads ====================

    /// Fetch a vertex of `type_name` by id, `depth` levels deep.
    pub async fn get(
        &self,
        type_name: &str,
        id: &str,
        depth: Option<u32>,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Option<Vertex>> {
        let clause = self.clause(depth)?;
        let mut slot = self.slot(tx, true);
        self.fetch(slot.txn(), type_name, id, clause).await
    }

    async fn fetch(
        &self,
        txn: &mut Transaction,
        type_name: &str,
        id: &str,
        clause: &str,
    ) -> SessionResult<Option<Vertex>> {
        let text = query::by_id(type_name, clause);
        let vars = Vars::from([("$id".to_string(), id.to_string())]);
        let json = txn.query(&text, &vars).await?;
        let found = query::result_items(json).into_iter().next();
        match found {
            Some(payload) => Ok(self.build(type_name, vec![payload])?.pop()),
            None => Ok(None),
        }
    }

    /// Reload a stored vertex in place. Returns false when nothing matched.
    pub async fn load(
        &self,
        vertex: &mut Vertex,
        depth: Option<u32>,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<bool> {
        let id = require_id(vertex, "load")?;
        let clause = self.clause(depth)?;
        let text = query::by_id(&vertex.type_name, clause);
        let vars = Vars::from([("$id".to_string(), id)]);

        let mut slot = self.slot(tx, true);
        let json = slot.txn().query(&text, &vars).await?;
        match query::result_items(json).into_iter().next() {
            Some(payload) => {
                self.marshaler().unmarshal(vertex, payload)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run caller query text and build every element of the result block.
    ///
    /// `%expand%` in the text is replaced by the expansion clause for `depth`.
    pub async fn query(
        &self,
        type_name: &str,
        text: &str,
        vars: &Vars,
        depth: Option<u32>,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Vec<Vertex>> {
        let text = if text.contains(EXPAND_TOKEN) {
            text.replace(EXPAND_TOKEN, self.clause(depth)?)
        } else {
            text.to_string()
        };
        let mut slot = self.slot(tx, true);
        let json = slot.txn().query(&text, vars).await?;
        self.build(type_name, query::result_items(json))
    }

    /// Vertices of `type_name` matched by a root function such as `eq(name, "x")`.
    pub async fn query_with_function(
        &self,
        type_name: &str,
        function: &str,
        depth: Option<u32>,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Vec<Vertex>> {
        let text = query::by_function(type_name, function, self.clause(depth)?);
        let mut slot = self.slot(tx, true);
        let json = slot.txn().query(&text, &Vars::new()).await?;
        self.build(type_name, query::result_items(json))
    }

    /// A page of every vertex of `type_name`.
    pub async fn all(
        &self,
        type_name: &str,
        options: &QueryOptions,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Vec<Vertex>> {
        let limit = query::clamp_limit(options.limit, self.connection.config().max_limit);
        let text = query::listing(
            type_name,
            options.order.as_ref(),
            limit,
            options.offset,
            self.clause(options.depth)?,
        );
        let mut slot = self.slot(tx, true);
        let json = slot.txn().query(&text, &Vars::new()).await?;
        self.build(type_name, query::result_items(json))
    }

    /// The last vertex matched by `function`, in store order.
    pub async fn first(
        &self,
        type_name: &str,
        function: &str,
        depth: Option<u32>,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Option<Vertex>> {
        let mut found = self.query_with_function(type_name, function, depth, tx).await?;
        Ok(found.pop())
    }

    // ==================== Writes ====================

    /// Write a new vertex and record the id the store assigned.
    ///
    /// `after_create` only runs when an id came back; check `exists()` after.
    pub async fn create(
        &self,
        vertex: &mut Vertex,
        traverse: bool,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<()> {
        let marshaler = self.marshaler();
        let hooks = self.registry.hooks(&vertex.type_name);
        let mut payload = marshaler.marshal(vertex, traverse)?;
        if let Some(hooks) = &hooks {
            hooks.before_create(vertex, &payload).await?;
            payload = marshaler.marshal(vertex, traverse)?;
        }

        let mut slot = self.slot(tx, false);
        let txn = slot.txn();
        let id = txn.mutate(payload.clone()).await?;
        debug!(txn = txn.id(), type_name = %vertex.type_name, id = ?id, "created");

        if let Some(id) = id {
            payload.insert(ID_PREDICATE.to_string(), Json::String(id.clone()));
            vertex.id = Some(id);
            if let Some(hooks) = &hooks {
                hooks.after_create(vertex, &payload).await?;
            }
        }
        Ok(())
    }

    /// Delete a stored vertex by id. Returns true once the hooks ran.
    pub async fn delete(&self, vertex: &mut Vertex, tx: Option<&mut Transaction>) -> SessionResult<bool> {
        let id = require_id(vertex, "delete")?;
        let hooks = self.registry.hooks(&vertex.type_name);
        if let Some(hooks) = &hooks {
            hooks.before_delete(vertex).await?;
        }

        let mut slot = self.slot(tx, false);
        slot.txn().delete(json!({ ID_PREDICATE: id })).await?;

        if let Some(hooks) = &hooks {
            hooks.after_delete(vertex).await?;
        }
        Ok(true)
    }

    /// Write the current state of a stored vertex through the update hooks.
    ///
    /// With hooks attached, the stored snapshot (one level deep, or the
    /// default depth when traversing) is passed to `before_update`.
    pub async fn update(
        &self,
        vertex: &mut Vertex,
        traverse: bool,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<()> {
        let id = require_id(vertex, "update")?;
        let marshaler = self.marshaler();
        let hooks = self.registry.hooks(&vertex.type_name);
        let mut slot = self.slot(tx, false);
        let txn = slot.txn();

        let mut payload = marshaler.marshal(vertex, traverse)?;
        if let Some(hooks) = &hooks {
            let depth = if traverse { None } else { Some(1) };
            let before = self
                .fetch(txn, &vertex.type_name, &id, self.clause(depth)?)
                .await?;
            hooks.before_update(vertex, before.as_ref(), &payload).await?;
            payload = marshaler.marshal(vertex, traverse)?;
        }

        let written = txn.mutate(payload.clone()).await?;
        debug!(txn = txn.id(), type_name = %vertex.type_name, id = %id, "updated");

        if written.is_some() {
            if let Some(hooks) = &hooks {
                hooks.after_update(vertex, &payload).await?;
            }
        }
        Ok(())
    }

    /// Write a stored vertex without running any hooks.
    pub async fn save(
        &self,
        vertex: &Vertex,
        traverse: bool,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<()> {
        require_id(vertex, "save")?;
        let payload = self.marshaler().marshal(vertex, traverse)?;
        let mut slot = self.slot(tx, false);
        slot.txn().mutate(payload).await?;
        Ok(())
    }

    /// Write raw predicates onto a node, unchecked against any type.
    ///
    /// Private keys are dropped.
    pub async fn set(
        &self,
        id: &str,
        values: Payload,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Option<String>> {
        let mut payload: Payload = values
            .into_iter()
            .filter(|(key, _)| !is_private(key))
            .collect();
        payload.insert(ID_PREDICATE.to_string(), Json::String(id.to_string()));

        let mut slot = self.slot(tx, false);
        Ok(slot.txn().mutate(payload).await?)
    }

    /// Add `predicate` from one stored vertex to another.
    ///
    /// A no-op unless both vertices carry an id.
    pub async fn link(
        &self,
        from: &Vertex,
        to: &Vertex,
        predicate: &str,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Option<String>> {
        let (Some(subject), Some(object)) = (from.id(), to.id()) else {
            return Ok(None);
        };
        let mut slot = self.slot(tx, false);
        let txn = slot.txn();
        let linked = txn
            .mutate_nquads(subject, predicate, Some(NquadObject::node(object)))
            .await?;
        info!(txn = txn.id(), subject, predicate, object, "linked");
        Ok(linked)
    }

    /// Remove `predicate` between two stored vertices.
    ///
    /// A no-op unless both vertices carry an id.
    pub async fn unlink(
        &self,
        from: &Vertex,
        to: &Vertex,
        predicate: &str,
        tx: Option<&mut Transaction>,
    ) -> SessionResult<Option<String>> {
        let (Some(subject), Some(object)) = (from.id(), to.id()) else {
            return Ok(None);
        };
        let mut slot = self.slot(tx, false);
        let txn = slot.txn();
        let unlinked = txn
            .delete_nquads(subject, predicate, Some(NquadObject::node(object)))
            .await?;
        info!(txn = txn.id(), subject, predicate, object, "unlinked");
        Ok(unlinked)
    }
}

fn require_id(vertex: &Vertex, operation: &'static str) -> SessionResult<String> {
    vertex
        .id()
        .map(str::to_string)
        .ok_or_else(|| SessionError::missing_id(operation))
}

impl std::fmt::Debug for GraphSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSession")
            .field("types", &self.registry.type_count())
            .field("connection", &self.connection)
            .field("schema", &self.schema)
            .finish()
    }
}
