//! Schema registry
//!
//! Maps model identity to its built [`Schema`]. Schemas are built lazily on
//! first use and shared as `Arc<Schema>` for the registry's lifetime.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::{debug, error, trace};

use crate::engine::{ModelRef, RequestModel};
use crate::schema::{Schema, SchemaBuilder, SchemaError};

static GLOBAL: LazyLock<Arc<SchemaRegistry>> = LazyLock::new(|| Arc::new(SchemaRegistry::new()));

/// Read-mostly store of built schemas.
///
/// Lookups take a shared lock. A miss builds the schema outside the lock and
/// inserts it; when two threads race, the first insert wins and both get
/// the same `Arc`. Failed builds are not cached.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<TypeId, Arc<Schema>>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`crate::validate`].
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Returns the schema of `T`, building it on first use.
    pub fn get_or_build<T: RequestModel>(&self) -> Result<Arc<Schema>, SchemaError> {
        self.resolve(&ModelRef::of::<T>())
    }

    /// Builds and caches the schema of `T` up front, surfacing declaration
    /// errors at startup instead of on the first request.
    pub fn register<T: RequestModel>(&self) -> Result<(), SchemaError> {
        self.get_or_build::<T>().map(drop)
    }

    /// Returns the schema of `model`, building it on first use.
    pub fn resolve(&self, model: &ModelRef) -> Result<Arc<Schema>, SchemaError> {
        if let Some(schema) = self.get(model) {
            return Ok(schema);
        }

        let built = SchemaBuilder::describe(*model).build().map_err(|err| {
            error!(model = model.name(), error = %err, "schema declaration rejected");
            err
        })?;
        debug!(model = model.name(), fields = built.len(), "built schema");

        let mut schemas = self.schemas.write();
        if let Some(existing) = schemas.get(&model.id()) {
            trace!(model = model.name(), "schema already built by another caller");
            return Ok(Arc::clone(existing));
        }
        let schema = Arc::new(built);
        schemas.insert(model.id(), Arc::clone(&schema));
        Ok(schema)
    }

    /// The cached schema of `model`, if it has been built.
    #[must_use]
    pub fn get(&self, model: &ModelRef) -> Option<Arc<Schema>> {
        self.schemas.read().get(&model.id()).cloned()
    }

    #[must_use]
    pub fn contains<T: RequestModel>(&self) -> bool {
        self.schemas.read().contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }
}
