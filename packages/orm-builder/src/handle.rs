use std::sync::Arc;

use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::config::CanonicalOptions;
use crate::dialect::Dialect;
use crate::error::BuilderError;
use crate::models::definition::{ModelDefinition, ModelRegistry, RegisteredModel};
use crate::models::loader::{
    FileIterator, FsFileIterator, JsonModelLoader, LoadOptions, ModelPaths, ModuleLoader,
};
use crate::models::naming::derive_model_name;
use crate::plugin::{Plugin, PluginSet};

/// Long-lived database client: connection pool, ORM plugins and model registry.
#[derive(Debug)]
pub struct ClientHandle {
    conn: DatabaseConnection,
    dialect: Dialect,
    options: CanonicalOptions,
    min_server_version: Option<String>,
    plugins: PluginSet,
    registry: RwLock<ModelRegistry>,
}

impl ClientHandle {
    pub(crate) fn new(
        conn: DatabaseConnection,
        dialect: Dialect,
        options: CanonicalOptions,
        plugins: PluginSet,
    ) -> Self {
        let min_server_version = options.version.clone();
        Self {
            conn,
            dialect,
            options,
            min_server_version,
            plugins,
            registry: RwLock::new(ModelRegistry::new()),
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.conn
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Options the handle was built from.
    pub fn options(&self) -> &CanonicalOptions {
        &self.options
    }

    pub fn min_server_version(&self) -> Option<&str> {
        self.min_server_version.as_deref()
    }

    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }

    /// Close the underlying pool.
    pub async fn close(self) -> Result<(), BuilderError> {
        self.conn.close().await?;
        Ok(())
    }

    /// Register a model under `name`, making it resolvable through the handle.
    pub fn model(
        &self,
        name: &str,
        definition: ModelDefinition,
    ) -> Result<Arc<RegisteredModel>, BuilderError> {
        let mut loaded = self.register_batch(vec![(name.to_string(), definition)])?;
        loaded
            .remove(name)
            .ok_or_else(|| BuilderError::DuplicateModel {
                name: name.to_string(),
            })
    }

    pub fn resolve_model(&self, name: &str) -> Option<Arc<RegisteredModel>> {
        self.registry.read().get(name).cloned()
    }

    /// Snapshot of every registered model.
    pub fn models(&self) -> ModelRegistry {
        self.registry.read().clone()
    }

    /// Load JSON model definitions from files and directories.
    pub fn load_models(
        &self,
        paths: impl Into<ModelPaths>,
        options: &LoadOptions,
    ) -> Result<ModelRegistry, BuilderError> {
        self.load_models_with(
            paths,
            options,
            &FsFileIterator::with_extension("json"),
            &JsonModelLoader,
        )
    }

    /// Load models through caller-supplied iteration and loading strategies.
    ///
    /// Every factory runs before anything is registered, so a failure leaves
    /// the registry untouched.
    pub fn load_models_with(
        &self,
        paths: impl Into<ModelPaths>,
        options: &LoadOptions,
        files: &dyn FileIterator,
        loader: &dyn ModuleLoader,
    ) -> Result<ModelRegistry, BuilderError> {
        let paths = paths.into();
        let mut pending: Vec<(String, ModelDefinition)> = Vec::new();

        files.iterate(paths.as_slice(), options, &mut |file, dir| {
            let path = dir.join(file);
            let definition = loader
                .load(&path)
                .and_then(|factory| factory.build(self))
                .map_err(|e| e.into_model_load(&path))?;

            let name = match definition.model_name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ if definition.table_name.is_empty() => {
                    return Err(BuilderError::model_load(
                        &path,
                        "model has neither a model name nor a table name",
                    ));
                }
                _ => derive_model_name(&definition.table_name),
            };

            pending.push((name, definition));
            Ok(())
        })?;

        let loaded = self.register_batch(pending)?;

        info!(count = loaded.len(), "models=loaded");
        Ok(loaded)
    }

    /// Finalize and register a batch of models as one unit.
    ///
    /// The duplicate check and every insert share one write guard; a rejected
    /// batch registers nothing.
    fn register_batch(
        &self,
        pending: Vec<(String, ModelDefinition)>,
    ) -> Result<ModelRegistry, BuilderError> {
        let mut batch = ModelRegistry::new();
        for (name, definition) in pending {
            if batch.contains_key(&name) {
                return Err(BuilderError::DuplicateModel { name });
            }
            let model = Arc::new(RegisteredModel::finalize(
                name.clone(),
                definition,
                &self.plugins,
            ));
            batch.insert(name, model);
        }

        if self.plugins.contains(Plugin::Registry) {
            let mut registry = self.registry.write();
            if let Some(name) = batch.keys().find(|name| registry.contains_key(*name)) {
                return Err(BuilderError::DuplicateModel { name: name.clone() });
            }
            for (name, model) in &batch {
                registry.insert(name.clone(), Arc::clone(model));
            }
        }

        for model in batch.values() {
            debug!(model = model.name(), table = model.table_name(), "model=registered");
        }
        Ok(batch)
    }
}
