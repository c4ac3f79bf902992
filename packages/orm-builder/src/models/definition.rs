use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::plugin::{Plugin, PluginSet};

pub const DEFAULT_ID_ATTRIBUTE: &str = "id";
pub const SOFT_DELETE_COLUMN: &str = "deleted_at";

/// Models returned by a load, keyed by model name.
pub type ModelRegistry = BTreeMap<String, Arc<RegisteredModel>>;

/// Model description produced by a model factory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    pub table_name: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,
    #[serde(default)]
    pub hidden: Vec<String>,
    #[serde(default)]
    pub virtuals: Vec<String>,
    #[serde(default)]
    pub soft_delete: bool,
}

fn default_id_attribute() -> String {
    DEFAULT_ID_ATTRIBUTE.to_string()
}

impl ModelDefinition {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            model_name: None,
            id_attribute: default_id_attribute(),
            hidden: Vec::new(),
            virtuals: Vec::new(),
            soft_delete: false,
        }
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    pub fn with_hidden<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_virtuals<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.virtuals = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_soft_delete(mut self) -> Self {
        self.soft_delete = true;
        self
    }
}

/// A model after registration on a handle, with plugin behavior resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredModel {
    name: String,
    definition: ModelDefinition,
    soft_delete_column: Option<&'static str>,
    hidden: Vec<String>,
    virtuals: Vec<String>,
}

impl RegisteredModel {
    pub(crate) fn finalize(name: String, definition: ModelDefinition, plugins: &PluginSet) -> Self {
        let soft_delete_column = (definition.soft_delete && plugins.contains(Plugin::Paranoia))
            .then_some(SOFT_DELETE_COLUMN);
        let hidden = if plugins.contains(Plugin::Visibility) {
            definition.hidden.clone()
        } else {
            Vec::new()
        };
        let virtuals = if plugins.contains(Plugin::Virtuals) {
            definition.virtuals.clone()
        } else {
            Vec::new()
        };

        Self {
            name,
            definition,
            soft_delete_column,
            hidden,
            virtuals,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.definition.table_name
    }

    pub fn id_attribute(&self) -> &str {
        &self.definition.id_attribute
    }

    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    /// Timestamp column used for soft deletes, when paranoia applies.
    pub fn soft_delete_column(&self) -> Option<&'static str> {
        self.soft_delete_column
    }

    pub fn virtuals(&self) -> &[String] {
        &self.virtuals
    }

    pub fn is_hidden(&self, field: &str) -> bool {
        self.hidden.iter().any(|h| h == field)
    }

    /// Strip hidden attributes from a serialized row.
    pub fn visible_json(&self, row: JsonValue) -> JsonValue {
        match row {
            JsonValue::Object(mut map) => {
                map.retain(|key, _| !self.is_hidden(key));
                JsonValue::Object(map)
            }
            other => other,
        }
    }
}
