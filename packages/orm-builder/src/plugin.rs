//! ORM extension plugins attached to every handle.

use std::fmt;

use crate::error::BuilderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plugin {
    /// Models resolvable by name
    Registry,
    /// Computed attributes
    Virtuals,
    /// Hidden/visible attribute filtering
    Visibility,
    Pagination,
    /// Soft delete via a `deleted_at` timestamp
    Paranoia,
    /// Query builder extensions
    Eloquent,
}

impl Plugin {
    /// Registration order used by the bootstrapper.
    pub const DEFAULT_ORDER: [Plugin; 6] = [
        Plugin::Registry,
        Plugin::Virtuals,
        Plugin::Visibility,
        Plugin::Pagination,
        Plugin::Paranoia,
        Plugin::Eloquent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::Virtuals => "virtuals",
            Self::Visibility => "visibility",
            Self::Pagination => "pagination",
            Self::Paranoia => "paranoia",
            Self::Eloquent => "eloquent",
        }
    }

    /// Plugins that must already be registered.
    pub fn requires(self) -> &'static [Plugin] {
        match self {
            Self::Eloquent => &[Plugin::Registry, Plugin::Pagination],
            _ => &[],
        }
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of registered plugins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginSet {
    plugins: Vec<Plugin>,
}

impl PluginSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. Re-registering is a no-op.
    pub fn register(&mut self, plugin: Plugin) -> Result<(), BuilderError> {
        if self.contains(plugin) {
            return Ok(());
        }

        if let Some(missing) = plugin.requires().iter().find(|p| !self.contains(**p)) {
            return Err(BuilderError::Plugin {
                message: format!("'{plugin}' requires '{missing}' to be registered first"),
            });
        }

        self.plugins.push(plugin);
        Ok(())
    }

    pub fn contains(&self, plugin: Plugin) -> bool {
        self.plugins.contains(&plugin)
    }

    pub fn iter(&self) -> impl Iterator<Item = Plugin> + '_ {
        self.plugins.iter().copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Plugin::name).collect()
    }
}
