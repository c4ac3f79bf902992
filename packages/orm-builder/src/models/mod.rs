//! Model definitions, naming and directory-based loading.

pub mod definition;
pub mod loader;
pub mod naming;

pub use definition::{ModelDefinition, ModelRegistry, RegisteredModel};
pub use loader::{
    FileIterator, FsFileIterator, JsonModelLoader, LoadOptions, ModelFactory, ModelPaths,
    ModuleLoader, StaticModelFactory,
};
pub use naming::derive_model_name;
