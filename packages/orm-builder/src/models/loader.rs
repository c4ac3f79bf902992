use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::BuilderError;
use crate::handle::ClientHandle;
use crate::models::definition::ModelDefinition;

/// One or many filesystem locations to load models from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPaths(Vec<PathBuf>);

impl ModelPaths {
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }
}

impl From<&str> for ModelPaths {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<String> for ModelPaths {
    fn from(path: String) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<&Path> for ModelPaths {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for ModelPaths {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl<T: Into<PathBuf>> From<Vec<T>> for ModelPaths {
    fn from(paths: Vec<T>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PathBuf>, const N: usize> From<[T; N]> for ModelPaths {
    fn from(paths: [T; N]) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Files or directories to skip
    pub except: Vec<PathBuf>,
}

impl LoadOptions {
    pub fn except<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            except: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Walks model locations, calling `on_file(file, dir)` once per discovered file.
pub trait FileIterator {
    fn iterate(
        &self,
        paths: &[PathBuf],
        options: &LoadOptions,
        on_file: &mut dyn FnMut(&Path, &Path) -> Result<(), BuilderError>,
    ) -> Result<(), BuilderError>;
}

/// Produces a model definition for a handle.
pub trait ModelFactory {
    fn build(&self, handle: &ClientHandle) -> Result<ModelDefinition, BuilderError>;
}

impl<F> ModelFactory for F
where
    F: Fn(&ClientHandle) -> Result<ModelDefinition, BuilderError>,
{
    fn build(&self, handle: &ClientHandle) -> Result<ModelDefinition, BuilderError> {
        self(handle)
    }
}

/// Resolves a model file into its factory.
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn ModelFactory>, BuilderError>;
}

/// Factory that hands out a fixed definition.
#[derive(Debug, Clone)]
pub struct StaticModelFactory(pub ModelDefinition);

impl ModelFactory for StaticModelFactory {
    fn build(&self, _handle: &ClientHandle) -> Result<ModelDefinition, BuilderError> {
        Ok(self.0.clone())
    }
}

/// Loads JSON model definition files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelLoader;

impl ModuleLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn ModelFactory>, BuilderError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BuilderError::model_load(path, format!("failed to read: {e}")))?;
        let definition: ModelDefinition = serde_json::from_str(&contents)
            .map_err(|e| BuilderError::model_load(path, format!("invalid model definition: {e}")))?;
        Ok(Box::new(StaticModelFactory(definition)))
    }
}

/// Recursive filesystem walk in sorted order. Hidden entries are skipped.
#[derive(Debug, Clone, Default)]
pub struct FsFileIterator {
    extension: Option<String>,
}

impl FsFileIterator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report files with this extension. Explicitly named files are always reported.
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: Some(extension.into()),
        }
    }

    fn visit(
        &self,
        path: &Path,
        explicit: bool,
        except: &[PathBuf],
        on_file: &mut dyn FnMut(&Path, &Path) -> Result<(), BuilderError>,
    ) -> Result<(), BuilderError> {
        if is_excluded(path, except) {
            trace!(path = %path.display(), "model_iter=skip reason=except");
            return Ok(());
        }

        let meta = fs::metadata(path)
            .map_err(|e| BuilderError::model_load(path, format!("failed to stat: {e}")))?;

        if meta.is_dir() {
            let mut entries = fs::read_dir(path)
                .and_then(|dir| {
                    dir.map(|entry| entry.map(|e| e.path()))
                        .collect::<Result<Vec<_>, _>>()
                })
                .map_err(|e| BuilderError::model_load(path, format!("failed to read dir: {e}")))?;
            entries.retain(|p| !is_hidden(p));
            entries.sort();

            for entry in entries {
                self.visit(&entry, false, except, on_file)?;
            }
            return Ok(());
        }

        if !explicit && !self.matches_extension(path) {
            return Ok(());
        }

        let (Some(file), Some(dir)) = (path.file_name(), path.parent()) else {
            return Err(BuilderError::model_load(path, "not a file path"));
        };
        on_file(Path::new(file), dir)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        match &self.extension {
            Some(ext) => path.extension().is_some_and(|e| e == ext.as_str()),
            None => true,
        }
    }
}

impl FileIterator for FsFileIterator {
    fn iterate(
        &self,
        paths: &[PathBuf],
        options: &LoadOptions,
        on_file: &mut dyn FnMut(&Path, &Path) -> Result<(), BuilderError>,
    ) -> Result<(), BuilderError> {
        let except: Vec<PathBuf> = options.except.iter().map(|p| normalize(p)).collect();
        for path in paths {
            self.visit(path, true, &except, on_file)?;
        }
        Ok(())
    }
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_excluded(path: &Path, except: &[PathBuf]) -> bool {
    if except.is_empty() {
        return false;
    }
    let path = normalize(path);
    except.iter().any(|e| path.starts_with(e))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
