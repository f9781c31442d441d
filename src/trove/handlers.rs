//! Handler capabilities and their registry.
//!
//! A resource's `spec` tag selects a decoding capability. Registration binds
//! a tag to a [`HandlerFactory`]; retrieval instantiates the factory at the
//! resource's absolute path and invokes the resulting [`Handler`] with a
//! datum's kwargs. The registry is process-wide mutable state: registration
//! happens once per tag at startup, and re-registering a tag is last-wins.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{Result, TroveError};
use crate::model::Kwargs;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A decoding capability instantiated for one resource.
pub trait Handler {
    /// Decode the data point located by `datum_kwargs`.
    fn decode(&self, datum_kwargs: &Kwargs) -> std::result::Result<serde_json::Value, BoxError>;

    /// The underlying files for a sequence of datum kwargs, for resource
    /// types whose files are not implied by `resource_path` alone. Used by
    /// the file mover; `None` means "walk the resource directory instead".
    fn file_list(&self, datum_kwargs: &[Kwargs]) -> Option<Vec<PathBuf>> {
        let _ = datum_kwargs;
        None
    }
}

/// Builds a [`Handler`] for a resource's resolved absolute path and kwargs.
pub trait HandlerFactory: Send + Sync {
    fn make(&self, absolute_path: &Path, resource_kwargs: &Kwargs) -> Result<Box<dyn Handler>>;
}

impl<F> HandlerFactory for F
where
    F: Fn(&Path, &Kwargs) -> Result<Box<dyn Handler>> + Send + Sync,
{
    fn make(&self, absolute_path: &Path, resource_kwargs: &Kwargs) -> Result<Box<dyn Handler>> {
        self(absolute_path, resource_kwargs)
    }
}

/// Maps spec tags to handler factories. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<dyn HandlerFactory>>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `spec` with a factory. Last registration wins.
    pub fn register(&self, spec: impl Into<String>, factory: impl HandlerFactory + 'static) {
        let spec = spec.into();
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if map.insert(spec.clone(), Arc::new(factory)).is_some() {
            log::debug!("handler for spec '{}' re-registered", spec);
        }
    }

    pub fn is_registered(&self, spec: &str) -> bool {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(spec)
    }

    /// Instantiate the handler for `spec`. Fails with `UnregisteredSpec`.
    pub fn make(
        &self,
        spec: &str,
        absolute_path: &Path,
        resource_kwargs: &Kwargs,
    ) -> Result<Box<dyn Handler>> {
        let factory = {
            let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
            map.get(spec).cloned()
        };
        factory
            .ok_or_else(|| TroveError::UnregisteredSpec(spec.to_string()))?
            .make(absolute_path, resource_kwargs)
    }
}

static GLOBAL_REGISTRY: Lazy<HandlerRegistry> = Lazy::new(HandlerRegistry::new);

/// The process-wide default registry.
pub fn global() -> HandlerRegistry {
    GLOBAL_REGISTRY.clone()
}
