//! Process-wide model converter registries
//!
//! [`ModelConverters`] is the ordered, thread-safe registry consulted during
//! schema resolution. The process owns one registry per [`SpecVersion`],
//! created lazily by [`global_instance`], plus an optional fallback registry
//! ([`fallback_instance`]) that exists only once extended-spec (OpenAPI 3.1)
//! mode has been activated.
//!
//! Registry contents are enumerable through [`ModelConverters::snapshot`];
//! this is the capability the registrar's duplicate detection is built on.
//! A registry constructed with [`ModelConverters::sealed`] withholds that
//! capability, which downgrades duplicate detection to a warning (see
//! [`crate::registrar`]).

use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::SpecVersion;
use crate::converter::{ConverterChain, ModelConverter, ModelResolver};
use crate::descriptor::TypeDescriptor;

/// Errors from registry introspection
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry is sealed; its contents cannot be enumerated.
    #[error("converter introspection denied: registry is sealed")]
    IntrospectionDenied,
}

/// Ordered, thread-safe collection of model converters.
///
/// Converters are consulted front-to-back during [`resolve`](Self::resolve).
/// The collection is keyed by implementation type name for removal, but
/// ordering is pure insertion order; the registry itself does not
/// deduplicate (that is the registrar's job).
pub struct ModelConverters {
    inner: Mutex<ModelConvertersInner>,
    /// Sealed registries refuse enumeration of their contents.
    sealed: bool,
}

struct ModelConvertersInner {
    converters: Vec<Arc<dyn ModelConverter>>,
}

impl ModelConverters {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ModelConvertersInner { converters: vec![] }),
            sealed: false,
        }
    }

    /// Create an empty registry whose contents cannot be enumerated.
    ///
    /// Models locked-down environments where registry internals are not
    /// inspectable; duplicate detection against such a registry is skipped
    /// with a warning instead of failing registration.
    pub fn sealed() -> Self {
        Self {
            inner: Mutex::new(ModelConvertersInner { converters: vec![] }),
            sealed: true,
        }
    }

    /// Append a converter. It becomes the last one consulted.
    pub fn add_converter(&self, converter: Arc<dyn ModelConverter>) {
        let mut inner = self.inner.lock().unwrap();
        inner.converters.push(converter);
    }

    /// Remove the first converter whose implementation type name matches.
    ///
    /// Returns `true` if a converter was removed.
    pub fn remove_converter(&self, type_name: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .converters
            .iter()
            .position(|c| c.type_name() == type_name)
        {
            Some(index) => {
                inner.converters.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().converters.len()
    }

    /// Returns `true` if no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate registered implementation type names in consultation order.
    ///
    /// This is the explicit enumeration capability duplicate detection uses;
    /// sealed registries deny it.
    pub fn snapshot(&self) -> Result<Vec<&'static str>, RegistryError> {
        if self.sealed {
            return Err(RegistryError::IntrospectionDenied);
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner.converters.iter().map(|c| c.type_name()).collect())
    }

    /// Resolve a descriptor through the converter chain, front-to-back.
    ///
    /// The registry lock is not held while converters run.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Option<Value> {
        let converters = self.inner.lock().unwrap().converters.clone();
        ConverterChain::new(&converters).resolve_next(descriptor)
    }
}

impl Default for ModelConverters {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelConverters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConverters")
            .field("len", &self.len())
            .field("sealed", &self.sealed)
            .finish()
    }
}

// ============================================================================
// Process-wide instances
// ============================================================================

static STANDARD_INSTANCE: RwLock<Option<Arc<ModelConverters>>> = RwLock::new(None);
static EXTENDED_INSTANCE: RwLock<Option<Arc<ModelConverters>>> = RwLock::new(None);
static FALLBACK_INSTANCE: RwLock<Option<Arc<ModelConverters>>> = RwLock::new(None);

/// Get or lazily create the process-wide registry for a spec version.
///
/// One registry exists per [`SpecVersion`]; all registrars for the same
/// version share it.
pub fn global_instance(spec_version: SpecVersion) -> Arc<ModelConverters> {
    let slot = match spec_version {
        SpecVersion::OpenApi30 => &STANDARD_INSTANCE,
        SpecVersion::OpenApi31 => &EXTENDED_INSTANCE,
    };
    get_or_init(slot, || {
        debug!(spec_version = ?spec_version, "creating process-wide converter registry");
        Arc::new(ModelConverters::new())
    })
}

/// Get or lazily create the fallback registry, seeding it with a single
/// [`ModelResolver`] configured for OpenAPI 3.1.
pub(crate) fn initialize_fallback_instance() -> Arc<ModelConverters> {
    get_or_init(&FALLBACK_INSTANCE, || {
        debug!("creating fallback converter registry for OpenAPI 3.1");
        let registry = ModelConverters::new();
        registry.add_converter(Arc::new(ModelResolver::new(SpecVersion::OpenApi31)));
        Arc::new(registry)
    })
}

/// The fallback registry, if extended-spec mode was ever activated.
pub fn fallback_instance() -> Option<Arc<ModelConverters>> {
    FALLBACK_INSTANCE.read().unwrap().as_ref().map(Arc::clone)
}

/// Drop all process-wide registries back to their uninitialized state.
///
/// Intended for test isolation; production code has no reason to call this.
/// Callers still holding `Arc`s to the old registries keep them alive, but
/// subsequent [`global_instance`] calls create fresh ones.
pub fn reset_global_registries() {
    *STANDARD_INSTANCE.write().unwrap() = None;
    *EXTENDED_INSTANCE.write().unwrap() = None;
    *FALLBACK_INSTANCE.write().unwrap() = None;
}

/// Initialize-once: unsynchronized fast path, re-checked under the write
/// lock so concurrent first callers agree on a single instance.
fn get_or_init(
    slot: &RwLock<Option<Arc<ModelConverters>>>,
    init: impl FnOnce() -> Arc<ModelConverters>,
) -> Arc<ModelConverters> {
    if let Some(existing) = slot.read().unwrap().as_ref() {
        return Arc::clone(existing);
    }
    let mut guard = slot.write().unwrap();
    if let Some(existing) = guard.as_ref() {
        return Arc::clone(existing);
    }
    let created = init();
    *guard = Some(Arc::clone(&created));
    created
}
