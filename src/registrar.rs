//! Converter registration guard
//!
//! [`ConverterRegistrar`] takes the converters supplied by the surrounding
//! application (typically collected by its dependency-injection layer) and
//! registers each exactly once into the process-wide registry for the
//! configured spec version: any previously registered converter of the same
//! implementation type is evicted first, then the new instance is appended.
//!
//! Under extended-spec (OpenAPI 3.1) mode the registrar also ensures the
//! fallback registry exists, seeded with a single
//! [`ModelResolver`](crate::converter::ModelResolver) configured for 3.1
//! schema production.
//!
//! Duplicate detection needs to enumerate the registry's contents. When the
//! registry withholds that capability (see [`ModelConverters::sealed`]) the
//! check is skipped with a warning and the converter is appended anyway, so
//! a sealed registry can end up holding two converters of the same type.
//! This degraded behavior is deliberate: registration must not fail just
//! because the registry is not inspectable.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ConverterConfig;
use crate::converter::ModelConverter;
use crate::registry::{self, ModelConverters, RegistryError};

/// Registers application-supplied converters into the process-wide
/// registries, replacing same-type entries instead of duplicating them.
pub struct ConverterRegistrar {
    registry: Arc<ModelConverters>,
}

impl ConverterRegistrar {
    /// Register every supplied converter, in input order, into the
    /// process-wide registry for `config.spec_version`.
    ///
    /// In extended-spec mode this also initializes the fallback registry
    /// (once per process, however many registrars are constructed).
    pub fn new(converters: Vec<Arc<dyn ModelConverter>>, config: &ConverterConfig) -> Self {
        let registry = registry::global_instance(config.spec_version);
        for converter in converters {
            Self::register(&registry, converter);
        }
        if config.spec_version.is_openapi_31() {
            registry::initialize_fallback_instance();
        }
        Self { registry }
    }

    /// The registry this registrar populated.
    pub fn registry(&self) -> &Arc<ModelConverters> {
        &self.registry
    }

    /// The fallback registry, if extended-spec mode was ever activated.
    pub fn fallback_instance() -> Option<Arc<ModelConverters>> {
        registry::fallback_instance()
    }

    fn register(registry: &ModelConverters, converter: Arc<dyn ModelConverter>) {
        match Self::registered_same_as(registry, converter.as_ref()) {
            Ok(Some(existing)) => {
                registry.remove_converter(existing);
                debug!(
                    converter = converter.type_name(),
                    "replaced previously registered converter"
                );
            }
            Ok(None) => {
                debug!(converter = converter.type_name(), "registered converter");
            }
            Err(error @ RegistryError::IntrospectionDenied) => {
                // Degraded mode: without enumeration an existing same-type
                // instance cannot be found, so duplicates may accumulate.
                warn!(
                    converter = converter.type_name(),
                    error = %error,
                    "cannot inspect registry contents; skipping duplicate detection"
                );
            }
        }
        registry.add_converter(converter);
    }

    fn registered_same_as(
        registry: &ModelConverters,
        converter: &dyn ModelConverter,
    ) -> Result<Option<&'static str>, RegistryError> {
        let names = registry.snapshot()?;
        Ok(names.into_iter().find(|name| *name == converter.type_name()))
    }
}
