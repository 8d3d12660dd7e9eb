//! Model converter trait and the default resolver
//!
//! A model converter maps a [`TypeDescriptor`] to an OpenAPI schema fragment
//! (a `serde_json::Value`). Converters are consulted in registration order;
//! each receives a [`ConverterChain`] cursor so it can delegate the
//! descriptor to the converters registered after it and decorate their
//! output.
//!
//! Converters are identified by their concrete implementation type, not by
//! instance: a registry never holds two converters reporting the same
//! [`ModelConverter::type_name`].

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::SpecVersion;
use crate::descriptor::TypeDescriptor;

/// A pluggable capability that turns an application type descriptor into an
/// OpenAPI schema fragment.
///
/// Implementations normally report `std::any::type_name::<Self>()` as their
/// [`type_name`](ModelConverter::type_name); the registry uses it as the
/// replacement key, so two instances of the same implementation type are
/// considered the same converter.
pub trait ModelConverter: Send + Sync + 'static {
    /// Fully-qualified implementation type name; the registry's
    /// deduplication key.
    fn type_name(&self) -> &'static str;

    /// Resolve a descriptor to a schema fragment, or return `None` to pass.
    ///
    /// A converter that wants to decorate rather than produce can call
    /// [`ConverterChain::resolve_next`] and transform the result.
    fn resolve(
        &self,
        descriptor: &TypeDescriptor,
        chain: &mut ConverterChain<'_>,
    ) -> Option<Value>;
}

/// Shared cursor over the converter chain for one resolution.
///
/// Consultation order is registration order. The cursor is shared between
/// the chain's own loop and any converter that delegates through
/// [`resolve_next`](Self::resolve_next), so each converter is handed the
/// descriptor at most once per resolution, whether it was consulted by the
/// loop or by a delegating converter.
pub struct ConverterChain<'a> {
    converters: &'a [Arc<dyn ModelConverter>],
    cursor: usize,
}

impl<'a> ConverterChain<'a> {
    pub(crate) fn new(converters: &'a [Arc<dyn ModelConverter>]) -> Self {
        Self {
            converters,
            cursor: 0,
        }
    }

    /// Hand the descriptor to the not-yet-consulted converters in order,
    /// returning the first non-`None` fragment.
    pub fn resolve_next(&mut self, descriptor: &TypeDescriptor) -> Option<Value> {
        let converters = self.converters;
        while self.cursor < converters.len() {
            let head = &converters[self.cursor];
            self.cursor += 1;
            if let Some(schema) = head.resolve(descriptor, self) {
                return Some(schema);
            }
        }
        None
    }

    /// Resolve a nested descriptor (e.g. a collection's element type)
    /// through the full chain, from the top.
    ///
    /// Nested resolution gets its own cursor; consultation state for the
    /// outer descriptor is unaffected.
    pub fn resolve_nested(&self, descriptor: &TypeDescriptor) -> Option<Value> {
        ConverterChain::new(self.converters).resolve_next(descriptor)
    }
}

/// Default terminal converter.
///
/// Resolves primitives to `type`/`format` fragments, collections to `array`
/// fragments, and named model types to `$ref`s under
/// `#/components/schemas/`. One instance, configured for OpenAPI 3.1, seeds
/// the fallback registry when extended-spec mode is active.
#[derive(Debug, Clone)]
pub struct ModelResolver {
    spec_version: SpecVersion,
}

impl ModelResolver {
    /// Create a resolver producing fragments for the given spec version.
    pub fn new(spec_version: SpecVersion) -> Self {
        Self { spec_version }
    }

    /// The spec version this resolver produces fragments for.
    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    fn primitive_schema(&self, descriptor: &TypeDescriptor) -> Option<Value> {
        let kind = descriptor.primitive?;
        let (schema_type, format) = kind.schema_parts();

        let mut schema = serde_json::Map::new();
        match (self.spec_version, descriptor.nullable) {
            // 3.1 expresses nullability as a type array
            (SpecVersion::OpenApi31, true) => {
                schema.insert("type".into(), json!([schema_type, "null"]));
            }
            // 3.0 keeps the scalar type and adds the nullable keyword
            (SpecVersion::OpenApi30, true) => {
                schema.insert("type".into(), Value::String(schema_type.into()));
                schema.insert("nullable".into(), Value::Bool(true));
            }
            (_, false) => {
                schema.insert("type".into(), Value::String(schema_type.into()));
            }
        }
        if let Some(format) = format {
            schema.insert("format".into(), Value::String(format.into()));
        }
        Some(Value::Object(schema))
    }
}

impl ModelConverter for ModelResolver {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn resolve(
        &self,
        descriptor: &TypeDescriptor,
        chain: &mut ConverterChain<'_>,
    ) -> Option<Value> {
        if descriptor.primitive.is_some() {
            return self.primitive_schema(descriptor);
        }
        if let Some(item) = descriptor.item.as_deref() {
            // Element types re-enter the full chain, so converters
            // registered ahead of this one also apply to nested types.
            let items = chain.resolve_nested(item).unwrap_or_else(|| json!({}));
            return Some(json!({ "type": "array", "items": items }));
        }
        Some(json!({
            "$ref": format!("#/components/schemas/{}", descriptor.simple_name())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;

    fn resolve_alone(resolver: &ModelResolver, descriptor: &TypeDescriptor) -> Value {
        resolver
            .resolve(descriptor, &mut ConverterChain::new(&[]))
            .unwrap()
    }

    #[test]
    fn test_primitive_fragment_with_format() {
        let resolver = ModelResolver::new(SpecVersion::OpenApi30);
        let descriptor = TypeDescriptor::primitive("i64", PrimitiveKind::Long);
        let schema = resolve_alone(&resolver, &descriptor);
        assert_eq!(schema, json!({"type": "integer", "format": "int64"}));
    }

    #[test]
    fn test_nullable_under_openapi_30() {
        let resolver = ModelResolver::new(SpecVersion::OpenApi30);
        let descriptor = TypeDescriptor::primitive("String", PrimitiveKind::String).nullable();
        let schema = resolve_alone(&resolver, &descriptor);
        assert_eq!(schema, json!({"type": "string", "nullable": true}));
    }

    #[test]
    fn test_nullable_under_openapi_31() {
        let resolver = ModelResolver::new(SpecVersion::OpenApi31);
        let descriptor = TypeDescriptor::primitive("String", PrimitiveKind::String).nullable();
        let schema = resolve_alone(&resolver, &descriptor);
        assert_eq!(schema, json!({"type": ["string", "null"]}));
    }

    #[test]
    fn test_array_fragment_resolves_items() {
        let converters: Vec<Arc<dyn ModelConverter>> =
            vec![Arc::new(ModelResolver::new(SpecVersion::OpenApi30))];
        let descriptor =
            TypeDescriptor::array_of(TypeDescriptor::primitive("bool", PrimitiveKind::Boolean));
        let schema = ConverterChain::new(&converters)
            .resolve_next(&descriptor)
            .unwrap();
        assert_eq!(
            schema,
            json!({"type": "array", "items": {"type": "boolean"}})
        );
    }

    #[test]
    fn test_named_type_becomes_ref() {
        let resolver = ModelResolver::new(SpecVersion::OpenApi30);
        let descriptor = TypeDescriptor::object("app::model::Invoice");
        let schema = resolve_alone(&resolver, &descriptor);
        assert_eq!(schema, json!({"$ref": "#/components/schemas/Invoice"}));
    }

    #[test]
    fn test_chain_skips_passing_converter() {
        struct PassingConverter;
        impl ModelConverter for PassingConverter {
            fn type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
            fn resolve(
                &self,
                _descriptor: &TypeDescriptor,
                _chain: &mut ConverterChain<'_>,
            ) -> Option<Value> {
                None
            }
        }

        let converters: Vec<Arc<dyn ModelConverter>> = vec![
            Arc::new(PassingConverter),
            Arc::new(ModelResolver::new(SpecVersion::OpenApi30)),
        ];
        let descriptor = TypeDescriptor::primitive("bool", PrimitiveKind::Boolean);
        let schema = ConverterChain::new(&converters)
            .resolve_next(&descriptor)
            .unwrap();
        assert_eq!(schema, json!({"type": "boolean"}));
    }

    #[test]
    fn test_chain_consults_each_converter_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        // Delegates to the rest of the chain, then passes.
        struct PassthroughDelegator;
        impl ModelConverter for PassthroughDelegator {
            fn type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
            fn resolve(
                &self,
                descriptor: &TypeDescriptor,
                chain: &mut ConverterChain<'_>,
            ) -> Option<Value> {
                let _ = chain.resolve_next(descriptor);
                None
            }
        }

        struct ConsultationCounter {
            consultations: Arc<AtomicUsize>,
        }
        impl ModelConverter for ConsultationCounter {
            fn type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
            fn resolve(
                &self,
                _descriptor: &TypeDescriptor,
                _chain: &mut ConverterChain<'_>,
            ) -> Option<Value> {
                self.consultations.fetch_add(1, Ordering::SeqCst);
                None
            }
        }

        let consultations = Arc::new(AtomicUsize::new(0));
        let converters: Vec<Arc<dyn ModelConverter>> = vec![
            Arc::new(PassthroughDelegator),
            Arc::new(ConsultationCounter {
                consultations: Arc::clone(&consultations),
            }),
        ];

        let descriptor = TypeDescriptor::object("Unhandled");
        assert!(ConverterChain::new(&converters)
            .resolve_next(&descriptor)
            .is_none());
        // The delegation already consulted the counter; the chain's own
        // loop must not consult it again.
        assert_eq!(consultations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_chain_allows_decoration() {
        struct DeprecationConverter;
        impl ModelConverter for DeprecationConverter {
            fn type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
            fn resolve(
                &self,
                descriptor: &TypeDescriptor,
                chain: &mut ConverterChain<'_>,
            ) -> Option<Value> {
                let mut schema = chain.resolve_next(descriptor)?;
                if let Some(map) = schema.as_object_mut() {
                    map.insert("deprecated".into(), Value::Bool(true));
                }
                Some(schema)
            }
        }

        let converters: Vec<Arc<dyn ModelConverter>> = vec![
            Arc::new(DeprecationConverter),
            Arc::new(ModelResolver::new(SpecVersion::OpenApi30)),
        ];
        let descriptor = TypeDescriptor::primitive("i32", PrimitiveKind::Integer);
        let schema = ConverterChain::new(&converters)
            .resolve_next(&descriptor)
            .unwrap();
        assert_eq!(
            schema,
            json!({"type": "integer", "format": "int32", "deprecated": true})
        );
    }
}
