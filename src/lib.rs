//! Model converter registration for OpenAPI document generation
//!
//! This crate is the registration layer between an application's
//! dependency-injected model converters and the process-wide registries the
//! schema-resolution pipeline consults. It guarantees that each converter
//! implementation type is registered at most once per registry: registering
//! a second instance of the same type replaces the first.
//!
//! The process holds one registry per targeted OpenAPI specification
//! version ([`SpecVersion`]), created lazily. When the extended 3.1
//! specification is targeted, a separate fallback registry is created once
//! per process and seeded with a default [`ModelResolver`].
//!
//! ```
//! use std::sync::Arc;
//! use apidoc_converters::{
//!     ConverterConfig, ConverterRegistrar, ModelResolver, SpecVersion,
//!     TypeDescriptor,
//! };
//!
//! let config = ConverterConfig::new(SpecVersion::OpenApi30);
//! let registrar = ConverterRegistrar::new(
//!     vec![Arc::new(ModelResolver::new(SpecVersion::OpenApi30))],
//!     &config,
//! );
//!
//! let schema = registrar
//!     .registry()
//!     .resolve(&TypeDescriptor::object("app::model::Invoice"));
//! assert!(schema.is_some());
//! ```

pub mod config;
pub mod converter;
pub mod descriptor;
pub mod registrar;
pub mod registry;

pub use config::{ConverterConfig, SpecVersion};
pub use converter::{ConverterChain, ModelConverter, ModelResolver};
pub use descriptor::{PrimitiveKind, TypeDescriptor};
pub use registrar::ConverterRegistrar;
pub use registry::{ModelConverters, RegistryError};
