//! Converter configuration types
//!
//! This module defines the subset of generator configuration consumed by the
//! converter registration layer: which OpenAPI specification version the
//! process produces documents for. The full generator configuration lives
//! with the (out-of-scope) document pipeline; registration only needs the
//! version switch.

use serde::{Deserialize, Serialize};

/// OpenAPI specification version targeted by the generator.
///
/// Version 3.1 is the extended mode: it changes how schema fragments express
/// nullability and requires a separately seeded fallback registry (see
/// [`crate::registry::fallback_instance`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpecVersion {
    /// OpenAPI 3.0.x.
    #[default]
    OpenApi30,
    /// OpenAPI 3.1.x (extended specification mode).
    OpenApi31,
}

impl SpecVersion {
    /// Returns `true` for the OpenAPI 3.1 extended specification.
    pub fn is_openapi_31(self) -> bool {
        matches!(self, SpecVersion::OpenApi31)
    }

    /// Version string emitted in the top-level `openapi` field of generated
    /// documents.
    pub fn document_version(self) -> &'static str {
        match self {
            SpecVersion::OpenApi30 => "3.0.1",
            SpecVersion::OpenApi31 => "3.1.0",
        }
    }
}

/// Configuration consumed by the converter registration layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConverterConfig {
    /// Target specification version for all registries this process creates.
    pub spec_version: SpecVersion,
}

impl ConverterConfig {
    /// Create a configuration for the given specification version.
    pub fn new(spec_version: SpecVersion) -> Self {
        Self { spec_version }
    }
}
