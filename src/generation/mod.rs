//! Generation domain module - the configuration-driven synthesis engine
//!
//! A run is a linear pipeline over an immutable document: filter the
//! operations, trim the schemas, group and name the operations, synthesize
//! contracts and partition everything into artifacts. Every stage is a pure
//! function producing a fresh value; the engine performs no I/O.

pub mod contracts;
pub mod errors;
pub mod filter;
pub mod grouping;
pub mod namespaces;
pub mod naming;
pub mod orchestrator;
pub mod partition;
pub mod sanitizers;
pub mod trim;
pub mod utils;

pub use contracts::{ContractDefinition, ContractOrigin, ContractSet, DerivedType, Polymorphism};
pub use errors::*;
pub use grouping::{InterfaceGroup, NamedOperation, OperationParameter, QueryWrapper, ResponseType};
pub use orchestrator::*;
pub use partition::{Artifact, ArtifactBody, ArtifactKind, ArtifactSet, Registration};

// Document model consumed by the pipeline
pub use crate::infrastructure::openapi::types::{
    ApiInfo, Discriminator, Document, Field, HttpMethod, Operation, Parameter, ParameterLocation,
    PrimitiveType, RequestBody, Response, Schema, SchemaKind, TypeRef,
};
