//! Generating Go struct declarations from the fields of compiled Scala case classes.
//!
//! The pipeline for a single field is: the generic signature (or the descriptor) is parsed into a tree by
//! [`signature::GenericNode::parse`], mapped to a Go type by [`resolve::TypeResolver`], and named by
//! [`naming::Naming`]. [`project::FieldProjector`] combines these steps, and [`generate::Generator`] does so for whole
//! classes, handing the result to a [`generate::StructWriter`] like [`go::GoStructWriter`].
pub mod config;
pub mod error;
pub mod generate;
pub mod go;
pub mod naming;
pub mod project;
pub mod resolve;
pub mod signature;
pub mod source;

pub use config::{KnownTypes, MappingConfig};
pub use error::{GenerateError, MalformedSignature, TypeError};
pub use generate::{Generator, StructWriter};
pub use source::{SourceClass, SourceField};
