//! typegen: render text templates from Rust trait and struct declarations.
//!
//! A declaration is located in a source tree, reduced to a [`Description`]
//! (methods for traits, annotated fields for structs) and fed to a Tera
//! template. See [`Generator`] for the full pipeline.

pub mod error;
pub mod extract;
pub mod format;
pub mod generator;
pub mod model;
pub mod output;
pub mod render;
pub mod resolve;
pub mod types;

pub use error::{Error, Result};
pub use generator::{Generator, GeneratorConfig, TemplateSource};
pub use model::{Description, Field, Method, Package, Receiver, Shape, TypeRef, Var};
pub use resolve::{SourceResolver, SynResolver};
