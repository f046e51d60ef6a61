//! tsnorm: scope-aware normalization of TypeScript declaration trees.
//!
//! The front-end parser hands over one immutable [`ParsedFile`] per library;
//! the [`Pipeline`] runs the normalization passes over it and returns a tree
//! in which none of the idioms the code generator cannot express survive.
//!
//! The engine is split across the workspace:
//! - `tsnorm-tree`: the tree model and type algebra
//! - `tsnorm-scope`: the scope chain and name resolution
//! - `tsnorm-transform`: the tree walker passes are written against
//! - `tsnorm-passes`: the passes themselves
//!
//! This crate adds the driver: [`config`], [`pipeline`], [`batch`] and
//! [`tracing_config`].

pub mod config;
pub use config::{CompilerOptions, TypeSubstitution};

pub mod pipeline;
pub use pipeline::{CompiledLibrary, LibraryInput, Pipeline};

pub mod batch;
pub use batch::compile_batch;

pub mod tracing_config;

pub use tsnorm_passes::PASS_ORDER;
pub use tsnorm_tree::ParsedFile;
pub use tsnorm_transform::TransformError;
