#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]
#![allow(clippy::cast_precision_loss)]

//! Compiler from conditional classifier hyperparameter schemas to hyperopt
//! search-space expressions.
//!
//! Each classifier exposes a flat list of parameters plus conditional edges
//! ("`degree` only matters when `kernel = poly`"). This crate resolves those
//! edges into a nested tree of mutually exclusive choices, stitches the
//! per-classifier trees into a full algorithm-selection hierarchy (attribute
//! selection, base, meta and ensemble classifiers) and renders the result as
//! text an external optimizer consumes verbatim.
//!
//! # Getting Started
//!
//! ```
//! use space_compiler::prelude::*;
//!
//! let svm = ClassifierSchema::new("weka.classifiers.functions.SMO")
//!     .param(Parameter::log_numeric("C", 0.5, 1.5))
//!     .param(Parameter::categorical("kernel", ["rbf", "poly"], 0))
//!     .param(Parameter::integer("exponent", 2, 5))
//!     .conditional(Conditional::new("exponent", "kernel", ["poly"]));
//!
//! let catalogue = Catalogue::new().with(Role::Base, svm);
//! let space = SearchSpaceCompiler::new()
//!     .compile(&catalogue, &CompileOptions::default())
//!     .unwrap();
//!
//! let text = space.render();
//! assert!(text.starts_with("{\n"));
//! assert!(text.contains("'targetclass': 'weka.classifiers.functions.SMO',"));
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Parameter`](parameter::Parameter) | One tunable value: categorical, numeric, log-numeric, integer or log-integer. |
//! | [`Conditional`](parameter::Conditional) | Child parameter active only for some parent values. |
//! | [`TreeNode`](tree::TreeNode) | Leaf, literal, group or choice of the compiled search space. |
//! | [`compile_parameter_tree`](builder::compile_parameter_tree) | Resolve one schema's dependencies into a tree. |
//! | [`SearchSpaceCompiler`](compiler::SearchSpaceCompiler) | Assemble a whole [`Catalogue`](catalogue::Catalogue) into one search space. |
//! | [`render`](render::render) | Serialize a tree into the search-space grammar. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on schemas, catalogues and options | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) while compiling and writing | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod builder;
pub mod catalogue;
pub mod compiler;
pub mod distribution;
mod error;
pub mod output;
pub mod parameter;
pub mod render;
pub mod tree;

pub use error::{Error, Result};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use space_compiler::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::compile_parameter_tree;
    pub use crate::catalogue::{AllowList, Catalogue, ClassifierSchema, Role};
    pub use crate::compiler::{CompileOptions, SearchSpace, SearchSpaceCompiler};
    pub use crate::error::{Error, Result};
    pub use crate::output::{compile_to_file, write_search_space};
    pub use crate::parameter::{Conditional, ParamKind, Parameter};
    pub use crate::render::render;
    pub use crate::tree::{Choice, Group, Leaf, Literal, LiteralRole, NameAllocator, TreeNode};
}
