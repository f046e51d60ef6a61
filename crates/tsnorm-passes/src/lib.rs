//! Normalization passes.
//!
//! Each pass owns one source idiom and rewrites it into the shape the code
//! generator expects. Passes are total: a node a pass does not recognize is
//! returned unchanged, by identity. They are also idempotent on their own
//! output, so running the pipeline twice is harmless.
//!
//! The driver runs them in a fixed order (see [`PASS_ORDER`]) because later
//! passes rely on the shapes earlier ones leave behind.

pub mod pass;
pub use pass::{LibraryPass, PASS_ORDER, run_scoped};

pub mod naming;
pub use naming::derive_non_conflicting_name;

pub mod type_params;
pub use type_params::type_params_referenced;

pub mod conflict_store;
pub use conflict_store::ConflictHandlingStore;

pub mod remove_comment;
pub use remove_comment::{RemoveComment, keep_first_only};

pub mod set_code_path;
pub use set_code_path::SetCodePath;

pub mod simplify_types;
pub use simplify_types::SimplifyTypes;

pub mod expand_type_mappings;
pub use expand_type_mappings::ExpandTypeMappings;

pub mod normalize_functions;
pub use normalize_functions::NormalizeFunctions;

pub mod extract_classes;
pub use extract_classes::ExtractClasses;

pub mod forward_ctors;
pub use forward_ctors::ForwardCtors;

pub mod hoisting;
pub use hoisting::Hoisting;

pub mod extract_interfaces;
pub use extract_interfaces::ExtractInterfaces;

pub mod type_rewriter;
pub use type_rewriter::TypeRewriter;

pub mod keep_first_overload_comment;
pub use keep_first_overload_comment::KeepFirstOverloadComment;
