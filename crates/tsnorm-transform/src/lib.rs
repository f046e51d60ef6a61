//! Tree transformation framework.
//!
//! A pass implements [`TreeTransformation`]: a handful of `enter_*` and
//! `leave_*` hooks over an immutable tree, plus optional container hooks that
//! reshape a whole member list. The `visit_*` drivers walk the tree depth
//! first, calling `enter_*` on the way down and `leave_*` on the way up, and
//! rebuild a node only when one of its children actually changed.

pub mod error;
pub use error::{TransformError, TransformResult};

pub mod transformation;
pub use transformation::TreeTransformation;

pub mod visit;
pub use visit::{
    visit_decl, visit_expr, visit_fun_param, visit_fun_sig, visit_member, visit_parsed_file,
    visit_type, visit_type_param,
};

pub mod discipline;
