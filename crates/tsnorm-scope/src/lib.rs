//! Name resolution for the tsnorm rewriting engine.
//!
//! A [`Scope`] is built once per compiled library and threaded through every
//! pass. Entering a node extends the chain without touching ancestors, so a
//! scope can be captured, shared across threads and resumed freely.
//!
//! Resolution is cycle safe: every recursive step (import and export
//! expansion, alias chasing, mapped-type key evaluation) carries a
//! [`LoopDetector`] and gives up on a branch that revisits itself.

pub mod scope;
pub use scope::{Dependencies, RootScope, Scope};

pub mod picker;
pub use picker::Picker;

pub mod loop_detector;
pub use loop_detector::{LoopDetector, LoopKey};

pub mod cache;
pub use cache::ScopeCache;

pub mod lookup;

pub mod expansion;
pub use expansion::Binding;

pub mod type_mappings;
pub use type_mappings::{all_members_for, evaluate_keys};
