use crate::code_path::CodePath;
use crate::ident::Ident;
use thiserror::Error;

/// A rewrite that would corrupt the tree's meaning. Never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("cannot rename the implicit call target of {code_path:?} to `{new_name}`")]
    RenameCallTarget { new_name: Ident, code_path: CodePath },

    #[error("cannot rename module `{module}`: module names are resolution keys")]
    RenameModule { module: Ident },

    #[error("cannot rename a declaration without a name")]
    Unnamed,

    #[error("cannot relocate `{name}`: it has no code path")]
    RelocateWithoutCodePath { name: Ident },
}
