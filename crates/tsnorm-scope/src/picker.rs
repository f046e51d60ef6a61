//! Declaration filters applied to lookup results.

use tsnorm_tree::{Decl, SameNode};

#[derive(Clone, Debug)]
pub enum Picker {
    All,
    /// Classes, interfaces, type aliases and enums.
    Types,
    Vars,
    /// Declarations with a runtime value and a name.
    NamedValues,
    Namespaces,
    Classes,
    /// Whatever the inner picker accepts, except the excluded declarations.
    ButNot(Box<Picker>, Vec<Decl>),
}

impl Picker {
    pub fn but_not(self, excluded: Vec<Decl>) -> Picker {
        Picker::ButNot(Box::new(self), excluded)
    }

    pub fn pick(&self, decl: &Decl) -> bool {
        match self {
            Picker::All => true,
            Picker::Types => decl.is_type(),
            Picker::Vars => matches!(decl, Decl::Var(_)),
            Picker::NamedValues => {
                decl.name().is_some()
                    && matches!(
                        decl,
                        Decl::Var(_)
                            | Decl::Function(_)
                            | Decl::Class(_)
                            | Decl::Enum(_)
                            | Decl::Namespace(_)
                    )
            }
            Picker::Namespaces => matches!(decl, Decl::Namespace(_)),
            Picker::Classes => matches!(decl, Decl::Class(_)),
            // A declaration is kept only if it differs from every excluded one.
            Picker::ButNot(inner, excluded) => {
                inner.pick(decl)
                    && excluded
                        .iter()
                        .all(|e| !(e.same_node(decl) || e == decl))
            }
        }
    }
}
