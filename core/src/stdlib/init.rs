use crate::type_checker::{
    namespace::Namespace,
    types::{std_types, Arity, FunctionType},
};

use super::{arithmetic, logical};

/// A set of operations to declare in a fresh namespace.
pub struct Initializer {
    operations: Vec<(&'static str, FunctionType)>,
}

impl Initializer {
    pub fn init_namespace(&self, namespace: &mut Namespace) {
        log::trace!(
            "Initializing namespace with {} operations",
            self.operations.len()
        );
        for (name, ty) in &self.operations {
            namespace.add_builtin(name, ty.clone());
        }
    }
}

/// `str` renders any base value as text.
fn to_str() -> FunctionType {
    FunctionType::new(
        [
            std_types::NUMBER(),
            std_types::BOOLEAN(),
            std_types::STRING(),
        ]
        .into_iter()
        .map(|ty| Arity::new(vec![ty], std_types::STRING()))
        .collect(),
    )
}

pub fn prelude() -> Initializer {
    Initializer {
        operations: vec![
            ("+", arithmetic::add()),
            ("-", arithmetic::sub()),
            ("*", arithmetic::mul()),
            ("/", arithmetic::div()),
            ("inc", arithmetic::step()),
            ("dec", arithmetic::step()),
            ("<", logical::compare()),
            (">", logical::compare()),
            ("<=", logical::compare()),
            (">=", logical::compare()),
            ("==", logical::equality()),
            ("!=", logical::equality()),
            ("not", logical::not()),
            ("str", to_str()),
        ],
    }
}
