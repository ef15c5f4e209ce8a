use std::collections::HashMap;

use crate::parser::ast::Ast;

use super::types::Type;

/// Parameter types visible at a point in a function body.
pub type TypeEnv = HashMap<String, Type>;

/// The environments a conditional's branches are checked in.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrowings {
    pub then: TypeEnv,
    pub otherwise: TypeEnv,
}

/// Refine `env` for the branches of a conditional testing `test`.
///
/// A bare argument reference as the test means the argument is not null inside
/// the `then` branch. The `else` branch keeps the ambient types, and any other
/// test narrows nothing.
pub fn narrow(env: &TypeEnv, test: &Ast) -> Narrowings {
    let mut then = env.clone();
    if let Ast::Argument { name, .. } = test {
        if let Some(ty) = env.get(name) {
            let narrowed = ty.remove_null();
            if narrowed != *ty {
                log::trace!("Narrowing '{}' from {} to {}", name, ty, narrowed);
            }
            then.insert(name.clone(), narrowed);
        }
    }
    Narrowings {
        then,
        otherwise: env.clone(),
    }
}
