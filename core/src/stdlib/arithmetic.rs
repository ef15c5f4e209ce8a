use crate::type_checker::types::{std_types, Arity, FunctionType};

//--------------------------------------------------------------------------------------//
//                                Arithmetic Operations                                 //
//--------------------------------------------------------------------------------------//

fn binary_number() -> Arity {
    Arity::new(
        vec![std_types::NUMBER(), std_types::NUMBER()],
        std_types::NUMBER(),
    )
}

/// `+` adds numbers and concatenates strings.
pub fn add() -> FunctionType {
    FunctionType::new(vec![
        binary_number(),
        Arity::new(
            vec![std_types::STRING(), std_types::STRING()],
            std_types::STRING(),
        ),
    ])
}

pub fn sub() -> FunctionType {
    FunctionType::new(vec![binary_number()])
}

pub fn mul() -> FunctionType {
    FunctionType::new(vec![binary_number()])
}

pub fn div() -> FunctionType {
    FunctionType::new(vec![binary_number()])
}

/// `inc` and `dec`
pub fn step() -> FunctionType {
    FunctionType::single(vec![std_types::NUMBER()], std_types::NUMBER())
}
