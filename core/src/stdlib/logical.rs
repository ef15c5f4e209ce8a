use crate::type_checker::types::{std_types, Arity, FunctionType, Type};

/// `<`, `>`, `<=` and `>=` compare numbers.
pub fn compare() -> FunctionType {
    FunctionType::single(
        vec![std_types::NUMBER(), std_types::NUMBER()],
        std_types::BOOLEAN(),
    )
}

/// `==` and `!=` compare two values of the same base type.
pub fn equality() -> FunctionType {
    let same = |ty: Type| Arity::new(vec![ty.clone(), ty], std_types::BOOLEAN());
    FunctionType::new(vec![
        same(std_types::NUMBER()),
        same(std_types::STRING()),
        same(std_types::BOOLEAN()),
    ])
}

pub fn not() -> FunctionType {
    FunctionType::single(vec![std_types::BOOLEAN()], std_types::BOOLEAN())
}
