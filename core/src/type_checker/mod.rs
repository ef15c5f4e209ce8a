pub mod checker;
pub mod namespace;
pub mod narrow;
pub mod tests;
pub mod types;
