#![allow(clippy::module_inception)]
pub mod lexer;
pub mod parser;
pub mod reporter;
pub mod stdlib;
pub mod type_checker;
pub mod util;

pub const LANG_VERSION: &str = env!("CARGO_PKG_VERSION");
