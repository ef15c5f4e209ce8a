pub mod arithmetic;
pub mod init;
pub mod logical;
