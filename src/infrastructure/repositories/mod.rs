pub mod common;
pub mod expr;
pub mod mock;
pub mod roles;
