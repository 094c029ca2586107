pub mod common;
pub mod condition;
pub mod expr;
pub mod select;
